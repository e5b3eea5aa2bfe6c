//! In-memory `ChainClient` that records every request in submission order.

use std::sync::{Arc, Mutex};

use alloy_primitives::{Address, Bytes, B256};
use async_trait::async_trait;

use crate::chain::{Call, ChainClient, ChainError, Deployment, TxOutcome};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Recorded {
    Deploy {
        label: String,
        init_code: Bytes,
        address: Address,
    },
    Send {
        from: Address,
        call: Call,
    },
}

pub type Log = Arc<Mutex<Vec<Recorded>>>;

pub struct RecordingChain {
    address: Address,
    log: Log,
    /// Fail the n-th `send` (0-based, counted across the shared log) with a revert.
    fail_send_at: Option<usize>,
    fail_deploy: Option<String>,
}

impl RecordingChain {
    pub fn new(address: Address, log: Log) -> Self {
        Self {
            address,
            log,
            fail_send_at: None,
            fail_deploy: None,
        }
    }

    pub fn failing_send_at(mut self, index: usize) -> Self {
        self.fail_send_at = Some(index);
        self
    }

    /// Reject the deployment labelled `label`; nothing is recorded for it.
    pub fn failing_deploy(mut self, label: &str) -> Self {
        self.fail_deploy = Some(label.to_string());
        self
    }
}

pub fn new_log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

fn hash_for(index: usize) -> B256 {
    B256::with_last_byte(index as u8 + 1)
}

#[async_trait]
impl ChainClient for RecordingChain {
    fn address(&self) -> Address {
        self.address
    }

    async fn deploy(&self, label: &str, init_code: Bytes) -> Result<Deployment, ChainError> {
        let mut log = self.log.lock().unwrap();
        let index = log.len();
        if self.fail_deploy.as_deref() == Some(label) {
            return Err(ChainError::Send(format!("deployment of {label} rejected")));
        }
        let mut raw = [0u8; 20];
        raw[0] = 0xc0;
        raw[19] = index as u8 + 1;
        let address = Address::from(raw);
        log.push(Recorded::Deploy {
            label: label.to_string(),
            init_code,
            address,
        });
        Ok(Deployment {
            address,
            tx_hash: hash_for(index),
        })
    }

    async fn send(&self, call: Call) -> Result<TxOutcome, ChainError> {
        let mut log = self.log.lock().unwrap();
        let index = log.len();
        let sends = log
            .iter()
            .filter(|r| matches!(r, Recorded::Send { .. }))
            .count();
        log.push(Recorded::Send {
            from: self.address,
            call,
        });
        if self.fail_send_at == Some(sends) {
            return Err(ChainError::Reverted {
                hash: hash_for(index),
            });
        }
        Ok(TxOutcome {
            hash: hash_for(index),
            block_number: Some(index as u64 + 1),
        })
    }
}

/// Deployed address recorded for `label`.
pub fn deployed(log: &Log, label: &str) -> Address {
    log.lock()
        .unwrap()
        .iter()
        .find_map(|r| match r {
            Recorded::Deploy {
                label: l, address, ..
            } if l == label => Some(*address),
            _ => None,
        })
        .unwrap_or_else(|| panic!("`{label}` was not deployed"))
}

pub fn sends(log: &Log) -> Vec<(Address, Call)> {
    log.lock()
        .unwrap()
        .iter()
        .filter_map(|r| match r {
            Recorded::Send { from, call } => Some((*from, call.clone())),
            _ => None,
        })
        .collect()
}

pub fn init_code(log: &Log, label: &str) -> Bytes {
    log.lock()
        .unwrap()
        .iter()
        .find_map(|r| match r {
            Recorded::Deploy {
                label: l,
                init_code,
                ..
            } if l == label => Some(init_code.clone()),
            _ => None,
        })
        .unwrap_or_else(|| panic!("`{label}` was not deployed"))
}
