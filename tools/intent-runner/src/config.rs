//! Resolution of CLI/env input into signers, plans and typed values.

use std::{fs, path::PathBuf};

use alloy_primitives::{Address, U256};
use ato_encoder::{AtoParams, SwapBounds};
use ethers::signers::LocalWallet;
use thiserror::Error;

use crate::{
    chain::convert::from_ethers_u256,
    cli::{AtoArgs, ChainArgs, Command, RunArgs, SwapArgs},
    scenario::{Intent, Plan, Setup},
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "missing deployer key: provide --private-key-path or --private-key (or set PRIV_KEY_PATH/PKEY)"
    )]
    MissingKey,

    #[error("failed reading key file {}", .path.display())]
    ReadKey {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid {role} private key: {reason}")]
    InvalidKey { role: &'static str, reason: String },

    #[error("at most two --placeholder addresses are used, got {0}")]
    TooManyPlaceholders(usize),
}

pub fn deployer_wallet(args: &ChainArgs) -> Result<LocalWallet, ConfigError> {
    let raw = if let Some(ref path) = args.private_key_path {
        fs::read_to_string(path).map_err(|source| ConfigError::ReadKey {
            path: path.clone(),
            source,
        })?
    } else if let Some(ref pk) = args.private_key {
        pk.clone()
    } else {
        return Err(ConfigError::MissingKey);
    };
    wallet_from_hex("deployer", &raw)
}

/// Owner signer, if one distinct from the deployer is configured.
pub fn owner_wallet(args: &ChainArgs) -> Result<Option<LocalWallet>, ConfigError> {
    args.owner_private_key
        .as_deref()
        .map(|pk| wallet_from_hex("owner", pk))
        .transpose()
}

fn wallet_from_hex(role: &'static str, raw: &str) -> Result<LocalWallet, ConfigError> {
    let trimmed = raw.trim();
    let stripped = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    let bytes = hex::decode(stripped).map_err(|e| ConfigError::InvalidKey {
        role,
        reason: e.to_string(),
    })?;
    if bytes.len() != 32 {
        return Err(ConfigError::InvalidKey {
            role,
            reason: format!("expected 32 bytes, got {}", bytes.len()),
        });
    }
    LocalWallet::from_bytes(&bytes).map_err(|e| ConfigError::InvalidKey {
        role,
        reason: e.to_string(),
    })
}

/// Fill up to two placeholder addresses, drawing random ones for the missing slots.
pub fn placeholders(given: &[Address]) -> Result<[Address; 2], ConfigError> {
    if given.len() > 2 {
        return Err(ConfigError::TooManyPlaceholders(given.len()));
    }
    let mut out = [Address::ZERO; 2];
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = given
            .get(i)
            .copied()
            .unwrap_or_else(|| Address::from(ethers::core::rand::random::<[u8; 20]>()));
    }
    Ok(out)
}

pub fn build_plan(run: &RunArgs, command: &Command) -> Result<Plan, ConfigError> {
    let setup = if run.register {
        Setup::Registered {
            permissions: run.permissions,
        }
    } else {
        Setup::Bare {
            placeholders: placeholders(&run.placeholders)?,
        }
    };

    let intent = match command {
        Command::ExecuteAto(args) => Intent::Ato(ato_params(args)),
        Command::ExecuteSwap(args) => Intent::Swap(swap_bounds(args)),
        Command::ExecuteIntent(args) => Intent::UserIntent {
            ato: ato_params(&args.ato),
            count: args.count,
            nonce: args.nonce,
            fee: args.fee,
        },
    };

    Ok(Plan {
        setup,
        intent,
        fund: run.fund,
    })
}

fn ato_params(args: &AtoArgs) -> AtoParams {
    AtoParams {
        operation: args.operation,
        chain_id: args.chain_id,
        fields_to_optimize: args.fields_to_optimize.clone(),
        fields_to_optimize_schema: args.fields_to_optimize_schema.clone(),
        payload: args.payload.clone(),
        payload_schema: args.payload_schema.clone(),
    }
}

fn swap_bounds(args: &SwapArgs) -> SwapBounds {
    SwapBounds {
        operation: args.operation,
        token_in: args.token_in,
        token_out: args.token_out,
        min_token_in: args.min_in,
        max_token_in: args.max_in,
        min_token_out: args.min_out,
        max_token_out: args.max_out,
        source_chain_id: args.source_chain_id,
        destination_chain_id: args.destination_chain_id,
    }
}

/// Decimal or `0x`-prefixed hex integer.
pub fn parse_u256(s: &str) -> Result<U256, String> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x") {
        Some(hex) => U256::from_str_radix(hex, 16),
        None => U256::from_str_radix(s, 10),
    };
    parsed.map_err(|e| format!("invalid integer `{s}`: {e}"))
}

/// Decimal ether amount (eg `1.0`, `0.25`) into wei.
pub fn parse_ether(s: &str) -> Result<U256, String> {
    ethers::utils::parse_ether(s.trim())
        .map(from_ethers_u256)
        .map_err(|e| format!("invalid ether amount `{s}`: {e}"))
}

pub fn parse_address(s: &str) -> Result<Address, String> {
    s.trim()
        .parse::<Address>()
        .map_err(|e| format!("invalid address `{s}`: {e}"))
}
