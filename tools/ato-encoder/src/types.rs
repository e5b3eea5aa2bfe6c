use alloy_primitives::{Address, U256};

/// User-facing ATO fields. Byte fields are taken as UTF-8 text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AtoParams {
    pub operation: U256,
    pub chain_id: U256,
    pub fields_to_optimize: String,
    pub fields_to_optimize_schema: String,
    pub payload: String,
    pub payload_schema: String,
}

impl Default for AtoParams {
    fn default() -> Self {
        Self {
            operation: U256::from(1u64),
            chain_id: U256::from(1u64),
            fields_to_optimize: String::new(),
            fields_to_optimize_schema: String::new(),
            payload: String::new(),
            payload_schema: String::new(),
        }
    }
}

/// Token-swap bounds for the swap ATO variant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwapBounds {
    pub operation: U256,
    pub token_in: Address,
    pub token_out: Address,
    pub min_token_in: U256,
    pub max_token_in: U256,
    pub min_token_out: U256,
    pub max_token_out: U256,
    pub source_chain_id: U256,
    pub destination_chain_id: U256,
}

/// Constructor arguments of the contracts the runner deploys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Constructor {
    /// No-arg constructor (eg `SampleAccount`).
    Empty,
    Registry { initial_owner: Address },
    Manager { initial_owner: Address, registry: Address },
    Plugin { trusted_origin: Address },
}
