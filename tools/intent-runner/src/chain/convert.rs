//! Conversions between alloy and ethers primitive types.

use alloy_primitives::{Address, Bytes, B256, U256};
use ethers::types::{Bytes as EBytes, H160, H256, U256 as EU256};

pub fn to_h160(a: Address) -> H160 {
    H160::from_slice(a.as_slice())
}

pub fn from_h160(h: H160) -> Address {
    Address::from(h.0)
}

pub fn from_h256(h: H256) -> B256 {
    B256::from(h.0)
}

// Both sides store little-endian u64 limbs.
pub fn to_ethers_u256(v: U256) -> EU256 {
    EU256(v.into_limbs())
}

pub fn from_ethers_u256(v: EU256) -> U256 {
    U256::from_limbs(v.0)
}

pub fn to_ethers_bytes(b: Bytes) -> EBytes {
    EBytes::from(b.to_vec())
}
