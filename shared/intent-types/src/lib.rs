//! Shared ABI surface for the intent execution tooling.
//!
//! The runner and the encoder both speak to the same external contracts (sample account,
//! protocol manager, module registry and intent plugin). Their call shapes live here so the
//! two crates cannot drift apart.

pub mod abi;
pub mod constants;

pub use abi::{
    IIntentPlugin, ISafeProtocolManager, ISafeProtocolRegistry, ISampleAccount, SwapATO,
    UserIntent, ATO,
};
