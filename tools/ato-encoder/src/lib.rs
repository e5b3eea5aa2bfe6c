//! Off-chain construction of intent payloads and the calldata that carries them.

pub mod encoder;
pub mod types;


pub use encoder::*;
pub use types::{AtoParams, Constructor, SwapBounds};
