//! # Bridge
//!
//! Post-reveal redemption of NFTs for supported tokens through per-token
//! constant-product pools. Whether a collection has revealed is checked by
//! the caller before any of this is reached.

pub mod liquidity;
pub mod pool;
pub mod registry;
pub mod swap;

pub use liquidity::*;
pub use pool::*;
pub use registry::*;
pub use swap::*;
