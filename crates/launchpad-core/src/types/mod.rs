//! # Shared Types

pub mod authority;
pub mod quote;

pub use authority::*;
pub use quote::*;

/// Snapshot that advances its version on every committed transition
pub trait Versioned {
    fn version(&self) -> u64;
}
