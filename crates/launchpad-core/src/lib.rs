//! # Launchpad Core - NFT Launch Pricing Engine
//!
//! Pure pricing and sequencing logic for NFT launches. It provides:
//!
//! - A constant-product bonding curve pricing mints and tracking reveal
//! - A constant-product bridge redeeming revealed NFTs for supported tokens
//! - A token id sequencer issuing contiguous, collision-free ids
//! - Overflow-checked fixed-point math shared by all of the above
//!
//! Every operation takes an immutable snapshot and returns a new one or a
//! typed error. Persistence and concurrency control belong to the caller;
//! [`store::SnapshotStore`] is the seam for both.
//!
//! ## Feature Flags
//!
//! - `client`: Enables serde serialization for off-chain storage

pub mod bridge;
pub mod constants;
pub mod curve;
pub mod errors;
pub mod math;
pub mod sequencer;
pub mod store;
pub mod types;

// Re-export commonly used items
pub use constants::*;
pub use errors::{CoreResult, ErrorKind, LaunchpadError};
pub use store::{MemoryStore, SnapshotStore};
pub use types::*;
