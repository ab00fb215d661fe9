//! # Token Sequencer
//!
//! Collision-free, gap-free token id reservation per collection.

pub mod audit;
pub mod engine;
pub mod sequence;

pub use audit::*;
pub use engine::*;
pub use sequence::*;
