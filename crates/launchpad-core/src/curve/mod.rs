//! # Bonding Curve
//!
//! Mint pricing for a collection:
//! 1. **Config** - curve shape and fee schedule, fixed at creation
//! 2. **State** - minted count, raised total and reveal flag
//! 3. **Engine** - quotes and commits
//! 4. **Chart** - lazy price samples
//! 5. **Limits** - per-trade guards

pub mod chart;
pub mod config;
pub mod engine;
pub mod limits;
pub mod state;

pub use chart::*;
pub use config::*;
pub use engine::*;
pub use limits::*;
pub use state::*;
