//! # Quote Types
//!
//! Ephemeral results of pricing a trade. A quote carries the snapshot version
//! it was priced against and the post-trade reserves, so committing it is a
//! plain state transition.

#[cfg(feature = "client")]
use serde::{Deserialize, Serialize};

use crate::constants::BPS_DENOMINATOR;

/// Direction of a curve trade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub enum TradeSide {
    /// Base currency in, NFTs out
    Buy,
    /// NFTs in, base currency out
    Sell,
}

/// Fee split for a single curve trade
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct FeeBreakdown {
    /// Total fee charged
    pub total: u128,
    /// Creator's share
    pub creator: u128,
    /// Platform's share
    pub platform: u128,
    /// Part of the total not assigned to creator or platform
    pub retained: u128,
}

/// Priced curve trade
///
/// # Rounding
///
/// Every rounded figure favors the protocol. Post-trade reserve and supply
/// round up, so `output_amount` is rounded down for the trader on both sides.
/// `fee.total` rounds up while the creator and platform shares round down,
/// and the difference lands in `fee.retained`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct Quote {
    pub side: TradeSide,
    /// Base currency for buys, NFTs for sells
    pub input_amount: u128,
    /// NFTs for buys, gross base currency for sells
    pub output_amount: u128,
    /// Marginal price move caused by the trade (basis points)
    pub price_impact_bps: u64,
    pub fee: FeeBreakdown,
    /// Buys: input less fees. Sells: output less fees
    pub net_amount: u128,
    /// Marginal price before the trade (scaled by PRICE_SCALE)
    pub price_before: u128,
    /// Marginal price after the trade (scaled by PRICE_SCALE)
    pub price_after: u128,
    /// Virtual reserve once committed
    pub reserve_after: u128,
    /// Virtual supply once committed
    pub supply_after: u128,
    /// Version of the snapshot this quote was priced against
    pub state_version: u64,
}

impl Quote {
    /// Price impact as a display percentage, e.g. `"3.27%"`
    pub fn price_impact_percent(&self) -> String {
        format_bps(self.price_impact_bps)
    }
}

/// Render basis points as a percentage with two decimals
pub fn format_bps(bps: u64) -> String {
    let per_cent = BPS_DENOMINATOR / 100;
    format!("{}.{:02}%", bps / per_cent, bps % per_cent)
}
