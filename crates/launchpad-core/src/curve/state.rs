//! Mutable curve snapshot and the figures derived from it.

#[cfg(feature = "client")]
use serde::{Deserialize, Serialize};

use crate::constants::MAX_BPS;
use crate::curve::config::CurveConfig;
use crate::errors::CoreResult;
use crate::math::{marginal_price, ratio_bps, Rounding};
use crate::types::Versioned;

/// Per-collection curve state
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct CurveState {
    /// Real NFTs minted and not sold back
    pub minted: u128,
    /// Cumulative gross base currency raised by buys
    pub raised: u128,
    /// Current virtual base-currency reserve
    pub virtual_reserve: u128,
    /// Current virtual NFT supply (config supply less minted)
    pub virtual_supply: u128,
    /// Set once raised reaches the reveal cap; never cleared
    pub revealed: bool,
    /// Gross base currency traded in both directions
    pub total_volume: u128,
    pub trade_count: u64,
    pub version: u64,
}

impl CurveState {
    /// Initial snapshot for a freshly created collection
    pub fn new(config: &CurveConfig) -> Self {
        Self {
            minted: 0,
            raised: 0,
            virtual_reserve: config.virtual_reserve,
            virtual_supply: config.virtual_supply,
            revealed: false,
            total_volume: 0,
            trade_count: 0,
            version: 0,
        }
    }

    /// Marginal price at the current reserves
    pub fn spot_price(&self) -> CoreResult<u128> {
        marginal_price(self.virtual_reserve, self.virtual_supply)
    }
}

impl Versioned for CurveState {
    fn version(&self) -> u64 {
        self.version
    }
}

/// Market summary of a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct CurveMetrics {
    pub market_cap: u128,
    pub fully_diluted_valuation: u128,
    pub liquidity: u128,
    pub current_price: u128,
    pub progress_to_reveal_bps: u16,
    pub revealed: bool,
}

/// Raised amount relative to the reveal cap, capped at 100%
pub fn progress_to_reveal_bps(config: &CurveConfig, state: &CurveState) -> CoreResult<u16> {
    if state.raised >= config.reveal_cap {
        return Ok(MAX_BPS);
    }
    let bps = ratio_bps(state.raised, config.reveal_cap, Rounding::Down)?;
    Ok(bps as u16)
}

/// Summarise a collection's market
pub fn metrics(config: &CurveConfig, state: &CurveState) -> CoreResult<CurveMetrics> {
    Ok(CurveMetrics {
        market_cap: state.raised,
        fully_diluted_valuation: state.virtual_reserve,
        liquidity: state.virtual_reserve,
        current_price: state.spot_price()?,
        progress_to_reveal_bps: progress_to_reveal_bps(config, state)?,
        revealed: state.revealed,
    })
}
