//! Stateless trade-size and price-impact guards.

#[cfg(feature = "client")]
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::curve::config::CurveConfig;
use crate::errors::{CoreResult, LaunchpadError};
use crate::math::{apply_bps, Rounding};
use crate::types::{Quote, TradeSide};

/// Per-trade limits applied to a quote before it is accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct TradeLimits {
    /// Largest trade as a share of the virtual supply (basis points)
    pub max_trade_share_bps: u16,
    /// Largest trade in NFT units; 0 disables the absolute cap
    pub max_trade_absolute: u128,
    /// Largest tolerated price impact (basis points)
    pub max_price_impact_bps: u64,
}

impl Default for TradeLimits {
    fn default() -> Self {
        Self {
            max_trade_share_bps: DEFAULT_MAX_TRADE_SHARE_BPS,
            max_trade_absolute: DEFAULT_MAX_TRADE_ABSOLUTE,
            max_price_impact_bps: DEFAULT_MAX_PRICE_IMPACT_BPS,
        }
    }
}

impl TradeLimits {
    pub fn validate(&self) -> CoreResult<()> {
        if self.max_trade_share_bps == 0 || self.max_trade_share_bps > MAX_BPS {
            return Err(LaunchpadError::invalid_config(
                "max_trade_share_bps",
                "must be between 1 and 10000",
            ));
        }
        if self.max_price_impact_bps == 0 || self.max_price_impact_bps > BPS_DENOMINATOR {
            return Err(LaunchpadError::invalid_config(
                "max_price_impact_bps",
                "must be between 1 and 10000",
            ));
        }
        Ok(())
    }

    /// Largest NFT count a single trade may move on this curve
    pub fn max_trade_size(&self, config: &CurveConfig) -> CoreResult<u128> {
        let share = apply_bps(config.virtual_supply, self.max_trade_share_bps, Rounding::Down)?;
        Ok(match self.max_trade_absolute {
            0 => share,
            absolute => share.min(absolute),
        })
    }

    /// Reject a quote that moves too many NFTs or the price too far
    pub fn check(&self, quote: &Quote, config: &CurveConfig) -> CoreResult<()> {
        let size = match quote.side {
            TradeSide::Buy => quote.output_amount,
            TradeSide::Sell => quote.input_amount,
        };
        let max = self.max_trade_size(config)?;
        if size > max {
            return Err(LaunchpadError::TradeTooLarge { size, max });
        }
        if quote.price_impact_bps > self.max_price_impact_bps {
            return Err(LaunchpadError::ExcessivePriceImpact {
                impact_bps: quote.price_impact_bps,
                max_bps: self.max_price_impact_bps,
            });
        }
        Ok(())
    }
}
