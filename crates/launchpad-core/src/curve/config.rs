//! Curve configuration fixed at collection creation.

#[cfg(feature = "client")]
use serde::{Deserialize, Serialize};

use ethnum::U256;

use crate::constants::*;
use crate::errors::{CoreResult, LaunchpadError};
use crate::math::widening_mul;

/// Shape and fee schedule of a collection's bonding curve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct CurveConfig {
    /// Notional base-currency reserve the curve starts from
    pub virtual_reserve: u128,
    /// Notional NFT supply the curve starts from
    pub virtual_supply: u128,
    /// Raised amount at which the collection reveals
    pub reveal_cap: u128,
    /// Total trading fee (basis points)
    pub fee_bps: u16,
    /// Creator share of the fee (basis points of the trade)
    pub creator_fee_bps: u16,
    /// Platform share of the fee (basis points of the trade)
    pub platform_fee_bps: u16,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            virtual_reserve: DEFAULT_VIRTUAL_RESERVE,
            virtual_supply: DEFAULT_VIRTUAL_SUPPLY,
            reveal_cap: DEFAULT_REVEAL_CAP,
            fee_bps: DEFAULT_FEE_BPS,
            creator_fee_bps: DEFAULT_CREATOR_FEE_BPS,
            platform_fee_bps: DEFAULT_PLATFORM_FEE_BPS,
        }
    }
}

impl CurveConfig {
    /// Validate curve configuration
    pub fn validate(&self) -> CoreResult<()> {
        if self.virtual_reserve == 0 {
            return Err(LaunchpadError::invalid_config("virtual_reserve", "must be positive"));
        }
        if self.virtual_supply == 0 {
            return Err(LaunchpadError::invalid_config("virtual_supply", "must be positive"));
        }
        if self.reveal_cap == 0 {
            return Err(LaunchpadError::invalid_config("reveal_cap", "must be positive"));
        }
        if self.fee_bps > MAX_BPS {
            return Err(LaunchpadError::invalid_config("fee_bps", "must be at most 10000"));
        }
        let split = self.creator_fee_bps as u32 + self.platform_fee_bps as u32;
        if split > self.fee_bps as u32 {
            return Err(LaunchpadError::invalid_config(
                "creator_fee_bps",
                "creator and platform fees exceed the total fee",
            ));
        }
        Ok(())
    }

    /// Constant product of the initial virtual reserves
    pub fn k(&self) -> U256 {
        widening_mul(self.virtual_reserve, self.virtual_supply)
    }
}
