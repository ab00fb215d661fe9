//! Liquidity pool and provider position records.

#[cfg(feature = "client")]
use serde::{Deserialize, Serialize};

use crate::constants::{BRIDGE_FEE_BPS, MAX_BPS};
use crate::errors::{CoreResult, LaunchpadError};
use crate::math::{ratio_bps, Rounding};
use crate::types::Versioned;

/// Pool lifecycle: `Uninitialized -> Active <-> Drained`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub enum PoolStatus {
    /// Never seeded
    Uninitialized,
    /// Both reserves positive; quotable
    Active,
    /// A reserve hit zero; quotable again once re-seeded
    Drained,
}

/// NFT/token pool backing redemptions of one supported token
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct LiquidityPool {
    /// Mint of the supported token
    pub token: String,
    pub nft_reserve: u128,
    pub token_reserve: u128,
    /// Sum of all provider positions
    pub total_shares: u128,
    /// Bridge fee taken from swap output (basis points)
    pub fee_bps: u16,
    pub status: PoolStatus,
    /// NFTs swapped in
    pub nft_volume: u128,
    /// Gross tokens swapped out
    pub token_volume: u128,
    /// Bridge fees left in the token reserve
    pub fees_accrued: u128,
    pub trade_count: u64,
    pub version: u64,
}

impl LiquidityPool {
    /// Unseeded pool charging the default bridge fee
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            nft_reserve: 0,
            token_reserve: 0,
            total_shares: 0,
            fee_bps: BRIDGE_FEE_BPS,
            status: PoolStatus::Uninitialized,
            nft_volume: 0,
            token_volume: 0,
            fees_accrued: 0,
            trade_count: 0,
            version: 0,
        }
    }

    /// Override the bridge fee
    pub fn with_fee_bps(mut self, fee_bps: u16) -> CoreResult<Self> {
        if fee_bps > MAX_BPS {
            return Err(LaunchpadError::invalid_config("fee_bps", "must be at most 10000"));
        }
        self.fee_bps = fee_bps;
        Ok(self)
    }

    /// Active with both reserves positive
    pub fn is_quotable(&self) -> bool {
        self.status == PoolStatus::Active && self.nft_reserve > 0 && self.token_reserve > 0
    }
}

impl Versioned for LiquidityPool {
    fn version(&self) -> u64 {
        self.version
    }
}

/// A provider's claim on one pool
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct LiquidityPosition {
    pub token: String,
    pub provider: String,
    pub shares: u128,
}

impl LiquidityPosition {
    pub fn new(token: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            provider: provider.into(),
            shares: 0,
        }
    }
}

/// Cumulative token volume relative to the current token reserve, capped at 100%
pub fn utilization_bps(pool: &LiquidityPool) -> CoreResult<u16> {
    if pool.token_reserve == 0 {
        return Ok(0);
    }
    if pool.token_volume >= pool.token_reserve {
        return Ok(MAX_BPS);
    }
    let bps = ratio_bps(pool.token_volume, pool.token_reserve, Rounding::Down)?;
    Ok(bps as u16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_pool() {
        let pool = LiquidityPool::new("USDC");
        assert_eq!(pool.status, PoolStatus::Uninitialized);
        assert_eq!(pool.fee_bps, 50);
        assert!(!pool.is_quotable());

        assert!(LiquidityPool::new("USDC").with_fee_bps(10_001).is_err());
        assert_eq!(LiquidityPool::new("USDC").with_fee_bps(0).unwrap().fee_bps, 0);
    }

    #[test]
    fn test_utilization() {
        let mut pool = LiquidityPool::new("USDC");
        assert_eq!(utilization_bps(&pool).unwrap(), 0);

        pool.token_reserve = 1_000;
        pool.token_volume = 250;
        assert_eq!(utilization_bps(&pool).unwrap(), 2_500);

        pool.token_volume = 5_000;
        assert_eq!(utilization_bps(&pool).unwrap(), 10_000);
    }
}
