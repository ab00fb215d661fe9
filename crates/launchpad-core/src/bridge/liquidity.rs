//! Two-sided liquidity provision.
//!
//! The first deposit into an empty pool mints `sqrt(token * nft)` shares.
//! Later deposits must match the pool ratio within a tolerance and mint the
//! smaller of the two implied share counts; only the amounts backing those
//! shares are taken and the rest is handed back in the receipt.

#[cfg(feature = "client")]
use serde::{Deserialize, Serialize};

use crate::bridge::pool::{LiquidityPool, LiquidityPosition, PoolStatus};
use crate::constants::MAX_BPS;
use crate::errors::{CoreResult, LaunchpadError};
use crate::math::*;

/// Outcome of a deposit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct LiquidityReceipt {
    pub shares_issued: u128,
    pub token_used: u128,
    pub nft_used: u128,
    /// Offered but not taken; the caller returns it to the provider
    pub token_refund: u128,
    pub nft_refund: u128,
}

/// Outcome of a withdrawal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct Withdrawal {
    pub shares_burned: u128,
    pub token_amount: u128,
    pub nft_amount: u128,
}

/// Share totals of a pool against the positions recorded for it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct ShareAudit {
    pub pool_shares: u128,
    pub position_shares: u128,
    pub positions: usize,
}

impl ShareAudit {
    pub fn is_balanced(&self) -> bool {
        self.pool_shares == self.position_shares
    }
}

fn check_position(pool: &LiquidityPool, position: &LiquidityPosition) -> CoreResult<()> {
    if position.token != pool.token {
        return Err(LaunchpadError::InvalidInput("position belongs to another pool"));
    }
    Ok(())
}

/// Deposit into a pool, seeding it if it holds no shares
pub fn add_liquidity(
    pool: &LiquidityPool,
    position: &LiquidityPosition,
    token_amount: u128,
    nft_amount: u128,
    slippage_bps: u16,
) -> CoreResult<(LiquidityPool, LiquidityPosition, LiquidityReceipt)> {
    if token_amount == 0 || nft_amount == 0 {
        return Err(LaunchpadError::InvalidInput("liquidity amounts must be positive"));
    }
    if slippage_bps > MAX_BPS {
        return Err(LaunchpadError::InvalidInput("slippage tolerance above 100%"));
    }
    check_position(pool, position)?;

    let receipt = if pool.total_shares == 0 {
        let shares = sqrt_product(token_amount, nft_amount);
        if shares == 0 {
            return Err(LaunchpadError::InvalidInput("deposit too small to issue shares"));
        }
        LiquidityReceipt {
            shares_issued: shares,
            token_used: token_amount,
            nft_used: nft_amount,
            token_refund: 0,
            nft_refund: 0,
        }
    } else {
        if pool.nft_reserve == 0 || pool.token_reserve == 0 {
            return Err(LaunchpadError::PoolInactive);
        }
        // Deposit ratio against pool ratio
        let deviation = price_change_bps(
            pool.token_reserve,
            pool.nft_reserve,
            token_amount,
            nft_amount,
        )?;
        if deviation > slippage_bps as u64 {
            return Err(LaunchpadError::SlippageExceeded {
                deviation_bps: deviation,
                tolerance_bps: slippage_bps as u64,
            });
        }

        let by_token = mul_div(
            token_amount,
            pool.total_shares,
            pool.token_reserve,
            Rounding::PAYOUT,
        )?;
        let by_nft = mul_div(nft_amount, pool.total_shares, pool.nft_reserve, Rounding::PAYOUT)?;
        let shares = by_token.min(by_nft);
        if shares == 0 {
            return Err(LaunchpadError::InvalidInput("deposit too small to issue shares"));
        }

        let token_used = mul_div(shares, pool.token_reserve, pool.total_shares, Rounding::COLLECT)?;
        let nft_used = mul_div(shares, pool.nft_reserve, pool.total_shares, Rounding::COLLECT)?;
        LiquidityReceipt {
            shares_issued: shares,
            token_used,
            nft_used,
            token_refund: safe_sub_u128(token_amount, token_used)?,
            nft_refund: safe_sub_u128(nft_amount, nft_used)?,
        }
    };

    let next = LiquidityPool {
        nft_reserve: safe_add_u128(pool.nft_reserve, receipt.nft_used)?,
        token_reserve: safe_add_u128(pool.token_reserve, receipt.token_used)?,
        total_shares: safe_add_u128(pool.total_shares, receipt.shares_issued)?,
        status: PoolStatus::Active,
        version: safe_add_u64(pool.version, 1)?,
        ..pool.clone()
    };
    let position = LiquidityPosition {
        shares: safe_add_u128(position.shares, receipt.shares_issued)?,
        ..position.clone()
    };
    log::debug!(
        "Added liquidity to {}: {} tokens, {} NFTs for {} shares ({})",
        pool.token,
        receipt.token_used,
        receipt.nft_used,
        receipt.shares_issued,
        position.provider
    );
    Ok((next, position, receipt))
}

/// Burn `shares` of a position for its pro-rata slice of both reserves
pub fn remove_liquidity(
    pool: &LiquidityPool,
    position: &LiquidityPosition,
    shares: u128,
) -> CoreResult<(LiquidityPool, LiquidityPosition, Withdrawal)> {
    if shares == 0 {
        return Err(LaunchpadError::InvalidInput("share amount must be positive"));
    }
    check_position(pool, position)?;
    if shares > position.shares {
        return Err(LaunchpadError::InsufficientShares {
            required: shares,
            available: position.shares,
        });
    }
    if shares > pool.total_shares {
        return Err(LaunchpadError::InconsistentState("position holds more shares than the pool"));
    }

    let token_amount = mul_div(pool.token_reserve, shares, pool.total_shares, Rounding::PAYOUT)?;
    let nft_amount = mul_div(pool.nft_reserve, shares, pool.total_shares, Rounding::PAYOUT)?;

    let mut next = LiquidityPool {
        nft_reserve: safe_sub_u128(pool.nft_reserve, nft_amount)?,
        token_reserve: safe_sub_u128(pool.token_reserve, token_amount)?,
        total_shares: safe_sub_u128(pool.total_shares, shares)?,
        version: safe_add_u64(pool.version, 1)?,
        ..pool.clone()
    };
    if next.total_shares == 0 || next.nft_reserve == 0 || next.token_reserve == 0 {
        log::warn!("Pool {} drained", pool.token);
        next.status = PoolStatus::Drained;
    }

    let position = LiquidityPosition {
        shares: position.shares - shares,
        ..position.clone()
    };
    log::debug!(
        "Removed liquidity from {}: {} shares for {} tokens, {} NFTs",
        pool.token,
        shares,
        token_amount,
        nft_amount
    );
    Ok((
        next,
        position,
        Withdrawal {
            shares_burned: shares,
            token_amount,
            nft_amount,
        },
    ))
}

/// Compare the pool's share count with the positions recorded against it.
/// Positions for other pools are ignored.
pub fn audit_positions<'a, I>(pool: &LiquidityPool, positions: I) -> CoreResult<ShareAudit>
where
    I: IntoIterator<Item = &'a LiquidityPosition>,
{
    let mut position_shares = 0u128;
    let mut count = 0usize;
    for position in positions.into_iter().filter(|p| p.token == pool.token) {
        position_shares = safe_add_u128(position_shares, position.shares)?;
        count += 1;
    }
    Ok(ShareAudit {
        pool_shares: pool.total_shares,
        position_shares,
        positions: count,
    })
}
