//! NFT to token swaps against a pool.
//!
//! Same constant-product sell path as the bonding curve, on
//! `(nft_reserve, token_reserve)`. The bridge fee is taken from the token
//! output and stays in the pool, so only the net amount leaves the reserve.

#[cfg(feature = "client")]
use serde::{Deserialize, Serialize};

use crate::bridge::pool::{LiquidityPool, PoolStatus};
use crate::constants::PRICE_SCALE;
use crate::errors::{CoreResult, LaunchpadError};
use crate::math::*;

/// Priced swap of NFTs for a pool's token
///
/// Rounding favors the pool: the token reserve after the swap rounds up, so
/// `gross_token_amount` rounds down, and `fee` rounds up before it is taken
/// from the gross output.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct BridgeQuote {
    pub token: String,
    pub nft_amount: u128,
    /// Token output before the bridge fee
    pub gross_token_amount: u128,
    pub fee: u128,
    /// Token amount paid to the trader
    pub token_amount: u128,
    /// Gross token output per NFT (scaled by PRICE_SCALE)
    pub price_per_nft: u128,
    pub price_impact_bps: u64,
    pub nft_reserve_after: u128,
    pub token_reserve_after: u128,
    pub pool_version: u64,
}

/// Price a swap of `nft_amount` NFTs into the pool
pub fn quote_swap(pool: &LiquidityPool, nft_amount: u128) -> CoreResult<BridgeQuote> {
    if nft_amount == 0 {
        return Err(LaunchpadError::InvalidInput("nft amount must be positive"));
    }
    if !pool.is_quotable() {
        return Err(LaunchpadError::PoolInactive);
    }

    let k = widening_mul(pool.nft_reserve, pool.token_reserve);
    let nft_reserve_after = safe_add_u128(pool.nft_reserve, nft_amount)?;
    let curve_reserve = div_product(k, nft_reserve_after, Rounding::COLLECT)?;
    let gross = safe_sub_u128(pool.token_reserve, curve_reserve)?;

    let fee = apply_bps(gross, pool.fee_bps, Rounding::COLLECT)?;
    let net = safe_sub_u128(gross, fee)?;
    if net == 0 {
        return Err(LaunchpadError::InvalidInput("amount too small to swap"));
    }
    let token_reserve_after = safe_sub_u128(pool.token_reserve, net)?;

    Ok(BridgeQuote {
        token: pool.token.clone(),
        nft_amount,
        gross_token_amount: gross,
        fee,
        token_amount: net,
        price_per_nft: mul_div(gross, PRICE_SCALE, nft_amount, Rounding::PAYOUT)?,
        price_impact_bps: price_change_bps(
            pool.token_reserve,
            pool.nft_reserve,
            curve_reserve,
            nft_reserve_after,
        )?,
        nft_reserve_after,
        token_reserve_after,
        pool_version: pool.version,
    })
}

/// Apply a swap once the NFTs have been received and the tokens sent
pub fn commit_swap(pool: &LiquidityPool, quote: &BridgeQuote) -> CoreResult<LiquidityPool> {
    if quote.token != pool.token {
        return Err(LaunchpadError::QuoteMismatch("quote is for another pool"));
    }
    if quote.pool_version != pool.version {
        log::warn!(
            "Rejected stale swap on {}: quote at version {}, pool at {}",
            pool.token,
            quote.pool_version,
            pool.version
        );
        return Err(LaunchpadError::stale(quote.pool_version, pool.version));
    }
    if pool.status != PoolStatus::Active {
        return Err(LaunchpadError::PoolInactive);
    }

    let next = LiquidityPool {
        nft_reserve: quote.nft_reserve_after,
        token_reserve: quote.token_reserve_after,
        nft_volume: safe_add_u128(pool.nft_volume, quote.nft_amount)?,
        token_volume: safe_add_u128(pool.token_volume, quote.gross_token_amount)?,
        fees_accrued: safe_add_u128(pool.fees_accrued, quote.fee)?,
        trade_count: safe_add_u64(pool.trade_count, 1)?,
        version: safe_add_u64(pool.version, 1)?,
        ..pool.clone()
    };
    log::debug!(
        "Committed swap on {}: {} NFTs in, {} tokens out, fee {}",
        pool.token,
        quote.nft_amount,
        quote.token_amount,
        quote.fee
    );
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(nft: u128, token: u128) -> LiquidityPool {
        LiquidityPool {
            nft_reserve: nft,
            token_reserve: token,
            total_shares: sqrt_product(nft, token),
            status: PoolStatus::Active,
            ..LiquidityPool::new("USDC")
        }
    }

    #[test]
    fn test_quote_swap() {
        let pool = seeded(1_000, 1_000_000);
        let quote = quote_swap(&pool, 10).unwrap();

        // 1e9 / 1010 = 990_099.0099 -> reserve rounds up to 990_100
        assert_eq!(quote.gross_token_amount, 9_900);
        // 0.5% of 9_900 = 49.5 -> 50
        assert_eq!(quote.fee, 50);
        assert_eq!(quote.token_amount, 9_850);
        assert_eq!(quote.token_reserve_after, 990_150);
        assert_eq!(quote.nft_reserve_after, 1_010);
        assert_eq!(quote.price_per_nft, 990 * PRICE_SCALE);
    }

    #[test]
    fn test_quote_swap_rejects() {
        let pool = seeded(1_000, 1_000_000);
        assert!(matches!(quote_swap(&pool, 0), Err(LaunchpadError::InvalidInput(_))));

        let unseeded = LiquidityPool::new("USDC");
        assert_eq!(quote_swap(&unseeded, 10), Err(LaunchpadError::PoolInactive));

        let drained = LiquidityPool {
            status: PoolStatus::Drained,
            ..seeded(1_000, 1_000_000)
        };
        assert_eq!(quote_swap(&drained, 10), Err(LaunchpadError::PoolInactive));
    }

    #[test]
    fn test_commit_swap_retains_fee() {
        let pool = seeded(1_000, 1_000_000);
        let quote = quote_swap(&pool, 10).unwrap();
        let next = commit_swap(&pool, &quote).unwrap();

        assert_eq!(next.token_reserve, 990_150);
        assert_eq!(next.fees_accrued, 50);
        assert_eq!(next.token_volume, 9_900);
        assert_eq!(next.trade_count, 1);
        assert_eq!(next.version, 1);
        assert!(
            widening_mul(next.nft_reserve, next.token_reserve)
                >= widening_mul(pool.nft_reserve, pool.token_reserve)
        );

        assert_eq!(commit_swap(&next, &quote), Err(LaunchpadError::stale(0, 1)));
    }

    #[test]
    fn test_commit_swap_wrong_pool() {
        let pool = seeded(1_000, 1_000_000);
        let quote = quote_swap(&pool, 10).unwrap();
        let other = LiquidityPool {
            token: "BONK".to_string(),
            ..pool
        };
        assert!(matches!(
            commit_swap(&other, &quote),
            Err(LaunchpadError::QuoteMismatch(_))
        ));
    }
}
