//! Supported bridge tokens and cross-pool statistics.

use std::collections::BTreeMap;

#[cfg(feature = "client")]
use serde::{Deserialize, Serialize};

use crate::bridge::pool::{LiquidityPool, PoolStatus};
use crate::errors::{CoreResult, LaunchpadError};
use crate::math::{safe_add_u128, safe_add_u64};

/// A token NFTs can be redeemed for
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct SupportedToken {
    pub mint: String,
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
    pub active: bool,
}

impl SupportedToken {
    pub fn new(
        mint: impl Into<String>,
        symbol: impl Into<String>,
        name: impl Into<String>,
        decimals: u8,
    ) -> Self {
        Self {
            mint: mint.into(),
            symbol: symbol.into(),
            name: name.into(),
            decimals,
            active: true,
        }
    }
}

/// Tokens keyed by mint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct TokenRegistry {
    tokens: BTreeMap<String, SupportedToken>,
}

impl TokenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, token: SupportedToken) -> CoreResult<()> {
        if token.mint.is_empty() || token.symbol.is_empty() {
            return Err(LaunchpadError::InvalidInput("token mint and symbol are required"));
        }
        if self.tokens.contains_key(&token.mint) {
            return Err(LaunchpadError::InvalidInput("token already registered"));
        }
        log::debug!("Registered bridge token {} ({})", token.symbol, token.mint);
        self.tokens.insert(token.mint.clone(), token);
        Ok(())
    }

    /// Stop accepting a token; its record and pool stay for accounting
    pub fn deactivate(&mut self, mint: &str) -> CoreResult<()> {
        let token = self
            .tokens
            .get_mut(mint)
            .ok_or_else(|| LaunchpadError::NotFound(mint.to_string()))?;
        token.active = false;
        Ok(())
    }

    pub fn get(&self, mint: &str) -> Option<&SupportedToken> {
        self.tokens.get(mint)
    }

    /// Registered and still active
    pub fn is_supported(&self, mint: &str) -> bool {
        self.get(mint).map_or(false, |t| t.active)
    }

    pub fn active(&self) -> impl Iterator<Item = &SupportedToken> {
        self.tokens.values().filter(|t| t.active)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Volume of a single pool
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct TokenVolume {
    pub token: String,
    pub nft_volume: u128,
    pub token_volume: u128,
}

/// Bridge-wide summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct BridgeStatistics {
    /// NFTs redeemed across all pools
    pub total_nft_volume: u128,
    pub total_trades: u64,
    /// NFTs held across all pools
    pub total_nft_liquidity: u128,
    pub active_pools: usize,
    pub active_tokens: usize,
    /// Pools ranked by NFT volume, highest first
    pub top_tokens: Vec<TokenVolume>,
}

/// Summarise every pool. Token-side figures are per pool since the tokens
/// are not commensurable.
pub fn bridge_statistics<'a, I>(pools: I, registry: &TokenRegistry) -> CoreResult<BridgeStatistics>
where
    I: IntoIterator<Item = &'a LiquidityPool>,
{
    let mut stats = BridgeStatistics {
        active_tokens: registry.active().count(),
        ..BridgeStatistics::default()
    };
    for pool in pools {
        stats.total_nft_volume = safe_add_u128(stats.total_nft_volume, pool.nft_volume)?;
        stats.total_trades = safe_add_u64(stats.total_trades, pool.trade_count)?;
        stats.total_nft_liquidity = safe_add_u128(stats.total_nft_liquidity, pool.nft_reserve)?;
        if pool.status == PoolStatus::Active {
            stats.active_pools += 1;
        }
        stats.top_tokens.push(TokenVolume {
            token: pool.token.clone(),
            nft_volume: pool.nft_volume,
            token_volume: pool.token_volume,
        });
    }
    stats
        .top_tokens
        .sort_by(|a, b| b.nft_volume.cmp(&a.nft_volume).then_with(|| a.token.cmp(&b.token)));
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> TokenRegistry {
        let mut registry = TokenRegistry::new();
        registry
            .register(SupportedToken::new("usdc-mint", "USDC", "USD Coin", 6))
            .unwrap();
        registry
            .register(SupportedToken::new("bonk-mint", "BONK", "Bonk", 5))
            .unwrap();
        registry
    }

    #[test]
    fn test_registry() {
        let mut registry = registry();
        assert!(registry.is_supported("usdc-mint"));
        assert!(registry
            .register(SupportedToken::new("usdc-mint", "USDC", "USD Coin", 6))
            .is_err());

        registry.deactivate("bonk-mint").unwrap();
        assert!(!registry.is_supported("bonk-mint"));
        assert_eq!(registry.active().count(), 1);
        assert_eq!(registry.len(), 2);
        assert!(matches!(
            registry.deactivate("nope"),
            Err(LaunchpadError::NotFound(_))
        ));
    }

    #[test]
    fn test_statistics_rank_by_volume() {
        let usdc = LiquidityPool {
            nft_reserve: 40,
            nft_volume: 10,
            trade_count: 2,
            status: PoolStatus::Active,
            ..LiquidityPool::new("usdc-mint")
        };
        let bonk = LiquidityPool {
            nft_reserve: 60,
            nft_volume: 25,
            trade_count: 3,
            status: PoolStatus::Drained,
            ..LiquidityPool::new("bonk-mint")
        };

        let stats = bridge_statistics([&usdc, &bonk], &registry()).unwrap();
        assert_eq!(stats.total_nft_volume, 35);
        assert_eq!(stats.total_trades, 5);
        assert_eq!(stats.total_nft_liquidity, 100);
        assert_eq!(stats.active_pools, 1);
        assert_eq!(stats.active_tokens, 2);
        assert_eq!(stats.top_tokens[0].token, "bonk-mint");
    }
}
