use std::collections::HashSet;
use std::fs;

use launchpad_core::constants::*;
use launchpad_core::curve::{CurveConfig, TradeLimits};
use launchpad_core::sequencer::collection_slug;
use launchpad_core::Authority;
use serde::{Deserialize, Serialize};

use crate::error::{KeeperError, KeeperResult};

/// Keeper configuration loaded from TOML file
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LaunchpadConfig {
    /// JSON book holding every snapshot
    pub book_path: String,

    /// Base for reserved token metadata URIs
    pub metadata_base_uri: String,

    /// Actors allowed to lock, unlock and resize sequences
    #[serde(default)]
    pub admins: Vec<String>,

    /// Curve used for collections without an override
    pub curve: CurveSettings,

    pub bridge: BridgeSettings,

    pub limits: LimitsSettings,

    /// Tokens NFTs can be redeemed for
    #[serde(default)]
    pub tokens: Vec<TokenSettings>,

    /// Collections to provision
    #[serde(default)]
    pub collections: Vec<CollectionSettings>,
}

/// Bonding curve parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct CurveSettings {
    pub virtual_reserve: u64,
    pub virtual_supply: u64,
    pub reveal_cap: u64,
    /// Total trading fee (basis points)
    pub fee_bps: u16,
    pub creator_fee_bps: u16,
    pub platform_fee_bps: u16,
}

/// Bridge pool parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct BridgeSettings {
    /// Fee on swap output for newly created pools (basis points)
    pub fee_bps: u16,
    /// Default ratio tolerance for liquidity deposits (basis points)
    pub max_slippage_bps: u16,
}

/// Per-trade guards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct LimitsSettings {
    pub enabled: bool,
    pub max_trade_share_bps: u16,
    /// 0 disables the absolute cap
    pub max_trade_absolute: u64,
    pub max_price_impact_bps: u64,
}

/// Supported bridge token
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TokenSettings {
    pub mint: String,
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
}

/// Collection to provision on startup
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CollectionSettings {
    pub name: String,
    pub total_supply: u64,
    /// Overrides the default curve
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curve: Option<CurveSettings>,
}

impl LaunchpadConfig {
    /// Load configuration from TOML file
    pub fn load(path: &str) -> KeeperResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            KeeperError::InvalidConfig(format!("Failed to read config file {}: {}", path, e))
        })?;

        let config: LaunchpadConfig = toml::from_str(&content)?;
        config.validate()?;

        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save(&self, path: &str) -> KeeperResult<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> KeeperResult<()> {
        if self.book_path.is_empty() {
            return Err(KeeperError::invalid_parameter("book_path", "empty", "a file path"));
        }

        if !self.metadata_base_uri.starts_with("http://")
            && !self.metadata_base_uri.starts_with("https://")
        {
            return Err(KeeperError::invalid_parameter(
                "metadata_base_uri",
                &self.metadata_base_uri,
                "an http(s) URL",
            ));
        }

        self.curve.validate("curve")?;
        self.bridge.validate()?;
        self.limits.validate()?;

        let mut mints = HashSet::new();
        for token in &self.tokens {
            if token.mint.is_empty() || token.symbol.is_empty() {
                return Err(KeeperError::invalid_parameter(
                    "tokens.mint",
                    "empty",
                    "mint and symbol",
                ));
            }
            if !mints.insert(token.mint.as_str()) {
                return Err(KeeperError::invalid_parameter(
                    "tokens.mint",
                    &token.mint,
                    "unique mints",
                ));
            }
        }

        // Collections are keyed by slug in the book
        let mut slugs = HashSet::new();
        for collection in &self.collections {
            if collection.name.trim().is_empty() {
                return Err(KeeperError::invalid_parameter(
                    "collections.name",
                    "empty",
                    "non-empty string",
                ));
            }
            if !slugs.insert(collection_slug(&collection.name)) {
                return Err(KeeperError::invalid_parameter(
                    "collections.name",
                    &collection.name,
                    "unique slugs",
                ));
            }
            if collection.total_supply == 0 {
                return Err(KeeperError::invalid_parameter(
                    "collections.total_supply",
                    "0",
                    "greater than 0",
                ));
            }
            if let Some(curve) = &collection.curve {
                curve.validate("collections.curve")?;
            }
        }

        Ok(())
    }

    /// Curve for a collection, falling back to the default
    pub fn curve_for(&self, collection: &str) -> CurveConfig {
        self.collections
            .iter()
            .find(|c| c.name == collection)
            .and_then(|c| c.curve)
            .unwrap_or(self.curve)
            .to_curve_config()
    }

    /// Authorization verdict for `actor`
    pub fn authority(&self, actor: &str) -> Authority {
        if self.admins.iter().any(|admin| admin == actor) {
            Authority::verified(actor)
        } else {
            Authority::unverified(actor)
        }
    }
}

impl CurveSettings {
    pub fn to_curve_config(&self) -> CurveConfig {
        CurveConfig {
            virtual_reserve: self.virtual_reserve as u128,
            virtual_supply: self.virtual_supply as u128,
            reveal_cap: self.reveal_cap as u128,
            fee_bps: self.fee_bps,
            creator_fee_bps: self.creator_fee_bps,
            platform_fee_bps: self.platform_fee_bps,
        }
    }

    fn validate(&self, section: &str) -> KeeperResult<()> {
        self.to_curve_config().validate().map_err(|e| {
            KeeperError::invalid_parameter(section, &e.to_string(), "a valid curve")
        })
    }
}

impl BridgeSettings {
    fn validate(&self) -> KeeperResult<()> {
        if self.fee_bps > MAX_BPS {
            return Err(KeeperError::invalid_parameter(
                "bridge.fee_bps",
                &self.fee_bps.to_string(),
                "at most 10000 (100%)",
            ));
        }
        if self.max_slippage_bps > MAX_BPS {
            return Err(KeeperError::invalid_parameter(
                "bridge.max_slippage_bps",
                &self.max_slippage_bps.to_string(),
                "at most 10000 (100%)",
            ));
        }
        Ok(())
    }
}

impl LimitsSettings {
    pub fn to_trade_limits(&self) -> TradeLimits {
        TradeLimits {
            max_trade_share_bps: self.max_trade_share_bps,
            max_trade_absolute: self.max_trade_absolute as u128,
            max_price_impact_bps: self.max_price_impact_bps,
        }
    }

    /// Active limits, if enabled
    pub fn active(&self) -> Option<TradeLimits> {
        self.enabled.then(|| self.to_trade_limits())
    }

    fn validate(&self) -> KeeperResult<()> {
        if !self.enabled {
            return Ok(());
        }
        self.to_trade_limits().validate().map_err(|e| {
            KeeperError::invalid_parameter("limits", &e.to_string(), "valid trade limits")
        })
    }
}

impl Default for LaunchpadConfig {
    fn default() -> Self {
        Self {
            book_path: "launchpad-book.json".to_string(),
            metadata_base_uri: DEFAULT_METADATA_BASE_URI.to_string(),
            admins: vec![],
            curve: CurveSettings::default(),
            bridge: BridgeSettings::default(),
            limits: LimitsSettings::default(),
            tokens: vec![],
            collections: vec![],
        }
    }
}

impl Default for CurveSettings {
    fn default() -> Self {
        Self {
            virtual_reserve: DEFAULT_VIRTUAL_RESERVE as u64,
            virtual_supply: DEFAULT_VIRTUAL_SUPPLY as u64,
            reveal_cap: DEFAULT_REVEAL_CAP as u64,
            fee_bps: DEFAULT_FEE_BPS,
            creator_fee_bps: DEFAULT_CREATOR_FEE_BPS,
            platform_fee_bps: DEFAULT_PLATFORM_FEE_BPS,
        }
    }
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            fee_bps: BRIDGE_FEE_BPS,
            max_slippage_bps: DEFAULT_LIQUIDITY_SLIPPAGE_BPS,
        }
    }
}

impl Default for LimitsSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            max_trade_share_bps: DEFAULT_MAX_TRADE_SHARE_BPS,
            max_trade_absolute: DEFAULT_MAX_TRADE_ABSOLUTE as u64,
            max_price_impact_bps: DEFAULT_MAX_PRICE_IMPACT_BPS,
        }
    }
}

/// Create example configuration file
pub fn create_example_config(path: &str) -> KeeperResult<()> {
    let example_config = LaunchpadConfig {
        admins: vec!["launch-admin".to_string()],
        tokens: vec![
            TokenSettings {
                mint: "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v".to_string(),
                symbol: "USDC".to_string(),
                name: "USD Coin".to_string(),
                decimals: 6,
            },
            TokenSettings {
                mint: "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263".to_string(),
                symbol: "BONK".to_string(),
                name: "Bonk".to_string(),
                decimals: 5,
            },
        ],
        collections: vec![
            CollectionSettings {
                name: "Los Bros".to_string(),
                total_supply: 2_222,
                curve: None,
            },
            CollectionSettings {
                name: "Genesis Pass".to_string(),
                total_supply: 500,
                curve: Some(CurveSettings {
                    virtual_reserve: 5_000_000,
                    virtual_supply: 100_000_000,
                    reveal_cap: 2_000_000,
                    ..CurveSettings::default()
                }),
            },
        ],
        ..LaunchpadConfig::default()
    };

    example_config.save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation() {
        let mut config = LaunchpadConfig::default();
        assert!(config.validate().is_ok());

        // Fee split larger than the total fee
        config.curve.creator_fee_bps = 90;
        assert!(config.validate().is_err());

        let mut config = LaunchpadConfig::default();
        config.metadata_base_uri = "ftp://meta".to_string();
        assert!(config.validate().is_err());

        let mut config = LaunchpadConfig::default();
        config.collections.push(CollectionSettings {
            name: "Empty".to_string(),
            total_supply: 0,
            curve: None,
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duplicate_tokens_rejected() {
        let mut config = LaunchpadConfig::default();
        let token = TokenSettings {
            mint: "mint".to_string(),
            symbol: "TKN".to_string(),
            name: "Token".to_string(),
            decimals: 6,
        };
        config.tokens = vec![token.clone(), token];
        assert!(matches!(config.validate(), Err(KeeperError::InvalidConfig(_))));
    }

    #[test]
    fn test_collections_sharing_a_slug_rejected() {
        let mut config = LaunchpadConfig::default();
        config.collections = vec![
            CollectionSettings {
                name: "Los Bros".to_string(),
                total_supply: 3,
                curve: None,
            },
            CollectionSettings {
                name: "los  bros".to_string(),
                total_supply: 50,
                curve: None,
            },
        ];
        assert!(matches!(config.validate(), Err(KeeperError::InvalidConfig(_))));

        config.collections[1].name = "Los Bros Genesis".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_limits_only_checked_when_enabled() {
        let mut config = LaunchpadConfig::default();
        config.limits.max_trade_share_bps = 0;
        assert!(config.validate().is_ok());
        assert!(config.limits.active().is_none());

        config.limits.enabled = true;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_example_config_round_trips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("launchpad.toml");
        let path = path.to_str().unwrap();

        create_example_config(path).unwrap();
        let loaded = LaunchpadConfig::load(path).unwrap();

        assert_eq!(loaded.tokens.len(), 2);
        assert_eq!(loaded.curve_for("Genesis Pass").virtual_reserve, 5_000_000);
        assert_eq!(loaded.curve_for("Los Bros"), CurveConfig::default());
        assert!(loaded.authority("launch-admin").verified);
        assert!(!loaded.authority("someone").verified);
    }
}
