//! # Engine Constants
//!
//! - Fixed-point scales
//! - Default curve shape for new collections
//! - Bridge fee and liquidity tolerances
//! - Trade limit defaults

// ============================================================================
// Fixed-Point Constants
// ============================================================================

/// Number of decimal places carried by marginal prices
pub const PRICE_DECIMALS: u32 = 9;

/// Marginal price scale: 10^PRICE_DECIMALS
pub const PRICE_SCALE: u128 = 1_000_000_000;

/// Basis points denominator (10,000 = 100%)
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Maximum percentage in basis points (100%)
pub const MAX_BPS: u16 = 10_000;

// ============================================================================
// Curve Defaults
// ============================================================================

/// Default virtual base-currency reserve (30M)
pub const DEFAULT_VIRTUAL_RESERVE: u128 = 30_000_000;

/// Default virtual NFT supply (1B)
pub const DEFAULT_VIRTUAL_SUPPLY: u128 = 1_000_000_000;

/// Default raised amount at which a collection reveals (10M)
pub const DEFAULT_REVEAL_CAP: u128 = 10_000_000;

/// Default total trading fee (1%)
pub const DEFAULT_FEE_BPS: u16 = 100;

/// Default creator share of the trading fee (0.5%)
pub const DEFAULT_CREATOR_FEE_BPS: u16 = 50;

/// Default platform share of the trading fee (0.5%)
pub const DEFAULT_PLATFORM_FEE_BPS: u16 = 50;

/// Sample count used when charting without an explicit count
pub const DEFAULT_CHART_SAMPLES: usize = 100;

// ============================================================================
// Bridge Constants
// ============================================================================

/// Bridge fee taken from swap output (0.5%)
pub const BRIDGE_FEE_BPS: u16 = 50;

/// Default ratio tolerance for follow-up liquidity deposits (1%)
pub const DEFAULT_LIQUIDITY_SLIPPAGE_BPS: u16 = 100;

// ============================================================================
// Trade Limit Defaults
// ============================================================================

/// Largest single trade as a share of virtual supply (5%)
pub const DEFAULT_MAX_TRADE_SHARE_BPS: u16 = 500;

/// Largest single trade in NFT units
pub const DEFAULT_MAX_TRADE_ABSOLUTE: u128 = 100;

/// Largest tolerated price impact (50%)
pub const DEFAULT_MAX_PRICE_IMPACT_BPS: u64 = 5_000;

// ============================================================================
// Sequencer Constants
// ============================================================================

/// First token id issued by a fresh sequence
pub const FIRST_TOKEN_ID: u64 = 1;

/// Default metadata host for reserved tokens
pub const DEFAULT_METADATA_BASE_URI: &str = "https://metadata.launchonlos.fun";
