//! # Core Error Types
//!
//! Every engine operation returns a [`CoreResult`]. Failures are grouped into
//! the coarse [`ErrorKind`] taxonomy so callers can decide whether to re-quote,
//! reject the request or escalate.

use thiserror::Error;

/// Engine errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(serde::Serialize))]
pub enum LaunchpadError {
    // ========================================================================
    // Math Errors
    // ========================================================================

    #[error("Math overflow")]
    Overflow,

    #[error("Math underflow")]
    Underflow,

    #[error("Division by zero")]
    DivisionByZero,

    // ========================================================================
    // Validation Errors
    // ========================================================================

    #[error("Invalid input: {0}")]
    InvalidInput(&'static str),

    #[error("Invalid config '{parameter}': {reason}")]
    InvalidConfig {
        parameter: &'static str,
        reason: &'static str,
    },

    #[error("Trade too large: {size} (max {max})")]
    TradeTooLarge { size: u128, max: u128 },

    #[error("Excessive price impact: {impact_bps} bps (max {max_bps} bps)")]
    ExcessivePriceImpact { impact_bps: u64, max_bps: u64 },

    #[error("Deposit ratio off by {deviation_bps} bps (tolerance {tolerance_bps} bps)")]
    SlippageExceeded { deviation_bps: u64, tolerance_bps: u64 },

    #[error("Quote does not apply to this operation: {0}")]
    QuoteMismatch(&'static str),

    // ========================================================================
    // Liquidity Errors
    // ========================================================================

    #[error("Insufficient liquidity: need {required}, have {available}")]
    InsufficientLiquidity { required: u128, available: u128 },

    #[error("Pool is not active")]
    PoolInactive,

    #[error("Insufficient shares: need {required}, position holds {available}")]
    InsufficientShares { required: u128, available: u128 },

    // ========================================================================
    // State Errors
    // ========================================================================

    #[error("Stale state: quote taken at version {expected}, snapshot is at {found}")]
    StaleState { expected: u64, found: u64 },

    #[error("Inconsistent state: {0}")]
    InconsistentState(&'static str),

    #[error("Unknown key: {0}")]
    NotFound(String),

    // ========================================================================
    // Sequencer Errors
    // ========================================================================

    #[error("Token sequence is locked")]
    SequenceLocked,

    #[error("Supply exceeded: total supply is {total_supply}")]
    SupplyExceeded { total_supply: u64 },

    // ========================================================================
    // Authorization Errors
    // ========================================================================

    #[error("Unauthorized: {actor}")]
    Unauthorized { actor: String },
}

/// Result type using core errors
pub type CoreResult<T> = Result<T, LaunchpadError>;

/// Coarse failure classes a caller acts on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorKind {
    InvalidInput,
    InsufficientLiquidity,
    Overflow,
    StaleState,
    SequenceLocked,
    SupplyExceeded,
    Unauthorized,
}

impl LaunchpadError {
    /// Map onto the coarse taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Overflow | Self::Underflow | Self::DivisionByZero => ErrorKind::Overflow,
            Self::InvalidInput(_)
            | Self::InvalidConfig { .. }
            | Self::TradeTooLarge { .. }
            | Self::ExcessivePriceImpact { .. }
            | Self::SlippageExceeded { .. }
            | Self::QuoteMismatch(_)
            | Self::InconsistentState(_)
            | Self::NotFound(_) => ErrorKind::InvalidInput,
            Self::InsufficientLiquidity { .. }
            | Self::PoolInactive
            | Self::InsufficientShares { .. } => ErrorKind::InsufficientLiquidity,
            Self::StaleState { .. } => ErrorKind::StaleState,
            Self::SequenceLocked => ErrorKind::SequenceLocked,
            Self::SupplyExceeded { .. } => ErrorKind::SupplyExceeded,
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
        }
    }

    /// Only a stale commit is worth retrying, and only with a fresh quote
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StaleState { .. })
    }

    /// Create an invalid config error
    pub fn invalid_config(parameter: &'static str, reason: &'static str) -> Self {
        Self::InvalidConfig { parameter, reason }
    }

    /// Create a stale state error
    pub fn stale(expected: u64, found: u64) -> Self {
        Self::StaleState { expected, found }
    }

    /// Create an unauthorized error for the given actor
    pub fn unauthorized(actor: &str) -> Self {
        Self::Unauthorized {
            actor: actor.to_string(),
        }
    }
}
