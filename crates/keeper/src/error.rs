//! Error types for the keeper service

use launchpad_core::LaunchpadError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum KeeperError {
    #[error(transparent)]
    Engine(#[from] LaunchpadError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown collection: {0}")]
    UnknownCollection(String),

    #[error("Unsupported token: {0}")]
    UnsupportedToken(String),

    #[error("Collection {0} has not revealed; bridge redemption is closed")]
    NotRevealed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type KeeperResult<T> = Result<T, KeeperError>;

impl KeeperError {
    /// Invalid parameter with the offending value and the expectation
    pub fn invalid_parameter(name: &str, value: &str, expected: &str) -> Self {
        KeeperError::InvalidConfig(format!("{} = {} (expected {})", name, value, expected))
    }
}

impl From<serde_json::Error> for KeeperError {
    fn from(err: serde_json::Error) -> Self {
        KeeperError::SerializationError(err.to_string())
    }
}

impl From<toml::de::Error> for KeeperError {
    fn from(err: toml::de::Error) -> Self {
        KeeperError::SerializationError(err.to_string())
    }
}

impl From<toml::ser::Error> for KeeperError {
    fn from(err: toml::ser::Error) -> Self {
        KeeperError::SerializationError(err.to_string())
    }
}
