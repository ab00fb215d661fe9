//! # Authority
//!
//! The engine never verifies credentials. Callers make the authorization
//! decision and hand the outcome in; privileged transitions refuse to run
//! on an unverified authority.

#[cfg(feature = "client")]
use serde::{Deserialize, Serialize};

use crate::errors::{CoreResult, LaunchpadError};

/// Caller identity plus the caller's authorization verdict
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct Authority {
    pub actor: String,
    pub verified: bool,
}

impl Authority {
    /// Authority the caller has already checked
    pub fn verified(actor: impl Into<String>) -> Self {
        Self {
            actor: actor.into(),
            verified: true,
        }
    }

    /// Authority the caller could not vouch for
    pub fn unverified(actor: impl Into<String>) -> Self {
        Self {
            actor: actor.into(),
            verified: false,
        }
    }

    /// Fail with `Unauthorized` unless verified
    pub fn require(&self) -> CoreResult<&str> {
        if !self.verified {
            return Err(LaunchpadError::unauthorized(&self.actor));
        }
        Ok(&self.actor)
    }
}
