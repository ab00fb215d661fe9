//! Standalone consistency audit of a token sequence. Findings are reported,
//! never repaired.

use std::fmt;

#[cfg(feature = "client")]
use serde::{Deserialize, Serialize};

use crate::constants::FIRST_TOKEN_ID;
use crate::sequencer::sequence::TokenSequence;

/// A single audit finding
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub enum ConsistencyIssue {
    /// Ids `first..=last` below `next_id` have no reservation
    Gap { first: u64, last: u64 },
    /// Reservation outside `[1, next_id - 1]`
    OutOfRange { token_id: u64 },
    /// Reservation stored under a different id than it records
    KeyMismatch { key: u64, token_id: u64 },
    /// Reservation recorded for another collection
    ForeignCollection { token_id: u64 },
    /// `next_id` is not the reserved count plus one
    NextIdMismatch { next_id: u64, expected: u64 },
    /// More ids issued than the supply allows
    SupplyOverrun { issued: u64, total_supply: u64 },
}

impl fmt::Display for ConsistencyIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gap { first, last } if first == last => write!(f, "missing token {}", first),
            Self::Gap { first, last } => write!(f, "missing tokens {}..={}", first, last),
            Self::OutOfRange { token_id } => {
                write!(f, "token {} is outside the issued range", token_id)
            }
            Self::KeyMismatch { key, token_id } => {
                write!(f, "slot {} holds metadata for token {}", key, token_id)
            }
            Self::ForeignCollection { token_id } => {
                write!(f, "token {} belongs to another collection", token_id)
            }
            Self::NextIdMismatch { next_id, expected } => {
                write!(f, "next id is {}, expected {}", next_id, expected)
            }
            Self::SupplyOverrun { issued, total_supply } => {
                write!(f, "{} ids issued against a supply of {}", issued, total_supply)
            }
        }
    }
}

/// Audit result
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct ConsistencyReport {
    pub valid: bool,
    pub issues: Vec<ConsistencyIssue>,
}

/// Check that reservations form exactly `[1, next_id - 1]` within the supply.
/// Linear in the number of reservations.
pub fn validate_consistency(sequence: &TokenSequence) -> ConsistencyReport {
    let mut issues = Vec::new();
    let mut expected = FIRST_TOKEN_ID;

    for (&key, metadata) in &sequence.reservations {
        if metadata.token_id != key {
            issues.push(ConsistencyIssue::KeyMismatch {
                key,
                token_id: metadata.token_id,
            });
        }
        if metadata.collection != sequence.collection {
            issues.push(ConsistencyIssue::ForeignCollection { token_id: key });
        }
        if key < FIRST_TOKEN_ID || key >= sequence.next_id {
            issues.push(ConsistencyIssue::OutOfRange { token_id: key });
            continue;
        }
        if key > expected {
            issues.push(ConsistencyIssue::Gap {
                first: expected,
                last: key - 1,
            });
        }
        expected = key + 1;
    }
    if expected < sequence.next_id {
        issues.push(ConsistencyIssue::Gap {
            first: expected,
            last: sequence.next_id - 1,
        });
    }

    let reserved = sequence.reserved_count();
    let next_expected = reserved.saturating_add(FIRST_TOKEN_ID);
    if sequence.next_id != next_expected {
        issues.push(ConsistencyIssue::NextIdMismatch {
            next_id: sequence.next_id,
            expected: next_expected,
        });
    }

    let issued = sequence.next_id.saturating_sub(FIRST_TOKEN_ID);
    if issued > sequence.total_supply {
        issues.push(ConsistencyIssue::SupplyOverrun {
            issued,
            total_supply: sequence.total_supply,
        });
    }

    ConsistencyReport {
        valid: issues.is_empty(),
        issues,
    }
}
