//! Token sequence records and read-only queries.

use std::collections::BTreeMap;

#[cfg(feature = "client")]
use serde::{Deserialize, Serialize};

use crate::constants::FIRST_TOKEN_ID;
use crate::types::Versioned;

/// Metadata recorded when a token id is reserved
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct LockedTokenMetadata {
    pub token_id: u64,
    pub collection: String,
    pub mint_address: String,
    pub metadata_uri: String,
    /// Wallet that reserved the id
    pub reserved_by: String,
    /// Unix timestamp (seconds) supplied by the caller
    pub reserved_at: i64,
}

/// Identifier issuance state of one collection
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct TokenSequence {
    pub collection: String,
    /// Next id to hand out
    pub next_id: u64,
    /// Highest id that may ever be issued
    pub total_supply: u64,
    pub locked: bool,
    pub locked_at: Option<i64>,
    pub locked_by: Option<String>,
    pub reservations: BTreeMap<u64, LockedTokenMetadata>,
    pub version: u64,
}

/// Summary of a sequence
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct SequenceStatus {
    pub collection: String,
    pub next_token_id: u64,
    pub total_supply: u64,
    pub reserved: u64,
    pub remaining: u64,
    pub locked: bool,
}

impl TokenSequence {
    pub fn new(collection: impl Into<String>, total_supply: u64) -> Self {
        Self {
            collection: collection.into(),
            next_id: FIRST_TOKEN_ID,
            total_supply,
            locked: false,
            locked_at: None,
            locked_by: None,
            reservations: BTreeMap::new(),
            version: 0,
        }
    }

    pub fn next_token_id(&self) -> u64 {
        self.next_id
    }

    pub fn reserved_count(&self) -> u64 {
        self.reservations.len() as u64
    }

    pub fn locked_metadata(&self, token_id: u64) -> Option<&LockedTokenMetadata> {
        self.reservations.get(&token_id)
    }

    /// Reserved tokens in ascending id order
    pub fn reserved_tokens(&self) -> impl Iterator<Item = &LockedTokenMetadata> {
        self.reservations.values()
    }

    pub fn status(&self) -> SequenceStatus {
        let reserved = self.reserved_count();
        SequenceStatus {
            collection: self.collection.clone(),
            next_token_id: self.next_id,
            total_supply: self.total_supply,
            reserved,
            remaining: self.total_supply.saturating_sub(reserved),
            locked: self.locked,
        }
    }
}

impl Versioned for TokenSequence {
    fn version(&self) -> u64 {
        self.version
    }
}

/// URL-safe collection name: lowercased words joined by `_`
pub fn collection_slug(collection: &str) -> String {
    collection
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

/// `<base>/<collection slug>/<id>.json`
pub fn metadata_uri(base_uri: &str, collection: &str, token_id: u64) -> String {
    format!(
        "{}/{}/{}.json",
        base_uri.trim_end_matches('/'),
        collection_slug(collection),
        token_id
    )
}
