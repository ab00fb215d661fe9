//! JSON book of engine snapshots.
//!
//! The keeper is the only writer of its book file. Each table enforces the
//! engine's optimistic version check, and the whole book is written back
//! atomically once a command has succeeded.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use launchpad_core::bridge::{LiquidityPool, LiquidityPosition, TokenRegistry};
use launchpad_core::curve::{CurveConfig, CurveState};
use launchpad_core::sequencer::TokenSequence;
use launchpad_core::store::check_version;
use launchpad_core::types::Versioned;
use launchpad_core::{CoreResult, LaunchpadError, SnapshotStore};
use serde::{Deserialize, Serialize};

use crate::error::KeeperResult;

/// Versioned snapshots keyed by name
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct BookTable<S> {
    entries: BTreeMap<String, S>,
}

impl<S> Default for BookTable<S> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<S> BookTable<S> {
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&S> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &S)> {
        self.entries.iter()
    }

    pub fn values(&self) -> impl Iterator<Item = &S> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Versioned + Clone> SnapshotStore<String, S> for BookTable<S> {
    fn load(&self, key: &String) -> CoreResult<S> {
        self.entries
            .get(key)
            .cloned()
            .ok_or_else(|| LaunchpadError::NotFound(key.clone()))
    }

    fn insert(&mut self, key: String, snapshot: S) -> CoreResult<()> {
        if self.entries.contains_key(&key) {
            return Err(LaunchpadError::InconsistentState("key already present"));
        }
        self.entries.insert(key, snapshot);
        Ok(())
    }

    fn save(&mut self, key: String, snapshot: S, expected_version: u64) -> CoreResult<()> {
        let stored = self
            .entries
            .get(&key)
            .ok_or_else(|| LaunchpadError::NotFound(key.clone()))?;
        check_version(stored.version(), expected_version, snapshot.version())?;
        self.entries.insert(key, snapshot);
        Ok(())
    }
}

/// A collection's immutable curve and display name
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CollectionRecord {
    pub name: String,
    pub curve: CurveConfig,
}

/// Everything the keeper persists
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Book {
    pub collections: BTreeMap<String, CollectionRecord>,
    pub curves: BookTable<CurveState>,
    pub sequences: BookTable<TokenSequence>,
    pub pools: BookTable<LiquidityPool>,
    /// Keyed by `position_key(token, provider)`
    pub positions: BTreeMap<String, LiquidityPosition>,
    pub registry: TokenRegistry,
}

/// Book key of a provider's position in a pool
pub fn position_key(token: &str, provider: &str) -> String {
    format!("{}:{}", token, provider)
}

impl Book {
    /// Read a book file; a missing file is an empty book
    pub fn open(path: &Path) -> KeeperResult<Self> {
        if !path.exists() {
            log::info!("No book at {}, starting empty", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let book: Book = serde_json::from_str(&content)?;
        log::debug!(
            "Opened book {}: {} collections, {} pools",
            path.display(),
            book.collections.len(),
            book.pools.len()
        );
        Ok(book)
    }

    /// Write the book through a temporary file and rename it into place
    pub fn persist(&self, path: &Path) -> KeeperResult<()> {
        let content = serde_json::to_string_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Positions recorded for `token`
    pub fn positions_for<'a>(
        &'a self,
        token: &'a str,
    ) -> impl Iterator<Item = &'a LiquidityPosition> {
        self.positions.values().filter(move |p| p.token == token)
    }
}
