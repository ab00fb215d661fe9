//! # Snapshot Store
//!
//! Persistence seam for curve states, pools and sequences. Writes are
//! optimistic: a snapshot is only saved over the version it was derived from,
//! so a commit computed from a stale read is rejected with `StaleState`
//! instead of silently overwriting a newer state.

use std::collections::HashMap;
use std::hash::Hash;

use crate::errors::{CoreResult, LaunchpadError};
use crate::types::Versioned;

/// Durable home for versioned snapshots
pub trait SnapshotStore<K, S: Versioned> {
    /// Fetch the current snapshot for `key`
    fn load(&self, key: &K) -> CoreResult<S>;

    /// Store a brand new snapshot; fails if `key` already exists
    fn insert(&mut self, key: K, snapshot: S) -> CoreResult<()>;

    /// Replace the snapshot at `key` if it is still at `expected_version`
    fn save(&mut self, key: K, snapshot: S, expected_version: u64) -> CoreResult<()>;

    /// Load, transition and save in one step
    fn update<R, F>(&mut self, key: K, transition: F) -> CoreResult<R>
    where
        F: FnOnce(&S) -> CoreResult<(S, R)>,
    {
        let current = self.load(&key)?;
        let expected = current.version();
        let (next, output) = transition(&current)?;
        self.save(key, next, expected)?;
        Ok(output)
    }
}

/// Check an optimistic write against the stored version
pub fn check_version(stored: u64, expected: u64, incoming: u64) -> CoreResult<()> {
    if stored != expected {
        log::warn!("Rejected stale write: expected version {}, store holds {}", expected, stored);
        return Err(LaunchpadError::stale(expected, stored));
    }
    if incoming <= stored {
        return Err(LaunchpadError::InconsistentState("snapshot version did not advance"));
    }
    Ok(())
}

/// In-process store
#[derive(Debug, Clone)]
pub struct MemoryStore<K, S> {
    entries: HashMap<K, S>,
}

impl<K, S> Default for MemoryStore<K, S> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<K, S> MemoryStore<K, S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = &S> {
        self.entries.values()
    }
}

impl<K, S> SnapshotStore<K, S> for MemoryStore<K, S>
where
    K: Eq + Hash + ToString,
    S: Versioned + Clone,
{
    fn load(&self, key: &K) -> CoreResult<S> {
        self.entries
            .get(key)
            .cloned()
            .ok_or_else(|| LaunchpadError::NotFound(key.to_string()))
    }

    fn insert(&mut self, key: K, snapshot: S) -> CoreResult<()> {
        if self.entries.contains_key(&key) {
            return Err(LaunchpadError::InconsistentState("key already present"));
        }
        self.entries.insert(key, snapshot);
        Ok(())
    }

    fn save(&mut self, key: K, snapshot: S, expected_version: u64) -> CoreResult<()> {
        let stored = self
            .entries
            .get(&key)
            .ok_or_else(|| LaunchpadError::NotFound(key.to_string()))?;
        check_version(stored.version(), expected_version, snapshot.version())?;
        self.entries.insert(key, snapshot);
        Ok(())
    }
}
