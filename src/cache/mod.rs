//! Content cache - an owned, versioned map from entry id to fetched content.
//!
//! Writes are tagged with the [`Generation`] of the batch that produced them.
//! Only the latest generation handed out by [`CacheStore::begin_batch`] may
//! write, and a write whose serialized form equals the current cache is a
//! no-op: no version bump, no `cache.updated` event.

mod store;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::content::CachedContent;

pub use store::{CacheStore, CACHE_UPDATED};

/// Token identifying one fetch batch. Strictly increasing per store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Generation(pub u64);

impl Generation {
    pub fn next(self) -> Self {
        Generation(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gen-{}", self.0)
    }
}

/// Immutable cache snapshot. Replaced wholesale on every accepted change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentCache {
    entries: BTreeMap<u64, CachedContent>,
    version: u64,
}

impl ContentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of accepted replacements that produced this snapshot.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn get(&self, id: u64) -> Option<&CachedContent> {
        self.entries.get(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, &CachedContent)> {
        self.entries.iter().map(|(id, content)| (*id, content))
    }

    pub fn missing_count(&self) -> usize {
        self.entries.values().filter(|c| c.is_missing()).count()
    }

    /// Current entries overlaid with `results`; later results win.
    fn overlay(&self, results: impl IntoIterator<Item = (u64, CachedContent)>) -> BTreeMap<u64, CachedContent> {
        let mut entries = self.entries.clone();
        entries.extend(results);
        entries
    }

    fn fingerprint(entries: &BTreeMap<u64, CachedContent>) -> Result<Vec<u8>, CacheError> {
        serde_json::to_vec(entries).map_err(|e| CacheError::Serde(e.to_string()))
    }
}

/// What [`CacheStore::apply`] did with a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The cache was replaced; carries the new version.
    Updated { version: u64 },
    /// The candidate serialized identically to the current cache.
    Unchanged,
    /// A newer batch was started after this one; results discarded.
    Stale { latest: Generation },
}

impl ApplyOutcome {
    pub fn is_updated(&self) -> bool {
        matches!(self, ApplyOutcome::Updated { .. })
    }
}

/// Payload of the `cache.updated` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheUpdated {
    pub version: u64,
    pub generation: u64,
    pub entries: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    LockPoisoned(&'static str),
    Serde(String),
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheError::LockPoisoned(operation) => {
                write!(f, "cache lock poisoned during {}", operation)
            }
            CacheError::Serde(msg) => write!(f, "cache serialization error: {}", msg),
        }
    }
}

impl std::error::Error for CacheError {}
