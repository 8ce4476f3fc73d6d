use std::sync::{Arc, RwLock};

#[cfg(feature = "emitter")]
use std::sync::Mutex;

#[cfg(feature = "emitter")]
use event_emitter_rs::EventEmitter;
use tracing::{debug, info};

use super::{ApplyOutcome, CacheError, CacheUpdated, ContentCache, Generation};
use crate::content::CachedContent;

/// Event name emitted after every accepted cache replacement.
pub const CACHE_UPDATED: &str = "cache.updated";

struct CacheState {
    current: Arc<ContentCache>,
    latest: Generation,
}

/// Single-writer owner of the [`ContentCache`].
///
/// Readers take `Arc` snapshots and never observe a partially applied batch.
/// Clone-friendly via Arc; clones share the same cache and generation counter.
#[derive(Clone)]
pub struct CacheStore {
    state: Arc<RwLock<CacheState>>,
    #[cfg(feature = "emitter")]
    emitter: Arc<Mutex<EventEmitter>>,
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(CacheState {
                current: Arc::new(ContentCache::new()),
                latest: Generation::default(),
            })),
            #[cfg(feature = "emitter")]
            emitter: Arc::new(Mutex::new(EventEmitter::new())),
        }
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> Result<Arc<ContentCache>, CacheError> {
        let state = self
            .state
            .read()
            .map_err(|_| CacheError::LockPoisoned("snapshot"))?;
        Ok(Arc::clone(&state.current))
    }

    /// Start a new batch. Every earlier generation becomes stale.
    pub fn begin_batch(&self) -> Result<Generation, CacheError> {
        let mut state = self
            .state
            .write()
            .map_err(|_| CacheError::LockPoisoned("begin batch"))?;
        state.latest = state.latest.next();
        Ok(state.latest)
    }

    pub fn latest_generation(&self) -> Result<Generation, CacheError> {
        let state = self
            .state
            .read()
            .map_err(|_| CacheError::LockPoisoned("latest generation"))?;
        Ok(state.latest)
    }

    /// Merge a batch's per-id results into the cache.
    pub fn apply(
        &self,
        generation: Generation,
        results: Vec<(u64, CachedContent)>,
    ) -> Result<ApplyOutcome, CacheError> {
        let updated = {
            let mut state = self
                .state
                .write()
                .map_err(|_| CacheError::LockPoisoned("apply"))?;

            if generation != state.latest {
                debug!(%generation, latest = %state.latest, "discarding stale batch");
                return Ok(ApplyOutcome::Stale {
                    latest: state.latest,
                });
            }

            let candidate = state.current.overlay(results);
            if ContentCache::fingerprint(&candidate)? == ContentCache::fingerprint(&state.current.entries)? {
                debug!(%generation, "batch left cache unchanged");
                return Ok(ApplyOutcome::Unchanged);
            }

            let next = ContentCache {
                entries: candidate,
                version: state.current.version + 1,
            };
            let updated = CacheUpdated {
                version: next.version,
                generation: generation.0,
                entries: next.len(),
            };
            state.current = Arc::new(next);
            updated
        };

        info!(
            version = updated.version,
            entries = updated.entries,
            %generation,
            "content cache updated"
        );
        self.notify(updated)?;
        Ok(ApplyOutcome::Updated {
            version: updated.version,
        })
    }

    /// Register a listener for `cache.updated`. Listeners run off-thread.
    #[cfg(feature = "emitter")]
    pub fn on_update<F>(&self, listener: F) -> Result<String, CacheError>
    where
        F: Fn(CacheUpdated) + Send + Sync + 'static,
    {
        let mut emitter = self
            .emitter
            .lock()
            .map_err(|_| CacheError::LockPoisoned("register listener"))?;
        Ok(emitter.on(CACHE_UPDATED, listener))
    }

    #[cfg(feature = "emitter")]
    fn notify(&self, updated: CacheUpdated) -> Result<(), CacheError> {
        let mut emitter = self
            .emitter
            .lock()
            .map_err(|_| CacheError::LockPoisoned("emit"))?;
        emitter.emit(CACHE_UPDATED, updated);
        Ok(())
    }

    #[cfg(not(feature = "emitter"))]
    fn notify(&self, _updated: CacheUpdated) -> Result<(), CacheError> {
        Ok(())
    }
}
