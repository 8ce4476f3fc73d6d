//! The aggregation pipeline: merge, assign ids, fetch, cache, enrich, search.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use catalog_feed::{CatalogPipeline, InMemoryContentStore, LedgerSnapshot, PipelineConfig};
//!
//! let store = Arc::new(InMemoryContentStore::new());
//! let pipeline = CatalogPipeline::new(PipelineConfig::from_path("catalog.json")?, store);
//!
//! pipeline.refresh(&LedgerSnapshot::Ready(items)).await?;
//! pipeline.set_query("alph")?;
//! let visible = pipeline.results()?;
//! ```

mod driver;
mod error;

use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::cache::{ApplyOutcome, CacheStore, Generation};
use crate::catalog::{unify, CatalogEntry, LedgerSnapshot};
use crate::config::PipelineConfig;
use crate::content::ContentStore;
use crate::enrich::{combine, CatalogView, EnrichedEntry};
use crate::fetch::{ContentFetcher, FetchFailure};
use crate::search;
use crate::view::{cards, CatalogCard};

pub use driver::{DriverStats, RefreshDriver};
pub use error::PipelineError;

/// What one call to [`CatalogPipeline::refresh`] did.
#[derive(Debug, Clone)]
pub struct RefreshReport {
    pub generation: Generation,
    /// Length of the unified sequence.
    pub entries: usize,
    /// Fetches issued in the batch.
    pub requested: usize,
    pub failures: Vec<FetchFailure>,
    pub outcome: ApplyOutcome,
    /// Whether the combined list was rebuilt.
    pub rebuilt: bool,
}

struct PipelineState {
    entries: Arc<Vec<CatalogEntry>>,
    combined: Arc<Vec<CatalogView>>,
    /// Unified sequence and cache version `combined` was built from.
    built_from: Arc<Vec<CatalogEntry>>,
    built_version: u64,
    query: String,
}

pub struct CatalogPipeline<S> {
    config: PipelineConfig,
    fetcher: ContentFetcher<S>,
    cache: CacheStore,
    state: RwLock<PipelineState>,
}

impl<S: ContentStore> CatalogPipeline<S> {
    pub fn new(config: PipelineConfig, store: Arc<S>) -> Self {
        let mut fetcher = ContentFetcher::new(store);
        if let Some(timeout) = config.fetch_timeout() {
            fetcher = fetcher.with_timeout(timeout);
        }
        let cache = CacheStore::new();
        let combined = combine(&Default::default(), &[], &config.static_catalog);
        let entries = Arc::new(Vec::new());

        Self {
            config,
            fetcher,
            cache,
            state: RwLock::new(PipelineState {
                built_from: Arc::clone(&entries),
                entries,
                combined: Arc::new(combined),
                built_version: 0,
                query: String::new(),
            }),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// The pipeline's cache. Use it to subscribe to `cache.updated`.
    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Rerun the pipeline for a new ledger observation.
    ///
    /// Fetch failures and an unavailable ledger degrade the result and are
    /// reported; only a poisoned lock fails the call.
    pub async fn refresh(&self, ledger: &LedgerSnapshot) -> Result<RefreshReport, PipelineError> {
        let unified = unify(ledger, &self.config.static_catalog);

        let (entries, generation) = {
            let mut state = self
                .state
                .write()
                .map_err(|_| PipelineError::LockPoisoned("refresh"))?;
            if *state.entries != unified {
                state.entries = Arc::new(unified);
            }
            (Arc::clone(&state.entries), self.cache.begin_batch()?)
        };

        let batch = self.fetcher.fetch_batch(generation, &entries).await;
        let requested = batch.requested();
        let outcome = self.cache.apply(generation, batch.results)?;

        // An unchanged batch may still land on a sequence replaced by a
        // refresh whose own batch went stale.
        let rebuilt = match outcome {
            ApplyOutcome::Stale { .. } => false,
            ApplyOutcome::Updated { .. } | ApplyOutcome::Unchanged => self.rebuild_if_outdated()?,
        };

        debug!(
            %generation,
            entries = entries.len(),
            requested,
            failed = batch.failures.len(),
            ?outcome,
            rebuilt,
            "refresh complete"
        );
        Ok(RefreshReport {
            generation,
            entries: entries.len(),
            requested,
            failures: batch.failures,
            outcome,
            rebuilt,
        })
    }

    /// Rebuild `combined` unless it already reflects the current sequence and cache.
    fn rebuild_if_outdated(&self) -> Result<bool, PipelineError> {
        let snapshot = self.cache.snapshot()?;
        let mut state = self
            .state
            .write()
            .map_err(|_| PipelineError::LockPoisoned("rebuild"))?;
        if Arc::ptr_eq(&state.entries, &state.built_from) && state.built_version == snapshot.version() {
            return Ok(false);
        }

        let combined = combine(&snapshot, &state.entries, &self.config.static_catalog);
        state.combined = Arc::new(combined);
        state.built_from = Arc::clone(&state.entries);
        state.built_version = snapshot.version();
        Ok(true)
    }

    /// Current unified sequence with assigned ids.
    pub fn entries(&self) -> Result<Arc<Vec<CatalogEntry>>, PipelineError> {
        let state = self
            .state
            .read()
            .map_err(|_| PipelineError::LockPoisoned("entries"))?;
        Ok(Arc::clone(&state.entries))
    }

    /// Enriched entries followed by the static supplement, unfiltered.
    pub fn combined(&self) -> Result<Arc<Vec<CatalogView>>, PipelineError> {
        let state = self
            .state
            .read()
            .map_err(|_| PipelineError::LockPoisoned("combined"))?;
        Ok(Arc::clone(&state.combined))
    }

    pub fn set_query(&self, query: impl Into<String>) -> Result<(), PipelineError> {
        let mut state = self
            .state
            .write()
            .map_err(|_| PipelineError::LockPoisoned("set query"))?;
        state.query = query.into();
        Ok(())
    }

    pub fn query(&self) -> Result<String, PipelineError> {
        let state = self
            .state
            .read()
            .map_err(|_| PipelineError::LockPoisoned("query"))?;
        Ok(state.query.clone())
    }

    /// The combined list filtered by the current query.
    pub fn results(&self) -> Result<Vec<CatalogView>, PipelineError> {
        let state = self
            .state
            .read()
            .map_err(|_| PipelineError::LockPoisoned("results"))?;
        Ok(search::filter(&state.combined, &state.query))
    }

    /// Search results are only shown once something has been typed.
    pub fn results_visible(&self) -> Result<bool, PipelineError> {
        Ok(!search::is_blank(&self.query()?))
    }

    /// Cards for the current results, minus hidden ids.
    pub fn cards(&self) -> Result<Vec<CatalogCard>, PipelineError> {
        Ok(cards(&self.results()?, &self.config.display))
    }

    /// Enriched entry addressed by its display key.
    pub fn find_by_id_revers(&self, id_revers: u64) -> Result<Option<EnrichedEntry>, PipelineError> {
        let combined = self.combined()?;
        Ok(combined
            .iter()
            .filter_map(CatalogView::as_enriched)
            .find(|entry| entry.id_revers == id_revers)
            .cloned())
    }
}
