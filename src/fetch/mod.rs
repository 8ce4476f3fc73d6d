//! Concurrent content retrieval for the unified sequence.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, warn};

use crate::cache::Generation;
use crate::catalog::CatalogEntry;
use crate::content::{CachedContent, ContentError, ContentRecord, ContentStore};

/// One entry whose fetch failed. Its cache slot becomes [`CachedContent::Missing`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub id: u64,
    pub uri: String,
    pub error: ContentError,
}

/// Settled results of one batch.
#[derive(Debug, Clone)]
pub struct FetchBatch {
    pub generation: Generation,
    pub results: Vec<(u64, CachedContent)>,
    pub failures: Vec<FetchFailure>,
    /// Entries without a content identifier.
    pub skipped: usize,
}

impl FetchBatch {
    pub fn requested(&self) -> usize {
        self.results.len()
    }
}

/// Issues every eligible fetch of a run at once and waits for all to settle.
pub struct ContentFetcher<S> {
    store: Arc<S>,
    timeout: Option<Duration>,
}

impl<S> Clone for ContentFetcher<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            timeout: self.timeout,
        }
    }
}

impl<S: ContentStore> ContentFetcher<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            timeout: None,
        }
    }

    /// Bound every fetch; an expired fetch counts as an ordinary failure.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Fetch content for every entry that has a content identifier.
    ///
    /// Never fails as a whole: a failed fetch yields the missing marker for
    /// its id and a [`FetchFailure`] in the report.
    pub async fn fetch_batch(&self, generation: Generation, entries: &[CatalogEntry]) -> FetchBatch {
        let eligible: Vec<(u64, &str)> = entries
            .iter()
            .filter_map(|entry| entry.content_uri().map(|uri| (entry.id, uri)))
            .collect();
        let skipped = entries.len() - eligible.len();
        debug!(%generation, requests = eligible.len(), skipped, "starting content batch");

        let settled = join_all(
            eligible
                .into_iter()
                .map(|(id, uri)| async move { (id, uri, self.fetch_one(uri).await) }),
        )
        .await;

        let mut results = Vec::with_capacity(settled.len());
        let mut failures = Vec::new();
        for (id, uri, outcome) in settled {
            match outcome {
                Ok(record) => results.push((id, CachedContent::Loaded(record))),
                Err(error) => {
                    warn!(id, uri, %error, %generation, "content fetch failed");
                    results.push((id, CachedContent::Missing));
                    failures.push(FetchFailure {
                        id,
                        uri: uri.to_string(),
                        error,
                    });
                }
            }
        }

        debug!(
            %generation,
            fetched = results.len() - failures.len(),
            failed = failures.len(),
            "content batch settled"
        );
        FetchBatch {
            generation,
            results,
            failures,
            skipped,
        }
    }

    async fn fetch_one(&self, uri: &str) -> Result<ContentRecord, ContentError> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.store.fetch(uri))
                .await
                .unwrap_or_else(|_| Err(ContentError::Timeout(uri.to_string()))),
            None => self.store.fetch(uri).await,
        }
    }
}
