//! InMemoryContentStore - HashMap-backed content store for testing and development.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;

use super::{ContentError, ContentRecord, ContentStore};

#[derive(Clone)]
struct Slot {
    response: Result<ContentRecord, ContentError>,
    delay: Option<Duration>,
}

/// In-memory content store keyed by content identifier.
///
/// Unknown identifiers fail with [`ContentError::NotFound`]. Clone-friendly via Arc.
#[derive(Clone, Default)]
pub struct InMemoryContentStore {
    slots: Arc<RwLock<HashMap<String, Slot>>>,
    fetches: Arc<AtomicUsize>,
}

impl InMemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `record` for `uri`.
    pub fn insert(&self, uri: impl Into<String>, record: ContentRecord) -> Result<(), ContentError> {
        self.set(uri.into(), Ok(record), None)
    }

    /// Serve `record` for `uri` after sleeping for `delay`.
    pub fn insert_delayed(
        &self,
        uri: impl Into<String>,
        record: ContentRecord,
        delay: Duration,
    ) -> Result<(), ContentError> {
        self.set(uri.into(), Ok(record), Some(delay))
    }

    /// Fail every fetch of `uri` with `error`.
    pub fn fail(&self, uri: impl Into<String>, error: ContentError) -> Result<(), ContentError> {
        self.set(uri.into(), Err(error), None)
    }

    pub fn remove(&self, uri: &str) -> Result<bool, ContentError> {
        let mut slots = self.slots.write().map_err(|_| poisoned())?;
        Ok(slots.remove(uri).is_some())
    }

    /// Number of fetches served so far, successful or not.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn set(
        &self,
        uri: String,
        response: Result<ContentRecord, ContentError>,
        delay: Option<Duration>,
    ) -> Result<(), ContentError> {
        let mut slots = self.slots.write().map_err(|_| poisoned())?;
        slots.insert(uri, Slot { response, delay });
        Ok(())
    }
}

fn poisoned() -> ContentError {
    ContentError::Transport("content store lock poisoned".into())
}

#[async_trait]
impl ContentStore for InMemoryContentStore {
    async fn fetch(&self, uri: &str) -> Result<ContentRecord, ContentError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let slot = self
            .slots
            .read()
            .map_err(|_| poisoned())?
            .get(uri)
            .cloned();

        let Some(slot) = slot else {
            return Err(ContentError::NotFound(uri.to_string()));
        };
        if let Some(delay) = slot.delay {
            tokio::time::sleep(delay).await;
        }
        slot.response
    }
}
