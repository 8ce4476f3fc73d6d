//! Content-addressed store client boundary.
//!
//! The pipeline only knows the [`ContentStore`] trait. Retry policy, if any,
//! belongs to the implementation; the pipeline issues each fetch once.

mod error;
#[cfg(feature = "http")]
mod gateway;
mod in_memory;
mod record;

use async_trait::async_trait;

pub use error::ContentError;
#[cfg(feature = "http")]
pub use gateway::GatewayContentStore;
pub use in_memory::InMemoryContentStore;
pub use record::{CachedContent, ContentRecord};

/// Resolves a content identifier to its descriptive payload.
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn fetch(&self, uri: &str) -> Result<ContentRecord, ContentError>;
}

