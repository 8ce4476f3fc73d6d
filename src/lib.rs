//! Catalog aggregation pipeline.
//!
//! Ledger entries and a static fallback catalog are merged into one
//! sequence, given positional ids, and their descriptive content is fetched
//! concurrently from a content-addressed store. Results land in a versioned
//! cache, get enriched with price and supply, and are exposed as a
//! searchable list.

pub mod cache;
pub mod catalog;
pub mod config;
pub mod content;
pub mod enrich;
pub mod fetch;
pub mod pipeline;
pub mod search;
pub mod view;

pub use cache::{ApplyOutcome, CacheError, CacheStore, CacheUpdated, ContentCache, Generation};
pub use catalog::{
    assign_ids, merge_sources, unify, CatalogEntry, LedgerItem, LedgerResult, LedgerSnapshot,
    LedgerStatus, Origin, SourceUnavailable, StaticItem,
};
pub use config::{ConfigError, DisplayConfig, PipelineConfig, Placeholders};
#[cfg(feature = "http")]
pub use content::GatewayContentStore;
pub use content::{CachedContent, ContentError, ContentRecord, ContentStore, InMemoryContentStore};
pub use enrich::{CatalogView, EnrichedEntry, StaticSupplementEntry};
pub use fetch::{ContentFetcher, FetchBatch, FetchFailure};
pub use pipeline::{CatalogPipeline, DriverStats, PipelineError, RefreshDriver, RefreshReport};
pub use view::{CardAction, CatalogCard};

