//! Catalog entries and the merge of the ledger and static sources.
//!
//! The unified sequence is the ledger's successful items, newest first,
//! followed by the static fallback list. Ids are positional and are
//! reassigned from scratch every time the sequence is rebuilt.

mod entry;
mod ledger;
mod merge;

pub use entry::{CatalogEntry, LedgerResult, Origin, StaticItem};
pub use ledger::{LedgerItem, LedgerSnapshot, LedgerStatus, SourceUnavailable};
pub use merge::{assign_ids, merge_sources, unify};
