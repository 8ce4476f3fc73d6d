use tracing::warn;

use super::entry::{CatalogEntry, Origin, StaticItem};
use super::ledger::{LedgerItem, LedgerSnapshot};

/// Ledger successes in reverse order, then the static list as given.
///
/// An unresolved or failed ledger degrades to the static list alone.
pub fn merge_sources(ledger: &LedgerSnapshot, static_items: &[StaticItem]) -> Vec<Origin> {
    let items: &[LedgerItem] = match ledger.items() {
        Ok(items) => items,
        Err(reason) => {
            warn!(%reason, "ledger source unavailable, using static catalog only");
            &[]
        }
    };

    let mut merged: Vec<Origin> = items
        .iter()
        .filter_map(|item| item.successful_result())
        .cloned()
        .map(Origin::Ledger)
        .collect();
    merged.reverse();
    merged.extend(static_items.iter().cloned().map(Origin::Static));
    merged
}

/// Positional ids starting at 1. Any id carried by the origin is ignored.
pub fn assign_ids(unified: Vec<Origin>) -> Vec<CatalogEntry> {
    unified
        .into_iter()
        .enumerate()
        .map(|(index, origin)| CatalogEntry {
            id: index as u64 + 1,
            origin,
        })
        .collect()
}

/// Merge then assign ids.
pub fn unify(ledger: &LedgerSnapshot, static_items: &[StaticItem]) -> Vec<CatalogEntry> {
    assign_ids(merge_sources(ledger, static_items))
}
