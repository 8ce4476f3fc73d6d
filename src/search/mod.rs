//! Case-insensitive substring search over the combined list.

use tracing::trace;

use crate::enrich::CatalogView;

/// True when `query` should leave the list unfiltered.
pub fn is_blank(query: &str) -> bool {
    query.trim().is_empty()
}

/// Whether `view`'s name contains `query`, ignoring case.
///
/// Entries without a usable name never match.
pub fn matches(view: &CatalogView, query: &str) -> bool {
    match view.name() {
        Some(name) => name.to_lowercase().contains(&query.to_lowercase()),
        None => {
            trace!(id = view.id(), "entry without a name skipped by search");
            false
        }
    }
}

/// Entries matching `query`, in their original order. A blank query keeps everything.
pub fn filter(views: &[CatalogView], query: &str) -> Vec<CatalogView> {
    if is_blank(query) {
        return views.to_vec();
    }
    let folded = query.to_lowercase();
    views
        .iter()
        .filter(|view| matches(view, &folded))
        .cloned()
        .collect()
}
