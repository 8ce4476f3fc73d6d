//! Field enrichment: cached content joined with per-origin price and supply.

use serde::{Deserialize, Serialize};

use crate::cache::ContentCache;
use crate::catalog::{CatalogEntry, StaticItem};

/// A cached content record merged with its unified entry's metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedEntry {
    pub id: u64,
    /// Descending display key: `len - index` over the enriched list.
    #[serde(rename = "id_revers")]
    pub id_revers: u64,
    pub name: String,
    pub author: String,
    pub author_info: String,
    pub date: String,
    pub preview: String,
    pub price: Option<String>,
    pub supply_remain: Option<u64>,
}

/// Reduced projection of a static catalog item, not derived from the cache.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticSupplementEntry {
    pub id: u64,
    pub name: String,
    pub author_info: String,
    pub caption: String,
}

impl From<&StaticItem> for StaticSupplementEntry {
    fn from(item: &StaticItem) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            author_info: item.author_info.clone(),
            caption: item.caption.clone(),
        }
    }
}

/// Element of the combined list handed to presentation.
///
/// The two variants keep separate id spaces: `Enriched` ids are positional
/// ids of the unified sequence, `Supplement` ids are the static catalog's own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CatalogView {
    Enriched(EnrichedEntry),
    Supplement(StaticSupplementEntry),
}

impl CatalogView {
    pub fn id(&self) -> u64 {
        match self {
            CatalogView::Enriched(entry) => entry.id,
            CatalogView::Supplement(entry) => entry.id,
        }
    }

    /// Searchable name, `None` when blank.
    pub fn name(&self) -> Option<&str> {
        let name = match self {
            CatalogView::Enriched(entry) => entry.name.as_str(),
            CatalogView::Supplement(entry) => entry.name.as_str(),
        };
        if name.trim().is_empty() {
            None
        } else {
            Some(name)
        }
    }

    pub fn id_revers(&self) -> Option<u64> {
        match self {
            CatalogView::Enriched(entry) => Some(entry.id_revers),
            CatalogView::Supplement(_) => None,
        }
    }

    pub fn as_enriched(&self) -> Option<&EnrichedEntry> {
        match self {
            CatalogView::Enriched(entry) => Some(entry),
            CatalogView::Supplement(_) => None,
        }
    }
}

/// One [`EnrichedEntry`] per cache slot, in ascending id order.
pub fn enrich(cache: &ContentCache, entries: &[CatalogEntry]) -> Vec<EnrichedEntry> {
    let total = cache.len() as u64;
    cache
        .iter()
        .enumerate()
        .map(|(index, (id, content))| {
            let record = content.record().cloned().unwrap_or_default();
            let origin = entries.iter().find(|entry| entry.id == id).map(|entry| &entry.origin);

            EnrichedEntry {
                id,
                id_revers: total - index as u64,
                name: record.name.unwrap_or_default(),
                author: record.author.unwrap_or_default(),
                author_info: record.author_info.unwrap_or_default(),
                date: record.date.unwrap_or_default(),
                preview: record.preview.unwrap_or_default(),
                price: origin.and_then(|o| o.price()).map(str::to_string),
                supply_remain: origin.and_then(|o| o.supply_remain()),
            }
        })
        .collect()
}

pub fn static_supplement(static_items: &[StaticItem]) -> Vec<StaticSupplementEntry> {
    static_items.iter().map(StaticSupplementEntry::from).collect()
}

/// Enriched entries followed by the static supplement. No deduplication.
pub fn combine(
    cache: &ContentCache,
    entries: &[CatalogEntry],
    static_items: &[StaticItem],
) -> Vec<CatalogView> {
    enrich(cache, entries)
        .into_iter()
        .map(CatalogView::Enriched)
        .chain(static_supplement(static_items).into_iter().map(CatalogView::Supplement))
        .collect()
}
