//! Presentation-ready cards built from the combined list.
//!
//! Missing values are replaced with the configured placeholders so the
//! presentation layer never renders blanks.

mod units;

use serde::Serialize;

use crate::config::DisplayConfig;
use crate::enrich::CatalogView;

pub use units::{format_units, MAX_DECIMALS};

/// Side-effecting actions the presentation layer may offer, keyed by `id_revers`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "key", rename_all = "snake_case")]
pub enum CardAction {
    OpenPreview(u64),
    OpenPurchase(u64),
    /// Static entries that are not on the ledger yet.
    ComingSoon,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogCard {
    pub id: u64,
    pub id_revers: Option<u64>,
    pub title: String,
    pub author_line: String,
    pub caption: Option<String>,
    pub price_line: Option<String>,
    pub supply_line: Option<String>,
    pub date_line: Option<String>,
    pub actions: Vec<CardAction>,
}

impl CatalogCard {
    pub fn from_view(view: &CatalogView, display: &DisplayConfig) -> Self {
        let placeholders = &display.placeholders;
        let or_placeholder = |value: &str, placeholder: &str| {
            if value.trim().is_empty() {
                placeholder.to_string()
            } else {
                value.to_string()
            }
        };

        match view {
            CatalogView::Enriched(entry) => {
                let price_line = entry
                    .price
                    .as_deref()
                    .and_then(|price| format_units(price, display.price_decimals))
                    .map(|amount| format!("{} {}", amount, display.price_unit))
                    .unwrap_or_else(|| placeholders.price.clone());
                let supply_line = entry
                    .supply_remain
                    .map(|supply| supply.to_string())
                    .unwrap_or_else(|| placeholders.supply.clone());

                CatalogCard {
                    id: entry.id,
                    id_revers: Some(entry.id_revers),
                    title: or_placeholder(&entry.name, &placeholders.name),
                    author_line: or_placeholder(&entry.author_info, &placeholders.author_info),
                    caption: None,
                    price_line: Some(price_line),
                    supply_line: Some(supply_line),
                    date_line: Some(or_placeholder(&entry.date, &placeholders.date)),
                    actions: vec![
                        CardAction::OpenPreview(entry.id_revers),
                        CardAction::OpenPurchase(entry.id_revers),
                    ],
                }
            }
            CatalogView::Supplement(entry) => CatalogCard {
                id: entry.id,
                id_revers: None,
                title: or_placeholder(&entry.name, &placeholders.name),
                author_line: or_placeholder(&entry.author_info, &placeholders.author_info),
                caption: Some(entry.caption.clone()),
                price_line: None,
                supply_line: None,
                date_line: None,
                actions: vec![CardAction::ComingSoon],
            },
        }
    }
}

/// Cards for every view whose id is not hidden.
pub fn cards(views: &[CatalogView], display: &DisplayConfig) -> Vec<CatalogCard> {
    views
        .iter()
        .filter(|view| !display.hidden_ids.contains(&view.id()))
        .map(|view| CatalogCard::from_view(view, display))
        .collect()
}
