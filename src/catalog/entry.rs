use serde::{Deserialize, Serialize};

/// Per-item payload returned by the ledger for a successful read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerResult {
    pub uri: String,
    /// Price in the token's base units, as a decimal integer string.
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub supply_remain: Option<u64>,
}

impl LedgerResult {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            price: None,
            supply_remain: None,
        }
    }

    pub fn with_price(mut self, price: impl Into<String>) -> Self {
        self.price = Some(price.into());
        self
    }

    pub fn with_supply_remain(mut self, supply: u64) -> Self {
        self.supply_remain = Some(supply);
        self
    }
}

/// An entry of the fixed, externally configured fallback catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StaticItem {
    pub id: u64,
    pub uri: String,
    pub name: String,
    pub price: String,
    pub supply_remain: u64,
    pub author_info: String,
    pub caption: String,
    pub preview_text: String,
    pub action_text: String,
}

/// Where a catalog entry came from, with the fields that origin carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "origin", rename_all = "snake_case")]
pub enum Origin {
    Ledger(LedgerResult),
    Static(StaticItem),
}

impl Origin {
    /// Content identifier, or `None` when the entry has nothing to fetch.
    pub fn content_uri(&self) -> Option<&str> {
        let uri = match self {
            Origin::Ledger(result) => result.uri.as_str(),
            Origin::Static(item) => item.uri.as_str(),
        };
        if uri.is_empty() {
            None
        } else {
            Some(uri)
        }
    }

    /// Price as the origin reports it. Empty strings count as absent.
    pub fn price(&self) -> Option<&str> {
        let price = match self {
            Origin::Ledger(result) => result.price.as_deref(),
            Origin::Static(item) => Some(item.price.as_str()),
        };
        price.filter(|p| !p.trim().is_empty())
    }

    pub fn supply_remain(&self) -> Option<u64> {
        match self {
            Origin::Ledger(result) => result.supply_remain,
            Origin::Static(item) => Some(item.supply_remain),
        }
    }

    pub fn is_static(&self) -> bool {
        matches!(self, Origin::Static(_))
    }
}

/// An item of the unified sequence with its assigned positional id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: u64,
    pub origin: Origin,
}

impl CatalogEntry {
    pub fn content_uri(&self) -> Option<&str> {
        self.origin.content_uri()
    }
}
