//! Pipeline configuration, loadable from JSON.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::catalog::StaticItem;

/// Texts shown in place of missing values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Placeholders {
    pub name: String,
    pub author_info: String,
    pub price: String,
    pub supply: String,
    pub date: String,
}

impl Default for Placeholders {
    fn default() -> Self {
        Self {
            name: "Untitled".into(),
            author_info: "Author information unavailable".into(),
            price: "Price not set".into(),
            supply: "Unknown".into(),
            date: "Date unknown".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DisplayConfig {
    /// Decimal places of the base-unit price.
    pub price_decimals: u32,
    pub price_unit: String,
    /// Entry ids never rendered as cards.
    pub hidden_ids: Vec<u64>,
    pub placeholders: Placeholders,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            price_decimals: 18,
            price_unit: "MATIC".into(),
            hidden_ids: Vec::new(),
            placeholders: Placeholders::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PipelineConfig {
    /// The fixed fallback catalog appended after ledger entries.
    pub static_catalog: Vec<StaticItem>,
    /// Per-fetch limit in milliseconds. Unset means no limit.
    pub fetch_timeout_ms: Option<u64>,
    pub display: DisplayConfig,
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_static_catalog(mut self, items: Vec<StaticItem>) -> Self {
        self.static_catalog = items;
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    pub fn with_display(mut self, display: DisplayConfig) -> Self {
        self.display = display;
        self
    }

    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout_ms.map(Duration::from_millis)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Io(String),
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "config read error: {}", msg),
            ConfigError::Parse(msg) => write!(f, "config parse error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}
