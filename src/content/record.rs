use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Descriptive payload stored under a content identifier.
///
/// Fields that are missing or not strings in the source document are
/// `None`; a malformed field never rejects the whole record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub author_info: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub preview: Option<String>,
}

impl ContentRecord {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_author_info(mut self, info: impl Into<String>) -> Self {
        self.author_info = Some(info.into());
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_preview(mut self, preview: impl Into<String>) -> Self {
        self.preview = Some(preview.into());
        self
    }

    /// Decode a JSON document, ignoring unknown fields.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// A cache slot: the fetched record, or the marker left by a failed fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CachedContent {
    Loaded(ContentRecord),
    Missing,
}

impl CachedContent {
    pub fn record(&self) -> Option<&ContentRecord> {
        match self {
            CachedContent::Loaded(record) => Some(record),
            CachedContent::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, CachedContent::Missing)
    }
}

impl From<Option<ContentRecord>> for CachedContent {
    fn from(record: Option<ContentRecord>) -> Self {
        record.map_or(CachedContent::Missing, CachedContent::Loaded)
    }
}
