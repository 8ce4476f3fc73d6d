//! GatewayContentStore - resolves content identifiers through an HTTP gateway.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

use super::{ContentError, ContentRecord, ContentStore};

const IPFS_SCHEME: &str = "ipfs://";

/// Fetches `GET {base_url}/{cid}` and decodes the body as a [`ContentRecord`].
///
/// Identifiers may be bare CIDs, `ipfs://` URIs, or absolute http(s) URLs,
/// which are fetched as-is.
#[derive(Clone)]
pub struct GatewayContentStore {
    client: reqwest::Client,
    base_url: String,
}

impl GatewayContentStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Build with a per-request timeout. Timeouts surface as [`ContentError::Timeout`].
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ContentError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ContentError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Gateway URL for a content identifier.
    pub fn resolve(&self, uri: &str) -> String {
        if uri.starts_with("http://") || uri.starts_with("https://") {
            return uri.to_string();
        }
        let cid = uri.strip_prefix(IPFS_SCHEME).unwrap_or(uri);
        format!("{}/{}", self.base_url, cid.trim_start_matches('/'))
    }
}

#[async_trait]
impl ContentStore for GatewayContentStore {
    async fn fetch(&self, uri: &str) -> Result<ContentRecord, ContentError> {
        let url = self.resolve(uri);
        debug!(%url, "fetching content");

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                ContentError::Timeout(uri.to_string())
            } else {
                ContentError::Transport(e.to_string())
            }
        })?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(ContentError::NotFound(uri.to_string())),
            status if !status.is_success() => {
                return Err(ContentError::Transport(format!("{} returned {}", url, status)))
            }
            _ => {}
        }

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                ContentError::Timeout(uri.to_string())
            } else {
                ContentError::Transport(e.to_string())
            }
        })?;
        Ok(ContentRecord::from_json_slice(&body)?)
    }
}
