use std::fmt;

use serde::{Deserialize, Serialize};

use super::entry::LedgerResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerStatus {
    Success,
    Error,
    Pending,
}

/// One slot of a multi-read against the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerItem {
    pub status: LedgerStatus,
    #[serde(default)]
    pub result: Option<LedgerResult>,
}

impl LedgerItem {
    pub fn success(result: LedgerResult) -> Self {
        Self {
            status: LedgerStatus::Success,
            result: Some(result),
        }
    }

    pub fn error() -> Self {
        Self {
            status: LedgerStatus::Error,
            result: None,
        }
    }

    /// The result, only when the read succeeded and carried one.
    pub fn successful_result(&self) -> Option<&LedgerResult> {
        match self.status {
            LedgerStatus::Success => self.result.as_ref(),
            _ => None,
        }
    }
}

/// State of the ledger source as last observed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "items", rename_all = "snake_case")]
pub enum LedgerSnapshot {
    #[default]
    Pending,
    Failed(String),
    Ready(Vec<LedgerItem>),
}

impl LedgerSnapshot {
    /// Items of a resolved snapshot, or why there are none.
    pub fn items(&self) -> Result<&[LedgerItem], SourceUnavailable> {
        match self {
            LedgerSnapshot::Pending => Err(SourceUnavailable::Pending),
            LedgerSnapshot::Failed(reason) => Err(SourceUnavailable::Failed(reason.clone())),
            LedgerSnapshot::Ready(items) => Ok(items),
        }
    }
}

/// The ledger source as a whole cannot contribute entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceUnavailable {
    Pending,
    Failed(String),
}

impl fmt::Display for SourceUnavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceUnavailable::Pending => write!(f, "ledger source still pending"),
            SourceUnavailable::Failed(reason) => write!(f, "ledger source failed: {}", reason),
        }
    }
}

impl std::error::Error for SourceUnavailable {}
