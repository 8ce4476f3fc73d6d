use std::fmt;

/// Why a single content fetch did not produce a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentError {
    NotFound(String),
    Timeout(String),
    Transport(String),
    Decode(String),
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentError::NotFound(uri) => write!(f, "content not found: {}", uri),
            ContentError::Timeout(uri) => write!(f, "content fetch timed out: {}", uri),
            ContentError::Transport(msg) => write!(f, "content transport error: {}", msg),
            ContentError::Decode(msg) => write!(f, "content decode error: {}", msg),
        }
    }
}

impl std::error::Error for ContentError {}

impl From<serde_json::Error> for ContentError {
    fn from(err: serde_json::Error) -> Self {
        ContentError::Decode(err.to_string())
    }
}
