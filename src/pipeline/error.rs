use std::fmt;

use crate::cache::CacheError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    LockPoisoned(&'static str),
    Cache(CacheError),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::LockPoisoned(operation) => {
                write!(f, "pipeline lock poisoned during {}", operation)
            }
            PipelineError::Cache(err) => write!(f, "cache error: {}", err),
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<CacheError> for PipelineError {
    fn from(err: CacheError) -> Self {
        PipelineError::Cache(err)
    }
}
