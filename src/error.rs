//! Error types returned by the store and the persistence layer

use thiserror::Error;

/// Errors a caller can observe from a store operation
///
/// Every variant leaves the store unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Empty title or name, malformed priority or date, bad ordering
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// No category with the given ID
    #[error("category not found: {0}")]
    UnknownCategory(String),
    /// No task with the given ID in the addressed category
    #[error("task not found: {0}")]
    UnknownTask(String),
}

impl StoreError {
    pub fn invalid(message: impl Into<String>) -> Self {
        StoreError::InvalidInput(message.into())
    }
}

/// Reasons a persisted blob is rejected on load
///
/// Never returned to store callers; the store falls back to its seed.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("persisted state is not valid JSON for the category list: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("persisted state violates store invariants: {0}")]
    Inconsistent(String),
}
