use thiserror::Error;

use crate::client::ApiError;
use crate::target::TargetError;

/// Errors raised by the cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("'{key}' already exists in the cache")]
    AlreadyExists { key: String },
    #[error("no entry found for '{key}'")]
    NotFound { key: String },
    #[error(transparent)]
    InvalidTarget(#[from] TargetError),
    #[error("remote lookup failed: {0}")]
    Remote(#[from] ApiError),
}

impl CacheError {
    pub(crate) fn already_exists(key: impl Into<String>) -> Self {
        Self::AlreadyExists { key: key.into() }
    }

    pub(crate) fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// True for duplicate-create and missing-key violations, as opposed to
    /// input or remote failures.
    pub fn is_logic_error(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. } | Self::NotFound { .. })
    }
}
