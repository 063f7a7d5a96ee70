//! Registry error model.

use thiserror::Error;

use jobledger_store::StoreError;

/// Result type used across the registry.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Registry-level error.
///
/// Validation failures are raised before any store access; everything the
/// store reports (not-found included) passes through unchanged. The first
/// error encountered short-circuits the operation; nothing is retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Malformed input, rejected before touching the collection.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Failure surfaced verbatim from the backing collection.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RegistryError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
