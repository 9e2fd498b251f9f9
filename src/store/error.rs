//! Error types for store operations

use thiserror::Error;

use crate::backend::BackendError;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by [`MediaStore`](super::MediaStore) operations
///
/// No local recovery happens behind any of these: configuration problems
/// need operator action, validation problems need corrected caller input,
/// and backend failures propagate as-is with retry left to the caller.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Required configuration value missing
    #[error("Configuration error: {0}")]
    Config(String),

    /// Caller-supplied input violates the namespace rule table
    #[error("Validation error: {0}")]
    Validation(String),

    /// Storage backend rejected the call
    #[error(transparent)]
    Backend(#[from] BackendError),
}
