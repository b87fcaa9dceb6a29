//! Client error types

use thiserror::Error;

/// Storage error surfaced by every [`Repository`](crate::Repository) backend
#[derive(Debug, Error)]
pub enum StoreError {
    /// Local database failure (open, transaction, table, commit)
    #[error("Database error: {0}")]
    Database(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP request failed before a response was received
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote backend rejected the request
    #[error("Remote error ({status}): {message}")]
    Remote { status: u16, message: String },

    /// Record already exists
    #[error("Already exists: {0}")]
    Conflict(String),

    /// Record not found
    #[error("Not found: {0}")]
    NotFound(String),
}

macro_rules! impl_from_redb {
    ($($err:ty),* $(,)?) => {
        $(
            impl From<$err> for StoreError {
                fn from(err: $err) -> Self {
                    StoreError::Database(err.to_string())
                }
            }
        )*
    };
}

impl_from_redb!(
    redb::Error,
    redb::DatabaseError,
    redb::TransactionError,
    redb::TableError,
    redb::StorageError,
    redb::CommitError,
);

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;
