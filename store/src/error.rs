//! Error types for the prompt store.

use thiserror::Error;

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur talking to the document store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store could not be reached.
    #[error("store unreachable: {0}")]
    Unreachable(String),

    /// The store answered with a non-success status.
    #[error("store request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    /// A document failed to deserialize.
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    /// HTTP error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}
