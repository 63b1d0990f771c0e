//! Error types for the similarity engine.

use thiserror::Error;

use promptforce_embeddings::EmbeddingError;
use promptforce_store::StoreError;

/// Result type alias for similarity operations.
pub type Result<T> = std::result::Result<T, SimilarityError>;

/// Errors that can occur while building or querying the index.
#[derive(Error, Debug)]
pub enum SimilarityError {
    /// Connectivity to the document store failed.
    #[error("store not reachable: {0}")]
    NotConnected(String),

    /// No content-bearing documents were available to index.
    #[error("no prompts with content to index")]
    EmptyCorpus,

    /// A query ran without an index in place.
    #[error("similarity index not built")]
    IndexNotBuilt,

    /// Encoding or index search failed.
    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    /// A store read failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
