//! # Embeddings
//!
//! This crate provides text embedding generation and exhaustive
//! nearest-neighbor search for the PromptForce similarity system.
//!
//! ## Features
//!
//! - **Text Encoding**: Convert prompt text to dense vectors through an
//!   OpenAI-compatible backend or a deterministic offline encoder
//! - **Flat Search**: Exhaustive squared-L2 nearest-neighbor lookup with
//!   stable row addressing
//! - **Score Derivation**: Bounded similarity scores from raw distances
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Embeddings System                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  TextEncoder ──► Embedding ──► FlatIndex                        │
//! │       │                            │                            │
//! │       ▼                            ▼                            │
//! │  Http/Hash                     Neighbor (row, distance)         │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod encoder;
pub mod error;
pub mod index;
pub mod similarity;

pub use encoder::{HashEncoder, HttpEncoder, TextEncoder};
pub use error::{EmbeddingError, Result};
pub use index::{FlatIndex, Neighbor};
pub use similarity::{distance_to_similarity, squared_euclidean};

/// A dense vector embedding.
pub type Embedding = Vec<f32>;

/// Dimension of embeddings (varies by model).
pub const DEFAULT_DIMENSION: usize = 384; // all-MiniLM-L6-v2
