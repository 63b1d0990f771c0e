//! # Prompt Similarity
//!
//! This crate ties the prompt store, a text encoder and the flat index
//! together into one engine that answers "what else reads like this
//! prompt".
//!
//! ## Features
//!
//! - **Index Lifecycle**: Wholesale rebuilds with atomic swap-in; lazy
//!   build on the first query
//! - **Corpus Selection**: Public prompts when any exist, the whole
//!   collection otherwise
//! - **Two Query Modes**: By an already-indexed prompt id, or by
//!   free-form query text
//! - **Result Enrichment**: Matches come back with display fields and a
//!   bounded similarity score
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     SimilarityEngine                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  PromptSource ──► corpus ──► TextEncoder ──► FlatIndex          │
//! │       ▲                                          │              │
//! │       │                                          ▼              │
//! │  enrichment  ◄───────── row ids ◄───────── Neighbor rows        │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod result;

pub use config::{DEFAULT_LIMIT, EncoderKind, SimilarityConfig};
pub use engine::{BuildReport, SimilarityEngine};
pub use error::{Result, SimilarityError};
pub use result::SimilarPrompt;

pub use promptforce_embeddings::{HashEncoder, HttpEncoder, TextEncoder};
pub use promptforce_store::{
    HttpSource, MemorySource, PromptDocument, PromptFilter, PromptId, PromptSource,
};
