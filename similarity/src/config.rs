//! Configuration for the similarity engine.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Result-count limit applied when a caller does not pass one.
pub const DEFAULT_LIMIT: usize = 5;

/// Which encoder implementation the engine runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncoderKind {
    /// OpenAI-compatible HTTP backend.
    Http,
    /// Deterministic offline hashing encoder.
    Hash,
}

/// Configuration for the similarity system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityConfig {
    /// Base URL of the prompt document API.
    pub store_url: String,

    /// Which encoder to run.
    pub encoder: EncoderKind,

    /// Base URL of the embeddings endpoint (http encoder only).
    pub encoder_url: String,

    /// Model requested from the embeddings endpoint.
    pub encoder_model: String,

    /// Bearer token for the embeddings endpoint, when required.
    pub encoder_api_key: Option<String>,
}

impl SimilarityConfig {
    /// Create a configuration with default endpoints.
    pub fn new() -> Self {
        Self {
            store_url: "http://localhost:5000/api".to_string(),
            encoder: EncoderKind::Http,
            encoder_url: "http://localhost:8080".to_string(),
            encoder_model: "all-MiniLM-L6-v2".to_string(),
            encoder_api_key: None,
        }
    }

    /// Read configuration from `PROMPTFORCE_*` environment variables,
    /// keeping defaults for anything unset.
    pub fn from_env() -> Self {
        let mut config = Self::new();

        if let Ok(url) = std::env::var("PROMPTFORCE_STORE_URL") {
            config.store_url = url;
        }
        if let Ok(kind) = std::env::var("PROMPTFORCE_ENCODER") {
            match kind.to_ascii_lowercase().as_str() {
                "http" => config.encoder = EncoderKind::Http,
                "hash" => config.encoder = EncoderKind::Hash,
                other => warn!("Unknown PROMPTFORCE_ENCODER value: {other}"),
            }
        }
        if let Ok(url) = std::env::var("PROMPTFORCE_ENCODER_URL") {
            config.encoder_url = url;
        }
        if let Ok(model) = std::env::var("PROMPTFORCE_ENCODER_MODEL") {
            config.encoder_model = model;
        }
        config.encoder_api_key = std::env::var("PROMPTFORCE_ENCODER_API_KEY").ok();

        config
    }

    /// Set the store base URL.
    pub fn with_store_url(mut self, url: impl Into<String>) -> Self {
        self.store_url = url.into();
        self
    }

    /// Set the encoder kind.
    pub fn with_encoder(mut self, encoder: EncoderKind) -> Self {
        self.encoder = encoder;
        self
    }

    /// Set the embeddings endpoint base URL.
    pub fn with_encoder_url(mut self, url: impl Into<String>) -> Self {
        self.encoder_url = url.into();
        self
    }

    /// Set the embeddings model.
    pub fn with_encoder_model(mut self, model: impl Into<String>) -> Self {
        self.encoder_model = model.into();
        self
    }

    /// Set the embeddings API key.
    pub fn with_encoder_api_key(mut self, key: impl Into<String>) -> Self {
        self.encoder_api_key = Some(key.into());
        self
    }
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self::new()
    }
}
