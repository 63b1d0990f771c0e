//! Text encoders.
//!
//! An encoder turns a batch of texts into fixed-dimension embeddings.
//! `HttpEncoder` calls an OpenAI-compatible embeddings endpoint;
//! `HashEncoder` produces deterministic vectors with no backend at all.

use std::hash::{Hash, Hasher};

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};
use twox_hash::XxHash64;

use crate::Embedding;
use crate::error::{EmbeddingError, Result};
use crate::similarity::normalize;

/// Trait for text encoders.
#[async_trait]
pub trait TextEncoder: Send + Sync {
    /// Get the name of this encoder.
    fn name(&self) -> &str;

    /// Get the model identifier this encoder runs.
    fn model(&self) -> &str;

    /// Encode a batch of texts into embeddings.
    ///
    /// Returns one row per input text, in input order, every row of the
    /// same length. An empty batch yields an empty matrix without
    /// contacting any backend.
    async fn encode(&self, texts: &[String]) -> Result<Vec<Embedding>>;
}

/// Encoder backed by an OpenAI-compatible `/embeddings` endpoint.
pub struct HttpEncoder {
    /// API base URL.
    base_url: String,

    /// Bearer token, when the backend requires one.
    api_key: Option<String>,

    /// Model requested from the backend.
    model: String,

    /// HTTP client.
    client: reqwest::Client,
}

impl HttpEncoder {
    /// Create an encoder against the given base URL.
    ///
    /// No API key is set by default; local backends accept unsigned
    /// requests.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            model: "all-MiniLM-L6-v2".to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Set the bearer token sent with each request.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the model requested from the backend.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[async_trait]
impl TextEncoder for HttpEncoder {
    fn name(&self) -> &str {
        "http"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn encode(&self, texts: &[String]) -> Result<Vec<Embedding>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Encoding {} texts with model: {}", texts.len(), self.model);

        let body = serde_json::json!({
            "input": texts,
            "model": self.model
        });

        let mut request = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .header("Content-Type", "application/json")
            .json(&body);

        if let Some(api_key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {api_key}"));
        }

        let response = request.send().await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);

            return Err(EmbeddingError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::ApiRequest(format!("API error: {error_text}")));
        }

        let result: EmbeddingsResponse = response.json().await?;

        if result.data.len() != texts.len() {
            return Err(EmbeddingError::InvalidResponse(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                result.data.len()
            )));
        }

        // Backends may return rows out of order; the index field is the
        // authoritative position.
        let mut data = result.data;
        data.sort_by_key(|item| item.index);

        let embeddings: Vec<Embedding> = data.into_iter().map(|item| item.embedding).collect();

        info!(
            "Encoded {} texts ({} dimensions)",
            embeddings.len(),
            embeddings.first().map_or(0, Vec::len)
        );

        Ok(embeddings)
    }
}

/// OpenAI-compatible API response format.
#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

/// Deterministic offline encoder with no model behind it.
///
/// Each whitespace token is hashed into one of `dimension` buckets with
/// a small position salt, and the vector is normalized to unit length.
/// Output depends only on the input text, which makes it usable in tests
/// and in deployments without an embedding backend. Shared tokens still
/// pull texts together, but this is not a semantic model.
pub struct HashEncoder {
    /// Length of every produced vector.
    dimension: usize,
}

impl HashEncoder {
    /// Create an encoder producing vectors of the given dimension.
    ///
    /// Embeddings need at least one bucket, so a dimension of 0 is
    /// raised to 1.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn encode_one(&self, text: &str) -> Embedding {
        let mut vector = vec![0.0f32; self.dimension];

        for (position, token) in text.to_lowercase().split_whitespace().enumerate() {
            let mut hasher = XxHash64::with_seed(0);
            token.hash(&mut hasher);
            let hash = hasher.finish();

            let bucket = (hash as usize) % self.dimension;
            let weight = ((hash >> 32) as u32) as f32 / u32::MAX as f32;
            vector[bucket] += weight + (position % 3) as f32 * 0.01;
        }

        normalize(&mut vector);
        vector
    }
}

impl Default for HashEncoder {
    fn default() -> Self {
        Self::new(crate::DEFAULT_DIMENSION)
    }
}

#[async_trait]
impl TextEncoder for HashEncoder {
    fn name(&self) -> &str {
        "hash"
    }

    fn model(&self) -> &str {
        "hashed-bag-of-words"
    }

    async fn encode(&self, texts: &[String]) -> Result<Vec<Embedding>> {
        Ok(texts.iter().map(|text| self.encode_one(text)).collect())
    }
}
