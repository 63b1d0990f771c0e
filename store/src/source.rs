//! Prompt document sources.
//!
//! A [`PromptSource`] is the read seam between the similarity system and
//! wherever prompts actually live. `HttpSource` talks to the document
//! API; `MemorySource` holds a fixed set of documents for tests and
//! embedded use.

use async_trait::async_trait;
use tracing::debug;

use crate::document::{PromptDocument, PromptFilter, PromptId, Projection};
use crate::error::{Result, StoreError};

/// Trait for prompt document sources.
#[async_trait]
pub trait PromptSource: Send + Sync {
    /// Get the name of this source.
    fn name(&self) -> &str;

    /// Probe connectivity to the underlying store.
    async fn ping(&self) -> Result<()>;

    /// Fetch all documents matching `filter`, restricted to `projection`.
    ///
    /// The returned order is the store's natural order and is stable
    /// between calls while the collection is unchanged.
    async fn find(
        &self,
        filter: &PromptFilter,
        projection: Projection,
    ) -> Result<Vec<PromptDocument>>;

    /// Fetch a single document by id, restricted to `projection`.
    ///
    /// Implementations try the canonical id form first and fall back to
    /// the raw string. `Ok(None)` means both attempts missed, which
    /// callers treat as a normal not-found outcome.
    async fn find_one(
        &self,
        id: &PromptId,
        projection: Projection,
    ) -> Result<Option<PromptDocument>>;
}

/// Source backed by the REST document API.
///
/// Endpoint shape: `GET {base}/health` for the probe, `GET
/// {base}/prompts` for listings and `GET {base}/prompts/{id}` for single
/// lookups, where a 404 means miss. Projections and filters travel as
/// query parameters.
pub struct HttpSource {
    /// API base URL.
    base_url: String,

    /// HTTP client.
    client: reqwest::Client,
}

impl HttpSource {
    /// Create a source against the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    async fn get_by_id(
        &self,
        raw_id: &str,
        projection: Projection,
    ) -> Result<Option<PromptDocument>> {
        let mut request = self.client.get(format!("{}/prompts/{raw_id}", self.base_url));
        if !projection.fields().is_empty() {
            request = request.query(&[("fields", projection.fields().join(","))]);
        }

        let response = request.send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(StoreError::Api {
                status: response.status().as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let document = response
            .json()
            .await
            .map_err(|e| StoreError::InvalidDocument(e.to_string()))?;

        Ok(Some(document))
    }
}

#[async_trait]
impl PromptSource for HttpSource {
    fn name(&self) -> &str {
        "http"
    }

    async fn ping(&self) -> Result<()> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .map_err(|e| StoreError::Unreachable(e.to_string()))?;

        if response.status().is_success() {
            debug!("Store reachable at {}", self.base_url);
            Ok(())
        } else {
            Err(StoreError::Unreachable(format!(
                "health check returned {}",
                response.status()
            )))
        }
    }

    async fn find(
        &self,
        filter: &PromptFilter,
        projection: Projection,
    ) -> Result<Vec<PromptDocument>> {
        let mut request = self.client.get(format!("{}/prompts", self.base_url));
        if !projection.fields().is_empty() {
            request = request.query(&[("fields", projection.fields().join(","))]);
        }
        if let Some(is_public) = filter.is_public {
            request = request.query(&[("isPublic", is_public)]);
        }
        if let Some(category) = &filter.category {
            request = request.query(&[("category", category.as_str())]);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(StoreError::Api {
                status: response.status().as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let documents: Vec<PromptDocument> = response
            .json()
            .await
            .map_err(|e| StoreError::InvalidDocument(e.to_string()))?;
        debug!("Fetched {} documents from the store", documents.len());

        Ok(documents)
    }

    async fn find_one(
        &self,
        id: &PromptId,
        projection: Projection,
    ) -> Result<Option<PromptDocument>> {
        if let Some(canonical) = id.canonical() {
            if let Some(doc) = self.get_by_id(&canonical, projection).await? {
                return Ok(Some(doc));
            }
            // A second attempt only helps when the raw spelling differs.
            if canonical == id.as_str() {
                return Ok(None);
            }
        }
        self.get_by_id(id.as_str(), projection).await
    }
}

/// In-memory source over a fixed set of documents.
///
/// `find` returns documents in insertion order, which stands in for the
/// store's natural order.
#[derive(Default)]
pub struct MemorySource {
    documents: Vec<PromptDocument>,
}

impl MemorySource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source over the given documents, preserving order.
    pub fn with_documents(documents: Vec<PromptDocument>) -> Self {
        Self { documents }
    }

    /// Add a document at the end of the collection.
    pub fn insert(&mut self, document: PromptDocument) {
        self.documents.push(document);
    }

    fn lookup(&self, key: &str) -> Option<&PromptDocument> {
        self.documents.iter().find(|doc| doc.id.as_str() == key)
    }
}

#[async_trait]
impl PromptSource for MemorySource {
    fn name(&self) -> &str {
        "memory"
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn find(
        &self,
        filter: &PromptFilter,
        projection: Projection,
    ) -> Result<Vec<PromptDocument>> {
        Ok(self
            .documents
            .iter()
            .filter(|doc| filter.matches(doc))
            .map(|doc| doc.project(projection))
            .collect())
    }

    async fn find_one(
        &self,
        id: &PromptId,
        projection: Projection,
    ) -> Result<Option<PromptDocument>> {
        let hit = id
            .canonical()
            .and_then(|canonical| self.lookup(&canonical))
            .or_else(|| self.lookup(id.as_str()));

        Ok(hit.map(|doc| doc.project(projection)))
    }
}
