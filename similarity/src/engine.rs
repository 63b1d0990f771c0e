//! The prompt similarity engine.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use promptforce_embeddings::{
    Embedding, EmbeddingError, FlatIndex, HashEncoder, HttpEncoder, TextEncoder,
};
use promptforce_store::{
    HttpSource, Projection, PromptDocument, PromptFilter, PromptId, PromptSource,
};

use crate::config::{EncoderKind, SimilarityConfig};
use crate::error::{Result, SimilarityError};
use crate::result::SimilarPrompt;

/// The snapshot produced by one successful build.
///
/// `prompt_ids[i]`, `embeddings[i]` and row `i` of `index` always refer
/// to the same document. A build replaces the whole snapshot or none of
/// it, so readers never observe a partial state.
struct IndexState {
    /// Indexed document ids, in row order.
    prompt_ids: Vec<PromptId>,

    /// Embedding rows, aligned with `prompt_ids`.
    embeddings: Vec<Embedding>,

    /// Flat search structure over the same rows.
    index: FlatIndex,
}

impl IndexState {
    /// Row position of the given id, if it is indexed.
    fn row_of(&self, id: &PromptId) -> Option<usize> {
        self.prompt_ids.iter().position(|known| known == id)
    }
}

/// Outcome of a successful index build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildReport {
    /// Documents returned by the store fetch.
    pub fetched: usize,

    /// Documents surviving corpus selection.
    pub selected: usize,

    /// Documents actually indexed (non-empty content).
    pub indexed: usize,

    /// Embedding dimension of the built index.
    pub dimension: usize,
}

/// Engine that builds the prompt index and answers similarity queries.
///
/// This is the main entry point of the similarity system. It coordinates:
/// - Corpus selection over the prompt collection
/// - Batch encoding and the flat index lifecycle
/// - Both query modes, with result enrichment from the store
///
/// A build computes everything outside the lock and swaps the new state
/// in with a single write. Queries hold read locks, so a query racing a
/// build sees either the old index or the new one, never a mix.
pub struct SimilarityEngine {
    /// Read access to the prompt collection.
    store: Arc<dyn PromptSource>,

    /// Text-to-vector encoder.
    encoder: Arc<dyn TextEncoder>,

    /// Current index snapshot. `None` until the first successful build.
    state: RwLock<Option<IndexState>>,
}

impl SimilarityEngine {
    /// Create an engine over the given adapters.
    ///
    /// No index exists until the first build; queries trigger one
    /// lazily.
    pub fn new(store: Arc<dyn PromptSource>, encoder: Arc<dyn TextEncoder>) -> Self {
        Self {
            store,
            encoder,
            state: RwLock::new(None),
        }
    }

    /// Create an engine wired from configuration.
    pub fn from_config(config: &SimilarityConfig) -> Self {
        let encoder: Arc<dyn TextEncoder> = match config.encoder {
            EncoderKind::Http => {
                let mut encoder = HttpEncoder::new(config.encoder_url.clone())
                    .with_model(config.encoder_model.clone());
                if let Some(key) = &config.encoder_api_key {
                    encoder = encoder.with_api_key(key.clone());
                }
                Arc::new(encoder)
            }
            EncoderKind::Hash => Arc::new(HashEncoder::default()),
        };
        let store = Arc::new(HttpSource::new(config.store_url.clone()));

        info!("Similarity engine configured with {:?} encoder", config.encoder);
        Self::new(store, encoder)
    }

    /// Check whether an index is in place.
    pub async fn is_built(&self) -> bool {
        self.state.read().await.is_some()
    }

    /// Get the number of documents currently indexed.
    pub async fn indexed_count(&self) -> usize {
        self.state
            .read()
            .await
            .as_ref()
            .map_or(0, |state| state.prompt_ids.len())
    }

    /// Rebuild the index from the store, replacing any previous state.
    ///
    /// Returns `true` on success. Failures are logged and collapsed to
    /// `false`, and the previous index, if any, stays in place. `quiet`
    /// lowers progress narration to debug level without changing
    /// behavior or the return value.
    pub async fn build_index(&self, quiet: bool) -> bool {
        match self.try_build(quiet).await {
            Ok(_) => true,
            Err(e) => {
                warn!("Index build failed: {e}");
                false
            }
        }
    }

    /// Rebuild the index, reporting what was indexed or why it failed.
    ///
    /// The corpus is every fetched document whose visibility flag is not
    /// explicitly false; when none qualify, the whole fetched set is
    /// indexed instead. Documents with empty or whitespace-only content
    /// are always dropped. The entire corpus is encoded in one batch.
    pub async fn try_build(&self, quiet: bool) -> Result<BuildReport> {
        narrate(quiet, "Building similarity index");
        debug!(
            "Using the {} source and the {} encoder ({})",
            self.store.name(),
            self.encoder.name(),
            self.encoder.model()
        );

        self.store
            .ping()
            .await
            .map_err(|e| SimilarityError::NotConnected(e.to_string()))?;

        let fetched = self
            .store
            .find(&PromptFilter::default(), Projection::Index)
            .await?;
        let fetched_count = fetched.len();
        narrate(quiet, &format!("Fetched {fetched_count} prompts from the store"));

        // Anything not explicitly private qualifies. An all-private
        // collection falls back to indexing everything.
        let public: Vec<&PromptDocument> = fetched
            .iter()
            .filter(|doc| doc.is_public != Some(false))
            .collect();
        let working = if public.is_empty() {
            if !fetched.is_empty() {
                narrate(quiet, "No public prompts found, indexing the whole collection");
            }
            fetched.iter().collect()
        } else {
            public
        };
        let selected_count = working.len();

        let mut prompt_ids = Vec::new();
        let mut texts = Vec::new();
        for doc in working {
            if doc.content.trim().is_empty() {
                continue;
            }
            prompt_ids.push(doc.id.clone());
            texts.push(doc.content.clone());
        }

        if texts.is_empty() {
            return Err(SimilarityError::EmptyCorpus);
        }

        narrate(quiet, &format!("Encoding {} prompts", texts.len()));
        let embeddings = self.encoder.encode(&texts).await?;

        // The id-to-row alignment depends on one embedding per text, so
        // an encoder that returns the wrong row count must not produce
        // an index.
        if embeddings.len() != prompt_ids.len() {
            return Err(SimilarityError::Embedding(EmbeddingError::InvalidResponse(
                format!(
                    "expected {} embeddings, got {}",
                    prompt_ids.len(),
                    embeddings.len()
                ),
            )));
        }

        let dimension = embeddings.first().map(Vec::len).ok_or_else(|| {
            SimilarityError::Embedding(EmbeddingError::InvalidResponse(
                "encoder returned no rows".to_string(),
            ))
        })?;

        let mut index = FlatIndex::new(dimension);
        index.add(embeddings.clone())?;

        let indexed = prompt_ids.len();
        let state = IndexState {
            prompt_ids,
            embeddings,
            index,
        };

        // Everything above ran outside the lock; the swap is the single
        // mutation readers can observe.
        *self.state.write().await = Some(state);

        narrate(
            quiet,
            &format!("Similarity index built with {indexed} prompts ({dimension} dimensions)"),
        );

        Ok(BuildReport {
            fetched: fetched_count,
            selected: selected_count,
            indexed,
            dimension,
        })
    }

    /// Find prompts similar to an already-indexed prompt.
    ///
    /// Builds the index first when none exists. Returns an empty vector
    /// when the target id is not indexed or on any internal failure;
    /// [`try_find_similar`](Self::try_find_similar) exposes the cause.
    pub async fn find_similar(&self, target_id: &PromptId, limit: usize) -> Vec<SimilarPrompt> {
        match self.try_find_similar(target_id, limit).await {
            Ok(results) => results,
            Err(e) => {
                warn!("Similarity query for {target_id} failed: {e}");
                Vec::new()
            }
        }
    }

    /// Find prompts similar to an already-indexed prompt, reporting
    /// failures.
    ///
    /// The target's stored embedding row is the query vector; the text
    /// is never re-encoded. The target itself never appears in the
    /// results. An unknown target id is a normal outcome and yields an
    /// empty vector.
    pub async fn try_find_similar(
        &self,
        target_id: &PromptId,
        limit: usize,
    ) -> Result<Vec<SimilarPrompt>> {
        self.ensure_built(false).await?;

        let guard = self.state.read().await;
        let state = guard.as_ref().ok_or(SimilarityError::IndexNotBuilt)?;

        let Some(target_row) = state.row_of(target_id) else {
            debug!("Prompt {target_id} is not in the index");
            return Ok(Vec::new());
        };

        // One extra candidate absorbs the target's own row.
        let k = limit.saturating_add(1).min(state.prompt_ids.len());
        let neighbors = state.index.search(&state.embeddings[target_row], k)?;

        let mut results = Vec::new();
        for neighbor in neighbors {
            if results.len() >= limit {
                break;
            }
            let id = &state.prompt_ids[neighbor.row];
            if id == target_id {
                continue;
            }
            match self.store.find_one(id, Projection::Display).await? {
                Some(document) => {
                    results.push(SimilarPrompt::from_document(&document, neighbor.distance));
                }
                None => debug!("Prompt {id} vanished from the store, skipping"),
            }
        }

        Ok(results)
    }

    /// Find prompts similar to free-form query text.
    ///
    /// Builds the index quietly first when none exists. The query text
    /// is encoded fresh on every call; it is not a corpus document, so
    /// no self-match handling applies. Failures collapse to an empty
    /// vector; [`try_find_similar_by_text`](Self::try_find_similar_by_text)
    /// exposes the cause.
    pub async fn find_similar_by_text(&self, query_text: &str, limit: usize) -> Vec<SimilarPrompt> {
        match self.try_find_similar_by_text(query_text, limit).await {
            Ok(results) => results,
            Err(e) => {
                warn!("Text similarity query failed: {e}");
                Vec::new()
            }
        }
    }

    /// Find prompts similar to free-form query text, reporting failures.
    pub async fn try_find_similar_by_text(
        &self,
        query_text: &str,
        limit: usize,
    ) -> Result<Vec<SimilarPrompt>> {
        self.ensure_built(true).await?;

        let query_batch = [query_text.to_string()];
        let mut rows = self.encoder.encode(&query_batch).await?;
        let query_vector = rows.pop().ok_or_else(|| {
            SimilarityError::Embedding(EmbeddingError::InvalidResponse(
                "encoder returned no rows".to_string(),
            ))
        })?;

        let guard = self.state.read().await;
        let state = guard.as_ref().ok_or(SimilarityError::IndexNotBuilt)?;

        let k = limit.min(state.prompt_ids.len());
        let neighbors = state.index.search(&query_vector, k)?;

        let mut results = Vec::new();
        for neighbor in neighbors {
            let id = &state.prompt_ids[neighbor.row];
            match self.store.find_one(id, Projection::Full).await? {
                Some(document) => {
                    results.push(SimilarPrompt::from_document(&document, neighbor.distance));
                }
                None => debug!("Prompt {id} vanished from the store, skipping"),
            }
        }

        Ok(results)
    }

    /// Build the index when no state exists yet.
    async fn ensure_built(&self, quiet: bool) -> Result<()> {
        if self.state.read().await.is_some() {
            return Ok(());
        }

        debug!("No index in place, building before the query");
        self.try_build(quiet).await?;
        Ok(())
    }
}

/// Narrate build progress at info level, or debug level when quiet.
fn narrate(quiet: bool, message: &str) {
    if quiet {
        debug!("{message}");
    } else {
        info!("{message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use promptforce_store::{MemorySource, StoreError};

    /// Source whose backing store is down.
    struct DownSource;

    #[async_trait]
    impl PromptSource for DownSource {
        fn name(&self) -> &str {
            "down"
        }

        async fn ping(&self) -> promptforce_store::Result<()> {
            Err(StoreError::Unreachable("connection refused".to_string()))
        }

        async fn find(
            &self,
            _filter: &PromptFilter,
            _projection: Projection,
        ) -> promptforce_store::Result<Vec<PromptDocument>> {
            Err(StoreError::Unreachable("connection refused".to_string()))
        }

        async fn find_one(
            &self,
            _id: &PromptId,
            _projection: Projection,
        ) -> promptforce_store::Result<Option<PromptDocument>> {
            Err(StoreError::Unreachable("connection refused".to_string()))
        }
    }

    fn engine_over(documents: Vec<PromptDocument>) -> SimilarityEngine {
        SimilarityEngine::new(
            Arc::new(MemorySource::with_documents(documents)),
            Arc::new(HashEncoder::new(16)),
        )
    }

    #[tokio::test]
    async fn test_build_fails_when_store_down() {
        let engine = SimilarityEngine::new(Arc::new(DownSource), Arc::new(HashEncoder::new(16)));

        let err = engine.try_build(false).await.unwrap_err();
        assert!(matches!(err, SimilarityError::NotConnected(_)));

        // The boolean surface collapses the cause.
        assert!(!engine.build_index(false).await);
        assert!(!engine.is_built().await);
    }

    #[tokio::test]
    async fn test_build_empty_collection_is_empty_corpus() {
        let engine = engine_over(Vec::new());
        let err = engine.try_build(false).await.unwrap_err();
        assert!(matches!(err, SimilarityError::EmptyCorpus));
    }

    #[tokio::test]
    async fn test_build_whitespace_only_content_is_empty_corpus() {
        let engine = engine_over(vec![
            PromptDocument::new("a", ""),
            PromptDocument::new("b", " \n\t"),
        ]);
        let err = engine.try_build(false).await.unwrap_err();
        assert!(matches!(err, SimilarityError::EmptyCorpus));
    }

    #[tokio::test]
    async fn test_build_report_counts() {
        let engine = engine_over(vec![
            PromptDocument::new("a", "public with content").with_public(true),
            PromptDocument::new("b", "private with content").with_public(false),
            PromptDocument::new("c", "   ").with_public(true),
        ]);

        let report = engine.try_build(false).await.unwrap();
        assert_eq!(report.fetched, 3);
        // The private document is dropped, the empty one survives
        // selection but not the content check.
        assert_eq!(report.selected, 2);
        assert_eq!(report.indexed, 1);
        assert_eq!(report.dimension, 16);
        assert_eq!(engine.indexed_count().await, 1);
    }

    /// Encoder that silently drops the last row of every batch.
    struct ShortBatchEncoder {
        inner: HashEncoder,
    }

    #[async_trait]
    impl TextEncoder for ShortBatchEncoder {
        fn name(&self) -> &str {
            "short-batch"
        }

        fn model(&self) -> &str {
            self.inner.model()
        }

        async fn encode(&self, texts: &[String]) -> promptforce_embeddings::Result<Vec<Embedding>> {
            let mut rows = self.inner.encode(texts).await?;
            rows.pop();
            Ok(rows)
        }
    }

    #[tokio::test]
    async fn test_build_rejects_encoder_row_count_mismatch() {
        let docs = vec![
            PromptDocument::new("a", "first prompt text"),
            PromptDocument::new("b", "second prompt text"),
            PromptDocument::new("c", "third prompt text"),
        ];
        let engine = SimilarityEngine::new(
            Arc::new(MemorySource::with_documents(docs)),
            Arc::new(ShortBatchEncoder {
                inner: HashEncoder::new(16),
            }),
        );

        // A misaligned batch must never become an index.
        let err = engine.try_build(false).await.unwrap_err();
        assert!(matches!(
            err,
            SimilarityError::Embedding(EmbeddingError::InvalidResponse(_))
        ));
        assert!(!engine.build_index(false).await);
        assert!(!engine.is_built().await);

        // Queries collapse the same failure to empty instead of
        // searching misaligned rows.
        assert!(engine.find_similar(&PromptId::new("c"), 5).await.is_empty());
        assert!(engine.find_similar_by_text("any text", 5).await.is_empty());
    }

    #[tokio::test]
    async fn test_quiet_build_behaves_the_same() {
        let docs = vec![
            PromptDocument::new("a", "one prompt"),
            PromptDocument::new("b", "another prompt"),
        ];

        let loud = engine_over(docs.clone()).try_build(false).await.unwrap();
        let quiet = engine_over(docs).try_build(true).await.unwrap();
        assert_eq!(loud, quiet);
    }

    #[tokio::test]
    async fn test_unknown_target_id_is_empty_not_error() {
        let engine = engine_over(vec![PromptDocument::new("a", "some text")]);
        engine.try_build(false).await.unwrap();

        let results = engine
            .try_find_similar(&PromptId::new("missing"), 5)
            .await
            .unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_failed_lazy_build_surfaces_in_try_variant() {
        let engine = SimilarityEngine::new(Arc::new(DownSource), Arc::new(HashEncoder::new(16)));

        let err = engine
            .try_find_similar(&PromptId::new("any"), 5)
            .await
            .unwrap_err();
        assert!(matches!(err, SimilarityError::NotConnected(_)));

        // The public surface turns the same failure into an empty list.
        assert!(engine.find_similar(&PromptId::new("any"), 5).await.is_empty());
        assert!(engine.find_similar_by_text("any text", 5).await.is_empty());
    }

    /// Encoder returning a fixed vector per known text.
    struct StubEncoder {
        rows: Vec<(String, Embedding)>,
    }

    impl StubEncoder {
        fn new(rows: Vec<(&str, Embedding)>) -> Self {
            Self {
                rows: rows
                    .into_iter()
                    .map(|(text, vector)| (text.to_string(), vector))
                    .collect(),
            }
        }
    }

    #[async_trait]
    impl TextEncoder for StubEncoder {
        fn name(&self) -> &str {
            "stub"
        }

        fn model(&self) -> &str {
            "stub"
        }

        async fn encode(&self, texts: &[String]) -> promptforce_embeddings::Result<Vec<Embedding>> {
            texts
                .iter()
                .map(|text| {
                    self.rows
                        .iter()
                        .find(|(known, _)| known == text)
                        .map(|(_, vector)| vector.clone())
                        .ok_or_else(|| {
                            EmbeddingError::InvalidResponse(format!("no stub vector for: {text}"))
                        })
                })
                .collect()
        }
    }

    /// Four prompts on a line: a at 0, b at 1, d at 2, c at 3.
    fn line_engine() -> SimilarityEngine {
        let docs = vec![
            PromptDocument::new("a", "text a").with_title("A"),
            PromptDocument::new("b", "text b").with_title("B"),
            PromptDocument::new("c", "text c").with_title("C"),
            PromptDocument::new("d", "text d").with_title("D"),
        ];
        let encoder = StubEncoder::new(vec![
            ("text a", vec![0.0, 0.0]),
            ("text b", vec![1.0, 0.0]),
            ("text c", vec![3.0, 0.0]),
            ("text d", vec![2.0, 0.0]),
        ]);
        SimilarityEngine::new(
            Arc::new(MemorySource::with_documents(docs)),
            Arc::new(encoder),
        )
    }

    #[tokio::test]
    async fn test_results_ordered_by_ascending_distance() {
        let engine = line_engine();
        let results = engine
            .try_find_similar(&PromptId::new("a"), 3)
            .await
            .unwrap();

        let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "d", "c"]);

        let distances: Vec<f32> = results.iter().map(|r| r.distance).collect();
        assert_eq!(distances, vec![1.0, 4.0, 9.0]);

        for result in &results {
            assert!((result.similarity - 1.0 / (1.0 + result.distance)).abs() < 1e-6);
        }
    }

    #[tokio::test]
    async fn test_limit_bounds_results() {
        let engine = line_engine();
        assert_eq!(engine.find_similar(&PromptId::new("a"), 2).await.len(), 2);
        assert_eq!(engine.find_similar(&PromptId::new("a"), 0).await.len(), 0);
        // A limit past the corpus size returns what exists.
        assert_eq!(engine.find_similar(&PromptId::new("a"), 50).await.len(), 3);
    }

    #[tokio::test]
    async fn test_target_excluded_even_at_zero_distance() {
        // Two prompts with identical vectors: the target's own row must
        // be skipped while its twin comes back as an exact match.
        let docs = vec![
            PromptDocument::new("a", "text a"),
            PromptDocument::new("twin", "text twin"),
        ];
        let encoder = StubEncoder::new(vec![
            ("text a", vec![1.0, 1.0]),
            ("text twin", vec![1.0, 1.0]),
        ]);
        let engine = SimilarityEngine::new(
            Arc::new(MemorySource::with_documents(docs)),
            Arc::new(encoder),
        );

        let results = engine
            .try_find_similar(&PromptId::new("a"), 5)
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, PromptId::new("twin"));
        assert!((results[0].similarity - 1.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_by_text_has_no_self_reservation() {
        let engine = line_engine();
        let results = engine
            .try_find_similar_by_text("text a", 2)
            .await
            .unwrap();

        // The query matches a's vector exactly; a itself is a valid hit.
        let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert!((results[0].similarity - 1.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_results_carry_display_fields() {
        let docs = vec![
            PromptDocument::new("a", "text a"),
            PromptDocument::new("b", "text b")
                .with_title("Closest")
                .with_description("the nearest prompt")
                .with_category("coding")
                .with_author("507f1f77bcf86cd799439099")
                .with_likes(vec!["u1".to_string()]),
        ];
        let encoder = StubEncoder::new(vec![("text a", vec![0.0]), ("text b", vec![1.0])]);
        let engine = SimilarityEngine::new(
            Arc::new(MemorySource::with_documents(docs)),
            Arc::new(encoder),
        );

        let results = engine
            .try_find_similar(&PromptId::new("a"), 5)
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Closest");
        assert_eq!(results[0].description, "the nearest prompt");
        assert_eq!(results[0].category, "coding");
        assert_eq!(results[0].author, "507f1f77bcf86cd799439099");
        assert_eq!(results[0].likes, vec!["u1".to_string()]);
    }

    /// Source that lists a document which single lookups cannot find.
    struct VanishingSource {
        inner: MemorySource,
        hidden: PromptId,
    }

    #[async_trait]
    impl PromptSource for VanishingSource {
        fn name(&self) -> &str {
            "vanishing"
        }

        async fn ping(&self) -> promptforce_store::Result<()> {
            self.inner.ping().await
        }

        async fn find(
            &self,
            filter: &PromptFilter,
            projection: Projection,
        ) -> promptforce_store::Result<Vec<PromptDocument>> {
            self.inner.find(filter, projection).await
        }

        async fn find_one(
            &self,
            id: &PromptId,
            projection: Projection,
        ) -> promptforce_store::Result<Option<PromptDocument>> {
            if *id == self.hidden {
                return Ok(None);
            }
            self.inner.find_one(id, projection).await
        }
    }

    #[tokio::test]
    async fn test_vanished_document_is_skipped() {
        let docs = vec![
            PromptDocument::new("a", "text a"),
            PromptDocument::new("b", "text b"),
            PromptDocument::new("c", "text c"),
        ];
        let encoder = StubEncoder::new(vec![
            ("text a", vec![0.0]),
            ("text b", vec![1.0]),
            ("text c", vec![2.0]),
        ]);
        let source = VanishingSource {
            inner: MemorySource::with_documents(docs),
            hidden: PromptId::new("b"),
        };
        let engine = SimilarityEngine::new(Arc::new(source), Arc::new(encoder));

        // b is indexed and nearest, but enrichment misses it; the result
        // set moves on to c rather than failing.
        let results = engine
            .try_find_similar(&PromptId::new("a"), 5)
            .await
            .unwrap();
        let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["c"]);
    }

    /// Encoder that counts how many encode calls reach it.
    struct CountingEncoder {
        inner: HashEncoder,
        calls: std::sync::atomic::AtomicUsize,
    }

    impl CountingEncoder {
        fn new() -> Self {
            Self {
                inner: HashEncoder::new(16),
                calls: std::sync::atomic::AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl TextEncoder for CountingEncoder {
        fn name(&self) -> &str {
            "counting"
        }

        fn model(&self) -> &str {
            self.inner.model()
        }

        async fn encode(&self, texts: &[String]) -> promptforce_embeddings::Result<Vec<Embedding>> {
            self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            self.inner.encode(texts).await
        }
    }

    #[tokio::test]
    async fn test_by_id_query_reuses_stored_vector() {
        let docs = vec![
            PromptDocument::new("a", "first prompt text"),
            PromptDocument::new("b", "second prompt text"),
        ];
        let encoder = Arc::new(CountingEncoder::new());
        let engine = SimilarityEngine::new(
            Arc::new(MemorySource::with_documents(docs)),
            encoder.clone(),
        );

        engine.try_build(false).await.unwrap();
        assert_eq!(encoder.calls.load(std::sync::atomic::Ordering::SeqCst), 1);

        // By-id queries never touch the encoder again.
        engine.find_similar(&PromptId::new("a"), 5).await;
        assert_eq!(encoder.calls.load(std::sync::atomic::Ordering::SeqCst), 1);

        // Free-text queries encode exactly the query text.
        engine.find_similar_by_text("fresh text", 5).await;
        assert_eq!(encoder.calls.load(std::sync::atomic::Ordering::SeqCst), 2);
    }
}
