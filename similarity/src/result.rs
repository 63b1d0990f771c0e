//! Query result shaping.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use promptforce_embeddings::distance_to_similarity;
use promptforce_store::{PromptDocument, PromptId};

/// A single similarity match, enriched for display.
///
/// Serialized with the collection's wire names so downstream consumers
/// of the JSON records see the same shape the store uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarPrompt {
    /// Matched document id.
    #[serde(rename = "_id")]
    pub id: PromptId,

    /// Display title.
    pub title: String,

    /// Short description.
    pub description: String,

    /// Category label.
    pub category: String,

    /// Author identifier.
    pub author: String,

    /// Ids of users who liked the prompt.
    pub likes: Vec<String>,

    /// Creation timestamp, when known.
    #[serde(rename = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,

    /// Bounded similarity score: `1 / (1 + distance)`, in (0, 1].
    pub similarity: f32,

    /// Raw squared euclidean distance the score derives from.
    pub distance: f32,
}

impl SimilarPrompt {
    /// Build a result item from an enriched document and its distance.
    pub fn from_document(document: &PromptDocument, distance: f32) -> Self {
        Self {
            id: document.id.clone(),
            title: document.title.clone(),
            description: document.description.clone(),
            category: document.category.clone(),
            author: document.author.clone(),
            likes: document.likes.clone(),
            created_at: document.created_at,
            similarity: distance_to_similarity(distance),
            distance,
        }
    }
}
