//! Prompt documents and the field selections made over them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable identifier of a prompt document.
///
/// Ids arrive from the store as opaque strings. Stores that key
/// documents by a typed object id accept the canonical form (24 hex
/// digits, lowercased); everything else matches on the raw string. The
/// two-attempt lookup lives in the [`PromptSource`](crate::PromptSource)
/// implementations, so the rest of the system only ever handles a
/// `PromptId`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PromptId(String);

impl PromptId {
    /// Wrap a raw id string.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Get the raw string form, exactly as the store produced it.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get the canonical typed form, if the raw form parses as one.
    ///
    /// `None` means the id can only match as a raw string.
    pub fn canonical(&self) -> Option<String> {
        let raw = self.0.trim();
        if raw.len() == 24 && raw.chars().all(|c| c.is_ascii_hexdigit()) {
            Some(raw.to_ascii_lowercase())
        } else {
            None
        }
    }
}

impl fmt::Display for PromptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PromptId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for PromptId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

/// A prompt document as stored in the collection.
///
/// Wire names follow the collection schema (`_id`, `createdAt`,
/// `isPublic`). Fields outside a projection come back empty; the
/// similarity system never writes documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptDocument {
    /// Stable identifier.
    #[serde(rename = "_id")]
    pub id: PromptId,

    /// Display title.
    #[serde(default)]
    pub title: String,

    /// Short human-written description.
    #[serde(default)]
    pub description: String,

    /// The prompt text itself. This is what gets embedded.
    #[serde(default)]
    pub content: String,

    /// Category label.
    #[serde(default)]
    pub category: String,

    /// Author identifier.
    #[serde(default)]
    pub author: String,

    /// Ids of users who liked the prompt.
    #[serde(default)]
    pub likes: Vec<String>,

    /// Creation timestamp, when the store recorded one.
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,

    /// Visibility flag. `Some(false)` is explicitly private; `Some(true)`
    /// and `None` both count as public.
    #[serde(rename = "isPublic", default)]
    pub is_public: Option<bool>,
}

impl PromptDocument {
    /// Create a document with the given id and content, all other fields
    /// empty.
    pub fn new(id: impl Into<PromptId>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            description: String::new(),
            content: content.into(),
            category: String::new(),
            author: String::new(),
            likes: Vec::new(),
            created_at: None,
            is_public: None,
        }
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Set the author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Set the list of likes.
    pub fn with_likes(mut self, likes: Vec<String>) -> Self {
        self.likes = likes;
        self
    }

    /// Set the creation timestamp.
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Set the visibility flag explicitly.
    pub fn with_public(mut self, is_public: bool) -> Self {
        self.is_public = Some(is_public);
        self
    }

    /// Restrict the document to a projection, blanking everything else.
    pub fn project(&self, projection: Projection) -> Self {
        let mut doc = Self::new(self.id.clone(), String::new());
        match projection {
            Projection::Index => {
                doc.title = self.title.clone();
                doc.description = self.description.clone();
                doc.content = self.content.clone();
                doc.is_public = self.is_public;
            }
            Projection::Display => {
                doc.title = self.title.clone();
                doc.description = self.description.clone();
                doc.category = self.category.clone();
                doc.author = self.author.clone();
                doc.likes = self.likes.clone();
                doc.created_at = self.created_at;
            }
            Projection::Full => return self.clone(),
        }
        doc
    }
}

/// Field sets the similarity system requests from the store.
///
/// Projections keep payloads small. Sources may return extra fields but
/// must include the selected ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Projection {
    /// Fields the index build needs.
    Index,
    /// Fields result enrichment needs.
    Display,
    /// Every stored field.
    Full,
}

impl Projection {
    /// Wire names of the selected fields. Empty means no restriction.
    pub fn fields(self) -> &'static [&'static str] {
        match self {
            Projection::Index => &["_id", "title", "description", "content", "isPublic"],
            Projection::Display => &[
                "_id",
                "title",
                "description",
                "category",
                "author",
                "likes",
                "createdAt",
            ],
            Projection::Full => &[],
        }
    }
}

/// Server-side narrowing for [`find`](crate::PromptSource::find).
///
/// The default filter matches every document. The index build always
/// fetches with the default and does its own corpus selection, so the
/// fallback from public-only to everything stays in one place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptFilter {
    /// Match only documents with this exact visibility flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,

    /// Match only documents in this category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl PromptFilter {
    /// Check a document against the filter.
    pub fn matches(&self, doc: &PromptDocument) -> bool {
        if let Some(want) = self.is_public {
            if doc.is_public != Some(want) {
                return false;
            }
        }
        if let Some(want) = &self.category {
            if &doc.category != want {
                return false;
            }
        }
        true
    }
}
