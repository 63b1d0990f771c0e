//! Flat index for exhaustive nearest-neighbor search.

use ordered_float::OrderedFloat;
use tracing::debug;

use crate::Embedding;
use crate::error::{EmbeddingError, Result};
use crate::similarity::squared_euclidean;

/// A single match returned by a search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Row position of the matched vector, as assigned at insertion.
    pub row: usize,

    /// Squared euclidean distance between the query and the match.
    pub distance: f32,
}

/// An exhaustive nearest-neighbor index over fixed-dimension vectors.
///
/// Vectors are stored densely in insertion order and every search scans
/// all rows, so results are exact. Rows are append-only: positions never
/// shift, and the only way to drop or change an entry is to build a
/// fresh index and swap it in.
pub struct FlatIndex {
    /// Expected dimension of every row.
    dimension: usize,

    /// Stored vectors, row `i` at position `i`.
    rows: Vec<Embedding>,
}

impl FlatIndex {
    /// Create an empty index for vectors of the given dimension.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            rows: Vec::new(),
        }
    }

    /// Get the dimension this index accepts.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Get the number of rows in the index.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the index holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append vectors to the index in the given order.
    ///
    /// Row positions continue from the current size. Nothing is inserted
    /// if any vector has the wrong dimension.
    pub fn add(&mut self, vectors: Vec<Embedding>) -> Result<()> {
        for vector in &vectors {
            if vector.len() != self.dimension {
                return Err(EmbeddingError::DimensionMismatch {
                    expected: self.dimension,
                    actual: vector.len(),
                });
            }
        }

        let start = self.rows.len();
        self.rows.extend(vectors);
        debug!("Added rows {start}..{} to flat index", self.rows.len());

        Ok(())
    }

    /// Find the `k` nearest rows to `query` by squared euclidean distance.
    ///
    /// Results are ordered by ascending distance; ties keep ascending row
    /// order, so a fixed index always returns the same sequence. `k` must
    /// not exceed [`len`](Self::len); callers clamp before searching.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        if query.len() != self.dimension {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        if k > self.rows.len() {
            return Err(EmbeddingError::KOutOfRange {
                k,
                rows: self.rows.len(),
            });
        }

        let mut scored: Vec<(OrderedFloat<f32>, usize)> = Vec::with_capacity(self.rows.len());
        for (row, stored) in self.rows.iter().enumerate() {
            let distance = squared_euclidean(query, stored)?;
            scored.push((OrderedFloat(distance), row));
        }

        // Sort by distance ascending, row ascending on ties.
        scored.sort_unstable();

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(distance, row)| Neighbor {
                row,
                distance: distance.0,
            })
            .collect())
    }
}
