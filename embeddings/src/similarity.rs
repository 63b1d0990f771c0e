//! Distance and score computation for embeddings.

use crate::Embedding;
use crate::error::{EmbeddingError, Result};

/// Compute the squared euclidean distance between two embeddings.
///
/// The square root is never taken: ranking by squared distance orders
/// candidates the same way, and the score derivation below consumes the
/// squared form directly.
pub fn squared_euclidean(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(EmbeddingError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    Ok(a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum())
}

/// Convert a raw distance into a bounded similarity score.
///
/// Returns a value in (0.0, 1.0] for non-negative distances:
/// - 1.0 means zero distance (an exact match)
/// - values fall monotonically toward 0.0 as distance grows
///
/// The denominator never reaches zero, so the conversion is total.
pub fn distance_to_similarity(distance: f32) -> f32 {
    1.0 / (1.0 + distance)
}

/// Normalize an embedding to unit length.
pub fn normalize(embedding: &mut Embedding) {
    let magnitude: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
    if magnitude > 0.0 {
        for x in embedding.iter_mut() {
            *x /= magnitude;
        }
    }
}
