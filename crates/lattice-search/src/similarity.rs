//! Embedding-similarity ranking
//!
//! Scores every node in a view by cosine similarity to a query vector. The
//! scan is exhaustive — no pruning, no index — which is exactly right at the
//! scale this store targets and keeps the scoring trivially deterministic.

use std::cmp::Ordering;

use lattice_core::{NodeId, StoreError, StoreResult};
use lattice_store::StoreView;

/// Cosine similarity between two vectors, in [-1, 1]
///
/// A zero vector scores 0.0 against anything (no division by zero). Length
/// disagreement is a configuration defect and fails fast with
/// [`StoreError::DimensionMismatch`] rather than producing a wrong score.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> StoreResult<f32> {
    if a.len() != b.len() {
        return Err(StoreError::dimension_mismatch(a.len(), b.len()));
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok(dot / (norm_a * norm_b))
}

/// Rank all nodes in the view by similarity to the query vector
///
/// Returns up to `top_k` `(node_id, score)` pairs sorted by descending score,
/// ties broken by ascending node id. An empty store yields an empty list. A
/// stored embedding whose length disagrees with the query's fails the whole
/// call — a wrong-size vector in the store is a defect, not a low-scoring
/// result.
pub fn vector_search(
    view: &StoreView<'_>,
    query: &[f32],
    top_k: usize,
) -> StoreResult<Vec<(NodeId, f32)>> {
    let mut results = Vec::with_capacity(view.node_count());
    for node in view.nodes() {
        let score = cosine_similarity(query, &node.embedding)?;
        results.push((node.id, score));
    }

    results.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    results.truncate(top_k);

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_of_self_is_one() {
        let v = vec![0.3, -0.7, 0.2, 0.9];
        let score = cosine_similarity(&v, &v).expect("cosine");
        assert!((score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_of_opposite_is_minus_one() {
        let v = vec![1.0, 2.0];
        let w = vec![-1.0, -2.0];
        let score = cosine_similarity(&v, &w).expect("cosine");
        assert!((score + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_orthogonal_vectors_score_zero() {
        let score = cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).expect("cosine");
        assert!(score.abs() < 1e-6);
    }

    #[test]
    fn test_zero_vector_scores_zero() {
        let score = cosine_similarity(&[0.0, 0.0], &[0.4, 0.6]).expect("cosine");
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_length_mismatch_fails_fast() {
        assert!(matches!(
            cosine_similarity(&[1.0, 2.0], &[1.0]),
            Err(StoreError::DimensionMismatch {
                expected: 2,
                actual: 1
            })
        ));
    }
}
