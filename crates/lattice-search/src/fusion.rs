//! Fusion of similarity and graph-proximity scores
//!
//! One pass over the store: every node gets a similarity score against the
//! query vector; nodes discovered by the optional graph traversal get a
//! proximity score (everything else 0.0); the two are blended by
//! caller-supplied weights into a single ranked list.

use std::cmp::Ordering;

use tracing::debug;

use lattice_core::{NodeId, StoreError, StoreResult};
use lattice_store::StoreView;

use crate::graph::{bfs_distances, proximity};
use crate::similarity::cosine_similarity;

/// Validated weight pair for hybrid scoring
///
/// Weights need not sum to 1 — the fused score is normalized by their sum.
/// Construction rejects negative, non-finite, and all-zero weights, so a
/// value of this type always denotes a usable blend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FusionWeights {
    vector: f32,
    graph: f32,
}

impl FusionWeights {
    /// Validate a weight pair
    ///
    /// Fails with [`StoreError::InvalidWeights`] unless both weights are
    /// finite, non-negative, and at least one is positive.
    pub fn new(vector: f32, graph: f32) -> StoreResult<Self> {
        let unusable = !vector.is_finite()
            || !graph.is_finite()
            || vector < 0.0
            || graph < 0.0
            || (vector == 0.0 && graph == 0.0);
        if unusable {
            return Err(StoreError::InvalidWeights {
                vector_weight: vector,
                graph_weight: graph,
            });
        }
        Ok(Self { vector, graph })
    }

    /// The similarity weight
    pub fn vector(&self) -> f32 {
        self.vector
    }

    /// The proximity weight
    pub fn graph(&self) -> f32 {
        self.graph
    }

    /// Blend a similarity and a proximity score
    pub fn fuse(&self, similarity: f32, proximity: f32) -> f32 {
        (self.vector * similarity + self.graph * proximity) / (self.vector + self.graph)
    }
}

/// Starting point for the graph side of a hybrid search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphSeed {
    /// Node the traversal starts from; must exist
    pub start: NodeId,

    /// Maximum hop depth
    pub depth: usize,
}

impl GraphSeed {
    /// Seed a traversal at `start` bounded by `depth`
    pub fn new(start: NodeId, depth: usize) -> Self {
        Self { start, depth }
    }
}

/// Rank all nodes by the weighted blend of similarity and proximity
///
/// Fused score: `(wv * similarity + wg * proximity) / (wv + wg)`. With no
/// seed, every proximity is 0.0 and the ranking degenerates to pure
/// similarity scaled by `wv / (wv + wg)`. A seed naming a missing node
/// propagates [`StoreError::NodeNotFound`] — it is a caller error, not an
/// empty neighborhood. Results are sorted by descending fused score, ties
/// broken by ascending node id, truncated to `top_k`.
pub fn hybrid_search(
    view: &StoreView<'_>,
    query: &[f32],
    weights: FusionWeights,
    seed: Option<GraphSeed>,
    top_k: usize,
) -> StoreResult<Vec<(NodeId, f32)>> {
    // Traverse first so a bad seed fails before any scoring work.
    let distances = match seed {
        Some(seed) => Some(bfs_distances(view, seed.start, seed.depth)?),
        None => None,
    };

    let mut results = Vec::with_capacity(view.node_count());
    for node in view.nodes() {
        let similarity = cosine_similarity(query, &node.embedding)?;
        let graph_score = distances
            .as_ref()
            .and_then(|distances| distances.get(&node.id))
            .map(|&distance| proximity(distance))
            .unwrap_or(0.0);
        results.push((node.id, weights.fuse(similarity, graph_score)));
    }

    results.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    results.truncate(top_k);

    debug!(
        results = results.len(),
        seeded = seed.is_some(),
        "hybrid search complete"
    );
    Ok(results)
}
