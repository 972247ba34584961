//! Graph-proximity ranking
//!
//! Breadth-first search over the directed outgoing-edge adjacency, recording
//! each node's hop distance on first discovery (the standard BFS
//! shortest-hop guarantee). Traversal is strictly directed: an edge
//! `a -> b` makes `b` reachable from `a`, never the reverse.
//!
//! Adjacency is derived from the edge table per call — nothing is persisted —
//! with each node's outgoing edges ordered by edge id.

use std::collections::{HashMap, VecDeque};

use lattice_core::{EdgeId, NodeId, StoreError, StoreResult};
use lattice_store::StoreView;

/// Convert a hop distance to a proximity score in [0, 1]
///
/// `1 / (1 + distance)`: distance 0 maps to 1.0 and the score decreases
/// strictly with every hop. Nodes not discovered within the requested depth
/// get 0.0 (assigned by the caller — this function only sees discovered
/// distances). The exact shape matters: fused scores tie-break on it.
pub fn proximity(distance: usize) -> f32 {
    1.0 / (1.0 + distance as f32)
}

/// BFS hop distances from `start`, bounded by `depth`
///
/// Shared by [`graph_search`] and the fusion engine. A missing start node is
/// [`StoreError::NodeNotFound`] — the absent seed is a caller error, distinct
/// from a node with no reachable neighbors.
pub(crate) fn bfs_distances(
    view: &StoreView<'_>,
    start: NodeId,
    depth: usize,
) -> StoreResult<HashMap<NodeId, usize>> {
    if !view.contains_node(start) {
        return Err(StoreError::node_not_found(start));
    }

    // Outgoing adjacency, each neighbor list ordered by edge id.
    let mut adjacency: HashMap<NodeId, Vec<(EdgeId, NodeId)>> = HashMap::new();
    for edge in view.edges() {
        adjacency.entry(edge.source).or_default().push((edge.id, edge.target));
    }
    for neighbors in adjacency.values_mut() {
        neighbors.sort_unstable_by_key(|(edge_id, _)| *edge_id);
    }

    let mut distances = HashMap::from([(start, 0)]);
    let mut queue = VecDeque::from([(start, 0usize)]);

    while let Some((current, current_depth)) = queue.pop_front() {
        if current_depth >= depth {
            continue;
        }

        if let Some(neighbors) = adjacency.get(&current) {
            for &(_, next) in neighbors {
                // A target missing from the node table would mean the cascade
                // invariant broke somewhere upstream.
                debug_assert!(view.contains_node(next), "edge target {next} dangling");
                if !distances.contains_key(&next) {
                    distances.insert(next, current_depth + 1);
                    queue.push_back((next, current_depth + 1));
                }
            }
        }
    }

    Ok(distances)
}

/// All nodes reachable from `start` within `depth` hops, with exact distances
///
/// `depth = 0` returns only the start node (distance 0). Results are ordered
/// by ascending distance, ties broken by ascending node id.
pub fn graph_search(
    view: &StoreView<'_>,
    start: NodeId,
    depth: usize,
) -> StoreResult<Vec<(NodeId, usize)>> {
    let distances = bfs_distances(view, start, depth)?;

    let mut results: Vec<(NodeId, usize)> = distances.into_iter().collect();
    results.sort_unstable_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
    Ok(results)
}
