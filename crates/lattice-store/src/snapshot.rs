//! Bulk save/load contract for the persistence collaborator
//!
//! The store exports its full state as a [`StoreSnapshot`] and accepts one
//! back exactly once at process start. How the document reaches disk (or
//! anywhere else) is the collaborator's business — this crate never performs
//! file I/O. The serialized layout keeps the original on-disk shape: `nodes`
//! and `edges` maps keyed by id, plus the id counters.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use lattice_core::{Edge, EdgeId, Node, NodeId, StoreError, StoreResult};

/// Persisted id counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotCounters {
    /// Next node id the allocator will issue
    pub next_node_id: u64,

    /// Next edge id the allocator will issue
    pub next_edge_id: u64,
}

impl Default for SnapshotCounters {
    fn default() -> Self {
        Self {
            next_node_id: 1,
            next_edge_id: 1,
        }
    }
}

/// Full store state: both entity tables and both id counters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSnapshot {
    /// All nodes, keyed by id
    #[serde(default)]
    pub nodes: HashMap<NodeId, Node>,

    /// All edges, keyed by id
    #[serde(default)]
    pub edges: HashMap<EdgeId, Edge>,

    /// Id counters to resume allocation from
    #[serde(default)]
    pub counters: SnapshotCounters,
}

impl StoreSnapshot {
    /// Validate the snapshot against store invariants before installing it
    ///
    /// Checks, in order:
    /// - every node embedding matches the configured dimensionality
    ///   ([`StoreError::DimensionMismatch`])
    /// - map keys agree with entity ids, edge endpoints resolve, and the
    ///   counters sit above every persisted id, so restored allocation can
    ///   never reuse an identifier ([`StoreError::CorruptSnapshot`])
    pub fn validate(&self, dimensions: usize) -> StoreResult<()> {
        for (key, node) in &self.nodes {
            if *key != node.id {
                return Err(StoreError::CorruptSnapshot(format!(
                    "node map key {key} disagrees with node id {}",
                    node.id
                )));
            }
            if node.embedding.len() != dimensions {
                return Err(StoreError::dimension_mismatch(
                    dimensions,
                    node.embedding.len(),
                ));
            }
        }

        let node_ids: HashSet<NodeId> = self.nodes.keys().copied().collect();
        for (key, edge) in &self.edges {
            if *key != edge.id {
                return Err(StoreError::CorruptSnapshot(format!(
                    "edge map key {key} disagrees with edge id {}",
                    edge.id
                )));
            }
            for endpoint in [edge.source, edge.target] {
                if !node_ids.contains(&endpoint) {
                    return Err(StoreError::CorruptSnapshot(format!(
                        "edge {} references missing node {endpoint}",
                        edge.id
                    )));
                }
            }
        }

        let max_node = self.nodes.keys().map(|id| id.0).max().unwrap_or(0);
        let max_edge = self.edges.keys().map(|id| id.0).max().unwrap_or(0);
        if self.counters.next_node_id <= max_node {
            return Err(StoreError::CorruptSnapshot(format!(
                "node counter {} would reuse ids up to {max_node}",
                self.counters.next_node_id
            )));
        }
        if self.counters.next_edge_id <= max_edge {
            return Err(StoreError::CorruptSnapshot(format!(
                "edge counter {} would reuse ids up to {max_edge}",
                self.counters.next_edge_id
            )));
        }

        Ok(())
    }
}
