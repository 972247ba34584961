//! The entity store: node/edge tables with referential integrity
//!
//! A single `RwLock` guards both tables and both id counters. Readers take
//! the lock shared — [`StoreView`] holds the guard for the duration of a
//! ranker call, so a whole search observes one consistent state. Mutations
//! take it exclusive for their entire effect; in particular the node-deletion
//! cascade removes the node and every edge touching it inside one lock scope.
//!
//! Embedding happens outside the lock (the provider may be arbitrarily slow),
//! and the change observer is notified after the lock is released, so neither
//! capability can stall readers.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard};
use tracing::{debug, info};

use lattice_core::{
    ChangeObserver, Edge, EdgeId, EmbeddingProvider, Metadata, Node, NodeId, NodePatch,
    NoopObserver, StoreError, StoreResult,
};

use crate::alloc::IdAllocator;
use crate::snapshot::{SnapshotCounters, StoreSnapshot};

/// Everything behind the lock: both tables and both allocators
#[derive(Debug)]
struct TableSet {
    nodes: HashMap<NodeId, Node>,
    edges: HashMap<EdgeId, Edge>,
    node_ids: IdAllocator,
    edge_ids: IdAllocator,
}

impl TableSet {
    fn empty() -> Self {
        Self {
            nodes: HashMap::new(),
            edges: HashMap::new(),
            node_ids: IdAllocator::new(),
            edge_ids: IdAllocator::new(),
        }
    }
}

/// In-memory store owning all nodes and edges
///
/// The store is the single mutable shared resource of the engine. It is
/// cheap to share behind an `Arc` and safe to use from any number of
/// threads; see the module docs for the locking discipline.
pub struct EntityStore {
    inner: RwLock<TableSet>,
    embedder: Arc<dyn EmbeddingProvider>,
    observer: Arc<dyn ChangeObserver>,
    dimensions: usize,
}

impl EntityStore {
    /// Create an empty store using the given embedding provider
    ///
    /// Dimensionality is taken from the provider; every stored vector must
    /// match it. No persistence collaborator is attached.
    pub fn new(embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self::with_observer(embedder, Arc::new(NoopObserver))
    }

    /// Create an empty store with a persistence observer attached
    pub fn with_observer(
        embedder: Arc<dyn EmbeddingProvider>,
        observer: Arc<dyn ChangeObserver>,
    ) -> Self {
        let dimensions = embedder.dimensions();
        Self {
            inner: RwLock::new(TableSet::empty()),
            embedder,
            observer,
            dimensions,
        }
    }

    /// Embedding dimensionality every stored vector matches
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Embed arbitrary text through the store's provider
    ///
    /// Used by the search layer to turn query text into a query vector with
    /// the same provider that embedded the stored nodes.
    pub fn embed(&self, text: &str) -> StoreResult<Vec<f32>> {
        self.embed_checked(text)
    }

    /// Embed text and verify the provider honored its dimensionality contract
    fn embed_checked(&self, text: &str) -> StoreResult<Vec<f32>> {
        let embedding = self.embedder.embed(text)?;
        if embedding.len() != self.dimensions {
            return Err(StoreError::dimension_mismatch(
                self.dimensions,
                embedding.len(),
            ));
        }
        Ok(embedding)
    }

    // === Node CRUD ===

    /// Create a node from text and metadata
    ///
    /// Embeds the text, allocates a fresh id, and stores the node. Cannot
    /// fail for valid input; an embedding-provider failure surfaces as
    /// [`StoreError::Embedding`].
    pub fn create_node(&self, text: impl Into<String>, metadata: Metadata) -> StoreResult<Node> {
        let text = text.into();
        let embedding = self.embed_checked(&text)?;

        let node = {
            let mut inner = self.inner.write();
            let id = NodeId(inner.node_ids.allocate());
            let node = Node::new(id, text, metadata, embedding);
            inner.nodes.insert(id, node.clone());
            node
        };

        debug!(node_id = %node.id, "created node");
        self.observer.store_changed();
        Ok(node)
    }

    /// Get a node by id
    pub fn get_node(&self, id: NodeId) -> StoreResult<Node> {
        self.inner
            .read()
            .nodes
            .get(&id)
            .cloned()
            .ok_or(StoreError::NodeNotFound { id })
    }

    /// Apply a partial update to a node
    ///
    /// Replaces whichever of text/metadata the patch supplies, preserving the
    /// id. A supplied text is re-embedded; a metadata-only patch keeps the
    /// existing vector.
    pub fn update_node(&self, id: NodeId, patch: NodePatch) -> StoreResult<Node> {
        // Embed before taking the write lock; wasted only if the id is stale.
        let embedded = match &patch.text {
            Some(text) => Some(self.embed_checked(text)?),
            None => None,
        };

        let node = {
            let mut inner = self.inner.write();
            let node = inner
                .nodes
                .get_mut(&id)
                .ok_or(StoreError::NodeNotFound { id })?;

            if let Some(text) = patch.text {
                node.text = text;
            }
            if let Some(embedding) = embedded {
                node.embedding = embedding;
            }
            if let Some(metadata) = patch.metadata {
                node.metadata = metadata;
            }
            node.updated_at = chrono::Utc::now();
            node.clone()
        };

        debug!(node_id = %id, "updated node");
        self.observer.store_changed();
        Ok(node)
    }

    /// Delete a node and cascade to every edge touching it
    ///
    /// The node removal and the edge sweep happen under one write-lock scope:
    /// no reader can observe the node gone while its edges linger, or vice
    /// versa.
    pub fn delete_node(&self, id: NodeId) -> StoreResult<()> {
        let cascaded = {
            let mut inner = self.inner.write();
            inner
                .nodes
                .remove(&id)
                .ok_or(StoreError::NodeNotFound { id })?;

            let doomed: Vec<EdgeId> = inner
                .edges
                .values()
                .filter(|edge| edge.touches(id))
                .map(|edge| edge.id)
                .collect();
            for edge_id in &doomed {
                inner.edges.remove(edge_id);
            }
            doomed.len()
        };

        debug!(node_id = %id, cascaded_edges = cascaded, "deleted node");
        self.observer.store_changed();
        Ok(())
    }

    // === Edge CRUD ===

    /// Create a directed edge between two existing nodes
    ///
    /// Fails with [`StoreError::InvalidReference`] when either endpoint does
    /// not exist; on failure nothing is allocated and nothing is stored.
    pub fn create_edge(
        &self,
        source: NodeId,
        target: NodeId,
        edge_type: impl Into<String>,
        weight: f32,
    ) -> StoreResult<Edge> {
        let edge = {
            let mut inner = self.inner.write();
            for endpoint in [source, target] {
                if !inner.nodes.contains_key(&endpoint) {
                    return Err(StoreError::InvalidReference {
                        source,
                        target,
                        missing: endpoint,
                    });
                }
            }

            let id = EdgeId(inner.edge_ids.allocate());
            let edge = Edge::new(id, source, target, edge_type, weight);
            inner.edges.insert(id, edge.clone());
            edge
        };

        debug!(edge_id = %edge.id, source = %source, target = %target, "created edge");
        self.observer.store_changed();
        Ok(edge)
    }

    /// Get an edge by id
    pub fn get_edge(&self, id: EdgeId) -> StoreResult<Edge> {
        self.inner
            .read()
            .edges
            .get(&id)
            .cloned()
            .ok_or(StoreError::EdgeNotFound { id })
    }

    /// Delete an edge by id
    pub fn delete_edge(&self, id: EdgeId) -> StoreResult<()> {
        {
            let mut inner = self.inner.write();
            inner
                .edges
                .remove(&id)
                .ok_or(StoreError::EdgeNotFound { id })?;
        }

        debug!(edge_id = %id, "deleted edge");
        self.observer.store_changed();
        Ok(())
    }

    // === Bulk reads ===

    /// All nodes, in unspecified order
    pub fn nodes(&self) -> Vec<Node> {
        self.inner.read().nodes.values().cloned().collect()
    }

    /// All edges, in unspecified order
    pub fn edges(&self) -> Vec<Edge> {
        self.inner.read().edges.values().cloned().collect()
    }

    /// Number of stored nodes
    pub fn node_count(&self) -> usize {
        self.inner.read().nodes.len()
    }

    /// Number of stored edges
    pub fn edge_count(&self) -> usize {
        self.inner.read().edges.len()
    }

    /// Take a consistent read view for the duration of a ranker call
    ///
    /// The view holds the read lock; drop it promptly. Mutations block while
    /// any view is alive.
    pub fn view(&self) -> StoreView<'_> {
        StoreView {
            guard: self.inner.read(),
        }
    }

    // === Snapshot contract ===

    /// Export the full store state for the persistence collaborator
    pub fn snapshot(&self) -> StoreSnapshot {
        let inner = self.inner.read();
        StoreSnapshot {
            nodes: inner.nodes.clone(),
            edges: inner.edges.clone(),
            counters: SnapshotCounters {
                next_node_id: inner.node_ids.next_id(),
                next_edge_id: inner.edge_ids.next_id(),
            },
        }
    }

    /// Replace the full store state from a snapshot
    ///
    /// Intended to run exactly once at process start. The snapshot is
    /// validated first — dimensionality, referential integrity, counter
    /// sanity — and a corrupt document is rejected without touching the
    /// current state.
    pub fn restore(&self, snapshot: StoreSnapshot) -> StoreResult<()> {
        snapshot.validate(self.dimensions)?;

        let (nodes, edges) = {
            let mut inner = self.inner.write();
            inner.nodes = snapshot.nodes;
            inner.edges = snapshot.edges;
            inner.node_ids = IdAllocator::starting_at(snapshot.counters.next_node_id);
            inner.edge_ids = IdAllocator::starting_at(snapshot.counters.next_edge_id);
            (inner.nodes.len(), inner.edges.len())
        };

        info!(nodes, edges, "restored store from snapshot");
        self.observer.store_changed();
        Ok(())
    }
}

impl std::fmt::Debug for EntityStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("EntityStore")
            .field("nodes", &inner.nodes.len())
            .field("edges", &inner.edges.len())
            .field("dimensions", &self.dimensions)
            .finish()
    }
}

/// Read-locked consistent view of the store
///
/// Rankers receive one of these per call and hold no state of their own.
/// While a view is alive no mutation can start, so everything read through
/// it belongs to a single store state.
pub struct StoreView<'a> {
    guard: RwLockReadGuard<'a, TableSet>,
}

impl StoreView<'_> {
    /// Look up a node by id
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.guard.nodes.get(&id)
    }

    /// Check whether a node exists
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.guard.nodes.contains_key(&id)
    }

    /// Iterate all nodes
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.guard.nodes.values()
    }

    /// Iterate all edges
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.guard.edges.values()
    }

    /// Number of nodes in this view
    pub fn node_count(&self) -> usize {
        self.guard.nodes.len()
    }

    /// Number of edges in this view
    pub fn edge_count(&self) -> usize {
        self.guard.edges.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lattice_core::HashEmbedder;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const DIMS: usize = 16;

    fn make_store() -> EntityStore {
        EntityStore::new(Arc::new(HashEmbedder::new(DIMS)))
    }

    #[derive(Default)]
    struct CountingObserver {
        calls: AtomicUsize,
    }

    impl ChangeObserver for CountingObserver {
        fn store_changed(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_create_and_get_node() {
        let store = make_store();

        let node = store.create_node("hello", Metadata::new()).expect("create");
        assert_eq!(node.id, NodeId(1));
        assert_eq!(node.embedding.len(), DIMS);

        let fetched = store.get_node(node.id).expect("get");
        assert_eq!(fetched.text, "hello");
        assert_eq!(fetched.embedding, node.embedding);
    }

    #[test]
    fn test_get_missing_node() {
        let store = make_store();
        assert_eq!(
            store.get_node(NodeId(99)),
            Err(StoreError::NodeNotFound { id: NodeId(99) })
        );
    }

    #[test]
    fn test_update_text_reembeds() {
        let store = make_store();
        let node = store.create_node("before", Metadata::new()).expect("create");

        let updated = store
            .update_node(node.id, NodePatch::new().with_text("after"))
            .expect("update");

        assert_eq!(updated.id, node.id);
        assert_eq!(updated.text, "after");
        assert_ne!(updated.embedding, node.embedding);
    }

    #[test]
    fn test_metadata_only_update_keeps_embedding() {
        let store = make_store();
        let node = store.create_node("stable", Metadata::new()).expect("create");

        let mut metadata = Metadata::new();
        metadata.insert("k".to_string(), serde_json::json!("v"));
        let updated = store
            .update_node(node.id, NodePatch::new().with_metadata(metadata))
            .expect("update");

        assert_eq!(updated.embedding, node.embedding);
        assert_eq!(updated.text, "stable");
        assert_eq!(updated.metadata["k"], serde_json::json!("v"));
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let store = make_store();

        let first = store.create_node("a", Metadata::new()).expect("create");
        store.delete_node(first.id).expect("delete");
        let second = store.create_node("b", Metadata::new()).expect("create");

        assert_eq!(second.id, NodeId(2));
    }

    #[test]
    fn test_cascade_removes_exactly_touching_edges() {
        let store = make_store();
        let a = store.create_node("a", Metadata::new()).expect("create").id;
        let b = store.create_node("b", Metadata::new()).expect("create").id;
        let c = store.create_node("c", Metadata::new()).expect("create").id;

        let ab = store.create_edge(a, b, "rel", 1.0).expect("edge").id;
        let bc = store.create_edge(b, c, "rel", 1.0).expect("edge").id;
        let cb = store.create_edge(c, b, "rel", 1.0).expect("edge").id;
        let ca = store.create_edge(c, a, "rel", 1.0).expect("edge").id;

        store.delete_node(b).expect("delete");

        // Edges touching b on either end are gone; the rest survive.
        assert!(store.get_edge(ab).is_err());
        assert!(store.get_edge(bc).is_err());
        assert!(store.get_edge(cb).is_err());
        assert!(store.get_edge(ca).is_ok());

        // Post-delete, no edge references the deleted id.
        assert!(store.edges().iter().all(|edge| !edge.touches(b)));
    }

    #[test]
    fn test_create_edge_invalid_target_mutates_nothing() {
        let store = make_store();
        let a = store.create_node("a", Metadata::new()).expect("create").id;

        let result = store.create_edge(a, NodeId(42), "rel", 1.0);
        assert_eq!(
            result,
            Err(StoreError::InvalidReference {
                source: a,
                target: NodeId(42),
                missing: NodeId(42),
            })
        );
        assert_eq!(store.edge_count(), 0);

        // The failed attempt must not have consumed an edge id.
        let b = store.create_node("b", Metadata::new()).expect("create").id;
        let edge = store.create_edge(a, b, "rel", 1.0).expect("edge");
        assert_eq!(edge.id, EdgeId(1));
    }

    #[test]
    fn test_delete_edge() {
        let store = make_store();
        let a = store.create_node("a", Metadata::new()).expect("create").id;
        let b = store.create_node("b", Metadata::new()).expect("create").id;
        let edge = store.create_edge(a, b, "rel", 1.0).expect("edge");

        store.delete_edge(edge.id).expect("delete");
        assert_eq!(
            store.delete_edge(edge.id),
            Err(StoreError::EdgeNotFound { id: edge.id })
        );
    }

    #[test]
    fn test_observer_fires_per_successful_mutation() {
        let counter = Arc::new(CountingObserver::default());
        let store = EntityStore::with_observer(Arc::new(HashEmbedder::new(DIMS)), counter.clone());

        let a = store.create_node("a", Metadata::new()).expect("create").id;
        let b = store.create_node("b", Metadata::new()).expect("create").id;
        store.create_edge(a, b, "rel", 1.0).expect("edge");
        store.delete_node(a).expect("delete");
        assert_eq!(counter.calls.load(Ordering::SeqCst), 4);

        // Failed mutations stay silent.
        let _ = store.create_edge(b, NodeId(99), "rel", 1.0);
        let _ = store.delete_node(NodeId(99));
        assert_eq!(counter.calls.load(Ordering::SeqCst), 4);

        // Reads stay silent too.
        let _ = store.get_node(b);
        let _ = store.nodes();
        assert_eq!(counter.calls.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let store = make_store();
        let a = store.create_node("a", Metadata::new()).expect("create").id;
        let b = store.create_node("b", Metadata::new()).expect("create").id;
        store.create_edge(a, b, "next", 0.5).expect("edge");
        store.delete_node(b).expect("delete");

        let snapshot = store.snapshot();

        let restored = make_store();
        restored.restore(snapshot).expect("restore");

        assert_eq!(restored.node_count(), 1);
        assert_eq!(restored.edge_count(), 0);
        // Allocation resumes past everything the donor store ever issued.
        let next = restored.create_node("c", Metadata::new()).expect("create");
        assert_eq!(next.id, NodeId(3));
    }

    #[test]
    fn test_restore_rejects_wrong_dimensions() {
        let donor = EntityStore::new(Arc::new(HashEmbedder::new(4)));
        donor.create_node("tiny", Metadata::new()).expect("create");

        let store = make_store();
        let result = store.restore(donor.snapshot());

        assert!(matches!(result, Err(StoreError::DimensionMismatch { .. })));
        assert_eq!(store.node_count(), 0);
    }

    #[test]
    fn test_view_is_consistent() {
        let store = make_store();
        let a = store.create_node("a", Metadata::new()).expect("create").id;
        let b = store.create_node("b", Metadata::new()).expect("create").id;
        store.create_edge(a, b, "rel", 1.0).expect("edge");

        let view = store.view();
        assert_eq!(view.node_count(), 2);
        assert_eq!(view.edge_count(), 1);
        assert!(view.contains_node(a));
        assert_eq!(view.node(b).map(|n| n.text.as_str()), Some("b"));
        assert_eq!(view.nodes().count(), 2);
        assert_eq!(view.edges().count(), 1);
    }

    #[test]
    fn test_concurrent_creators_get_unique_ids() {
        let store = Arc::new(make_store());
        let mut handles = Vec::new();

        for worker in 0..8 {
            let store = Arc::clone(&store);
            handles.push(std::thread::spawn(move || {
                (0..25)
                    .map(|i| {
                        store
                            .create_node(format!("w{worker} n{i}"), Metadata::new())
                            .expect("create")
                            .id
                    })
                    .collect::<Vec<_>>()
            }));
        }

        let mut seen = std::collections::HashSet::new();
        for handle in handles {
            for id in handle.join().expect("thread") {
                assert!(seen.insert(id), "duplicate id {id}");
            }
        }
        assert_eq!(seen.len(), 200);
        assert_eq!(store.node_count(), 200);
    }
}
