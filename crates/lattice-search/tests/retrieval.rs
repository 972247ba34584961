//! End-to-end retrieval behavior over a seeded store

use std::sync::Arc;

use lattice_core::{HashEmbedder, Metadata, NodeId, StoreError};
use lattice_search::{FusionWeights, GraphSeed, SearchEngine};
use lattice_store::EntityStore;

const DIMS: usize = 16;

fn make_engine() -> SearchEngine {
    let store = Arc::new(EntityStore::new(Arc::new(HashEmbedder::new(DIMS))));
    SearchEngine::new(store).expect("engine")
}

/// The diamond from the store's documentation: 1->2, 1->3, 2->4, 3->5, 4->5
fn seed_diamond(engine: &SearchEngine) -> Vec<NodeId> {
    let store = engine.store();
    let ids: Vec<NodeId> = (0..5)
        .map(|i| {
            store
                .create_node(format!("node {i}"), Metadata::new())
                .expect("create")
                .id
        })
        .collect();

    for (from, to) in [(0, 1), (0, 2), (1, 3), (2, 4), (3, 4)] {
        store
            .create_edge(ids[from], ids[to], "rel", 1.0)
            .expect("edge");
    }
    ids
}

#[test]
fn vector_search_returns_all_when_store_is_smaller_than_top_k() {
    let engine = make_engine();
    for i in 0..3 {
        engine
            .store()
            .create_node(format!("doc {i}"), Metadata::new())
            .expect("create");
    }

    let results = engine.vector_search_text("doc 0", 10).expect("search");
    assert_eq!(results.len(), 3);

    // Descending by score throughout.
    for pair in results.windows(2) {
        assert!(pair[0].1 >= pair[1].1);
    }
}

#[test]
fn graph_search_walks_the_diamond() {
    let engine = make_engine();
    let ids = seed_diamond(&engine);

    let results = engine.graph_search(ids[0], 2).expect("search");
    assert_eq!(
        results,
        vec![
            (ids[0], 0),
            (ids[1], 1),
            (ids[2], 1),
            (ids[3], 2),
            (ids[4], 2),
        ]
    );

    // Outgoing-only adjacency: from node 2 the edge 1->2 is invisible.
    let results = engine.graph_search(ids[1], 1).expect("search");
    assert_eq!(results, vec![(ids[1], 0), (ids[3], 1)]);
}

#[test]
fn identical_embeddings_score_identically_without_graph_weight() {
    let engine = make_engine();
    let store = engine.store();

    // Same text, same vector — but very different graph positions.
    let twin_a = store
        .create_node("identical text", Metadata::new())
        .expect("create")
        .id;
    let twin_b = store
        .create_node("identical text", Metadata::new())
        .expect("create")
        .id;
    store.create_edge(twin_a, twin_b, "rel", 1.0).expect("edge");

    let query = store.embed("identical text").expect("embed");
    let weights = FusionWeights::new(1.0, 0.0).expect("weights");
    let results = engine
        .hybrid_search(&query, weights, Some(GraphSeed::new(twin_a, 3)), 10)
        .expect("search");

    assert_eq!(results.len(), 2);
    assert!((results[0].1 - results[1].1).abs() < 1e-6);
    // Equal scores break ties by ascending id.
    assert_eq!(results[0].0, twin_a);
    assert_eq!(results[1].0, twin_b);
}

#[test]
fn graph_weight_lifts_neighbors_over_similar_strangers() {
    let engine = make_engine();
    let store = engine.store();

    let seed = store
        .create_node("seed document", Metadata::new())
        .expect("create")
        .id;
    let neighbor = store
        .create_node("linked follow-up", Metadata::new())
        .expect("create")
        .id;
    let stranger = store
        .create_node("unlinked bystander", Metadata::new())
        .expect("create")
        .id;
    store.create_edge(seed, neighbor, "rel", 1.0).expect("edge");

    // Graph-only weights: connectivity alone decides the ranking.
    let query = store.embed("anything at all").expect("embed");
    let weights = FusionWeights::new(0.0, 1.0).expect("weights");
    let results = engine
        .hybrid_search(&query, weights, Some(GraphSeed::new(seed, 2)), 10)
        .expect("search");

    assert_eq!(results[0].0, seed);
    assert_eq!(results[1].0, neighbor);
    assert_eq!(results[2].0, stranger);
    assert_eq!(results[2].1, 0.0);
}

#[test]
fn hybrid_search_is_idempotent_without_mutations() {
    let engine = make_engine();
    let ids = seed_diamond(&engine);

    let query = engine.store().embed("node 3").expect("embed");
    let weights = FusionWeights::new(0.7, 0.3).expect("weights");
    let seed = Some(GraphSeed::new(ids[0], 2));

    let first = engine
        .hybrid_search(&query, weights, seed, 5)
        .expect("search");
    let second = engine
        .hybrid_search(&query, weights, seed, 5)
        .expect("search");

    assert_eq!(first, second);
}

#[test]
fn hybrid_search_propagates_missing_seed() {
    let engine = make_engine();
    seed_diamond(&engine);

    let query = engine.store().embed("whatever").expect("embed");
    let weights = FusionWeights::new(0.5, 0.5).expect("weights");
    let result = engine.hybrid_search(&query, weights, Some(GraphSeed::new(NodeId(404), 2)), 5);

    assert!(matches!(
        result,
        Err(StoreError::NodeNotFound { id: NodeId(404) })
    ));
}

#[test]
fn cascade_deletion_removes_node_from_every_ranking() {
    let engine = make_engine();
    let ids = seed_diamond(&engine);

    engine.store().delete_node(ids[1]).expect("delete");

    let vector = engine.vector_search_text("node 1", 10).expect("search");
    assert!(vector.iter().all(|(id, _)| *id != ids[1]));

    // Cascade removed 1->2 and 2->4 with the node, so node 4 is now
    // unreachable from node 1; the 1->3->5 branch is untouched.
    let graph = engine.graph_search(ids[0], 2).expect("search");
    assert_eq!(graph, vec![(ids[0], 0), (ids[2], 1), (ids[4], 2)]);
}

#[test]
fn restored_snapshot_ranks_identically() {
    let engine = make_engine();
    let ids = seed_diamond(&engine);

    let query = engine.store().embed("node 2").expect("embed");
    let weights = FusionWeights::new(0.6, 0.4).expect("weights");
    let seed = Some(GraphSeed::new(ids[0], 2));
    let before = engine
        .hybrid_search(&query, weights, seed, 5)
        .expect("search");

    let clone = Arc::new(EntityStore::new(Arc::new(HashEmbedder::new(DIMS))));
    clone.restore(engine.store().snapshot()).expect("restore");
    let cloned_engine = SearchEngine::new(clone).expect("engine");

    let after = cloned_engine
        .hybrid_search(&query, weights, seed, 5)
        .expect("search");
    assert_eq!(before, after);
}
