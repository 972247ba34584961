//! Build a small store, ingest a document, and run the three search modes.
//!
//! Run with: `cargo run --example hybrid_retrieval`

use std::sync::Arc;

use lattice_core::HashEmbedder;
use lattice_search::{GraphSeed, SearchEngine};
use lattice_store::{ingest_document, ChunkStrategy, EntityStore};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter("debug").init();

    let store = Arc::new(EntityStore::new(Arc::new(HashEmbedder::new(128))));

    let document = "Graphs model relationships between items.\n\n\
                    Embeddings model what items mean.\n\n\
                    Hybrid retrieval blends both signals into one ranking.";
    let report = ingest_document(&store, "intro.txt", document, ChunkStrategy::Paragraphs)?;
    println!(
        "ingested {} chunks, {} chain edges",
        report.total_chunks, report.edge_count
    );

    let engine = SearchEngine::new(store)?;

    println!("\nvector search:");
    for (id, score) in engine.vector_search_text("what do embeddings do?", 3)? {
        println!("  node {id}  score {score:.4}");
    }

    let seed = report.node_ids[0];
    println!("\ngraph search from node {seed}:");
    for (id, distance) in engine.graph_search(seed, 2)? {
        println!("  node {id}  distance {distance}");
    }

    println!("\nhybrid search seeded at node {seed}:");
    for (id, score) in engine.hybrid_search_text("blending signals", Some(GraphSeed::new(seed, 2)))? {
        println!("  node {id}  fused {score:.4}");
    }

    Ok(())
}
