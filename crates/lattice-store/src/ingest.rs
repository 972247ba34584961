//! Text ingestion: chunk a document into a chain of linked nodes
//!
//! Splits a document into chunks, creates one node per chunk with provenance
//! metadata, and chains consecutive chunks with `"next"` edges so the graph
//! ranker can walk a document in reading order.

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use lattice_core::{Metadata, NodeId, StoreResult};

use crate::store::EntityStore;

/// Relationship label linking consecutive chunks of one document
pub const CHAIN_EDGE_TYPE: &str = "next";

/// How a document is split into chunks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkStrategy {
    /// Split on blank lines, one chunk per paragraph
    Paragraphs,

    /// Split every `lines_per_chunk` lines
    Lines {
        /// Window size; values below 1 are treated as 1
        lines_per_chunk: usize,
    },
}

impl Default for ChunkStrategy {
    fn default() -> Self {
        Self::Paragraphs
    }
}

/// Split text into non-empty chunks
///
/// Falls back to the whole trimmed text as a single chunk when the strategy
/// produces nothing (e.g. a document with no blank lines worth of structure
/// but some content).
pub fn split_into_chunks(text: &str, strategy: ChunkStrategy) -> Vec<String> {
    let mut chunks: Vec<String> = match strategy {
        ChunkStrategy::Paragraphs => text
            .split("\n\n")
            .map(str::trim)
            .filter(|chunk| !chunk.is_empty())
            .map(str::to_string)
            .collect(),
        ChunkStrategy::Lines { lines_per_chunk } => {
            let window = lines_per_chunk.max(1);
            let lines: Vec<&str> = text.lines().collect();
            lines
                .chunks(window)
                .map(|group| group.join("\n").trim().to_string())
                .filter(|chunk| !chunk.is_empty())
                .collect()
        }
    };

    if chunks.is_empty() && !text.trim().is_empty() {
        chunks.push(text.trim().to_string());
    }

    chunks
}

/// Outcome of ingesting one document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestReport {
    /// Name the chunks were attributed to
    pub file_name: String,

    /// Number of chunks (and nodes) produced
    pub total_chunks: usize,

    /// Created node ids, in chunk order
    pub node_ids: Vec<NodeId>,

    /// Number of chain edges created (`total_chunks - 1` when positive)
    pub edge_count: usize,
}

/// Ingest a document: split, create nodes, chain them with `"next"` edges
///
/// Each chunk becomes a node whose metadata records the file name, the chunk
/// index, and `"source": "ingest"`. Consecutive chunks are linked
/// `chunk[i] -> chunk[i + 1]` with weight 1.0.
pub fn ingest_document(
    store: &EntityStore,
    file_name: &str,
    content: &str,
    strategy: ChunkStrategy,
) -> StoreResult<IngestReport> {
    let chunks = split_into_chunks(content, strategy);

    let mut node_ids = Vec::with_capacity(chunks.len());
    for (index, chunk) in chunks.iter().enumerate() {
        let mut metadata = Metadata::new();
        metadata.insert("file_name".to_string(), json!(file_name));
        metadata.insert("chunk_index".to_string(), json!(index));
        metadata.insert("source".to_string(), json!("ingest"));

        let node = store.create_node(chunk.clone(), metadata)?;
        node_ids.push(node.id);
    }

    let mut edge_count = 0;
    for pair in node_ids.windows(2) {
        store.create_edge(pair[0], pair[1], CHAIN_EDGE_TYPE, 1.0)?;
        edge_count += 1;
    }

    info!(
        file_name,
        chunks = chunks.len(),
        edges = edge_count,
        "ingested document"
    );

    Ok(IngestReport {
        file_name: file_name.to_string(),
        total_chunks: chunks.len(),
        node_ids,
        edge_count,
    })
}
