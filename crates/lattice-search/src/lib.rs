//! Ranking and retrieval for the Lattice engine
//!
//! Three rankers over a consistent [`StoreView`](lattice_store::StoreView):
//!
//! - **similarity** — cosine similarity of stored embeddings against a query
//!   vector, full scan, deterministic ordering
//! - **graph** — breadth-first hop distances over directed outgoing edges,
//!   converted to a proximity score
//! - **fusion** — the weighted blend of the two into a single ranked list
//!
//! [`SearchEngine`] wraps an `Arc<EntityStore>` and exposes the same three
//! operations to the request layer, acquiring one view per call so a hybrid
//! search's similarity scan and graph traversal observe the same store state.
//!
//! Rankers hold no state between calls and never mutate the store.

pub mod engine;
pub mod fusion;
pub mod graph;
pub mod similarity;

pub use engine::SearchEngine;
pub use fusion::{hybrid_search, FusionWeights, GraphSeed};
pub use graph::{graph_search, proximity};
pub use similarity::{cosine_similarity, vector_search};
