//! Retrieval facade over the entity store
//!
//! [`SearchEngine`] is what the request layer talks to. It owns nothing but
//! an `Arc` to the store and the engine configuration; every call acquires
//! one read view, runs the rankers against it, and releases it. The text
//! variants embed the query through the same provider that embedded the
//! stored nodes, so query and corpus always live in the same vector space.

use std::sync::Arc;

use tracing::debug;

use lattice_core::{EngineConfig, NodeId, StoreError, StoreResult};
use lattice_store::EntityStore;

use crate::fusion::{self, FusionWeights, GraphSeed};
use crate::graph;
use crate::similarity;

/// Retrieval entry point combining the three rankers over one store
pub struct SearchEngine {
    store: Arc<EntityStore>,
    config: EngineConfig,
    default_weights: FusionWeights,
}

impl SearchEngine {
    /// Create an engine with stock defaults for the store's dimensionality
    pub fn new(store: Arc<EntityStore>) -> StoreResult<Self> {
        let config = EngineConfig::with_dimensions(store.dimensions());
        Self::with_config(store, config)
    }

    /// Create an engine with explicit configuration
    ///
    /// Fails when the configuration is invalid or its dimensionality
    /// disagrees with the store's.
    pub fn with_config(store: Arc<EntityStore>, config: EngineConfig) -> StoreResult<Self> {
        config.validate()?;
        if config.dimensions != store.dimensions() {
            return Err(StoreError::Configuration(format!(
                "engine configured for {} dimensions but store embeds {}",
                config.dimensions,
                store.dimensions()
            )));
        }

        let default_weights =
            FusionWeights::new(config.default_vector_weight, config.default_graph_weight)?;
        Ok(Self {
            store,
            config,
            default_weights,
        })
    }

    /// The engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The store this engine searches
    pub fn store(&self) -> &Arc<EntityStore> {
        &self.store
    }

    /// Weights used when a hybrid request does not supply its own
    pub fn default_weights(&self) -> FusionWeights {
        self.default_weights
    }

    fn check_query(&self, query: &[f32]) -> StoreResult<()> {
        if query.len() != self.config.dimensions {
            return Err(StoreError::dimension_mismatch(
                self.config.dimensions,
                query.len(),
            ));
        }
        Ok(())
    }

    /// Rank nodes by cosine similarity to a query vector
    pub fn vector_search(&self, query: &[f32], top_k: usize) -> StoreResult<Vec<(NodeId, f32)>> {
        self.check_query(query)?;
        debug!(top_k, "vector search");

        let view = self.store.view();
        similarity::vector_search(&view, query, top_k)
    }

    /// Rank nodes by cosine similarity to embedded query text
    pub fn vector_search_text(&self, text: &str, top_k: usize) -> StoreResult<Vec<(NodeId, f32)>> {
        let query = self.store.embed(text)?;
        self.vector_search(&query, top_k)
    }

    /// All nodes reachable from `start` within `depth` hops, with distances
    pub fn graph_search(&self, start: NodeId, depth: usize) -> StoreResult<Vec<(NodeId, usize)>> {
        debug!(start = %start, depth, "graph search");

        let view = self.store.view();
        graph::graph_search(&view, start, depth)
    }

    /// Rank nodes by the weighted blend of similarity and graph proximity
    ///
    /// Both scans run against a single store view, so repeating the call
    /// without an intervening mutation yields identical ordered output.
    pub fn hybrid_search(
        &self,
        query: &[f32],
        weights: FusionWeights,
        seed: Option<GraphSeed>,
        top_k: usize,
    ) -> StoreResult<Vec<(NodeId, f32)>> {
        self.check_query(query)?;
        debug!(top_k, seeded = seed.is_some(), "hybrid search");

        let view = self.store.view();
        fusion::hybrid_search(&view, query, weights, seed, top_k)
    }

    /// Hybrid search from query text with the configured default weights
    /// and result limit
    pub fn hybrid_search_text(
        &self,
        text: &str,
        seed: Option<GraphSeed>,
    ) -> StoreResult<Vec<(NodeId, f32)>> {
        let query = self.store.embed(text)?;
        self.hybrid_search(
            &query,
            self.default_weights,
            seed,
            self.config.default_top_k,
        )
    }
}
