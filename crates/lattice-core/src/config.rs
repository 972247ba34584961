//! Engine configuration
//!
//! Typed configuration for the retrieval engine: embedding dimensionality and
//! the default search parameters the request layer falls back to when a query
//! omits them. Construction is plain Rust — loading from files or the
//! environment is the embedding application's concern.

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Default embedding dimensionality
pub const DEFAULT_DIMENSIONS: usize = 128;

fn default_dimensions() -> usize {
    DEFAULT_DIMENSIONS
}

fn default_top_k() -> usize {
    5
}

fn default_depth() -> usize {
    2
}

fn default_vector_weight() -> f32 {
    0.7
}

fn default_graph_weight() -> f32 {
    0.3
}

/// Configuration for the retrieval engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Embedding dimensionality every stored vector must match
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,

    /// Result limit used when a search request omits `top_k`
    #[serde(default = "default_top_k")]
    pub default_top_k: usize,

    /// Traversal depth used when a graph-seeded request omits `depth`
    #[serde(default = "default_depth")]
    pub default_depth: usize,

    /// Similarity weight used when a hybrid request omits weights
    #[serde(default = "default_vector_weight")]
    pub default_vector_weight: f32,

    /// Proximity weight used when a hybrid request omits weights
    #[serde(default = "default_graph_weight")]
    pub default_graph_weight: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dimensions: default_dimensions(),
            default_top_k: default_top_k(),
            default_depth: default_depth(),
            default_vector_weight: default_vector_weight(),
            default_graph_weight: default_graph_weight(),
        }
    }
}

impl EngineConfig {
    /// Configuration with the given dimensionality and stock defaults
    pub fn with_dimensions(dimensions: usize) -> Self {
        Self {
            dimensions,
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> StoreResult<()> {
        if self.dimensions == 0 {
            return Err(StoreError::Configuration(
                "embedding dimensionality must be positive".to_string(),
            ));
        }
        if self.default_vector_weight < 0.0 || self.default_graph_weight < 0.0 {
            return Err(StoreError::InvalidWeights {
                vector_weight: self.default_vector_weight,
                graph_weight: self.default_graph_weight,
            });
        }
        Ok(())
    }
}
