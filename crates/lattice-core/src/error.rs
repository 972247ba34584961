//! Error taxonomy for store and search operations
//!
//! Every fallible operation returns one of these variants as a typed result;
//! nothing in the engine panics on caller error. The only conditions treated
//! as process-halting defects are internal invariant violations, which are
//! `debug_assert!`ed at the point of detection rather than surfaced here.

use thiserror::Error;

use crate::entity::{EdgeId, NodeId};

/// Error type shared across the store and search layers
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// A node id did not resolve
    #[error("node {id} not found")]
    NodeNotFound {
        /// The missing node id
        id: NodeId,
    },

    /// An edge id did not resolve
    #[error("edge {id} not found")]
    EdgeNotFound {
        /// The missing edge id
        id: EdgeId,
    },

    /// Edge creation named an endpoint that does not exist
    #[error("edge {source} -> {target} references missing node {missing}")]
    InvalidReference {
        /// Requested source node
        source: NodeId,
        /// Requested target node
        target: NodeId,
        /// Whichever endpoint failed to resolve
        missing: NodeId,
    },

    /// Fusion weights unusable: negative, or both zero
    #[error("invalid fusion weights: vector={vector_weight}, graph={graph_weight}")]
    InvalidWeights {
        /// Supplied vector weight
        vector_weight: f32,
        /// Supplied graph weight
        graph_weight: f32,
    },

    /// A stored or supplied vector disagrees with the configured dimensionality
    ///
    /// This is a configuration defect, never silently coerced.
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Configured dimensionality
        expected: usize,
        /// Length of the offending vector
        actual: usize,
    },

    /// The embedding provider failed to produce a vector
    #[error("embedding provider error: {0}")]
    Embedding(String),

    /// Engine configuration is unusable
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A snapshot failed validation during restore
    #[error("corrupt snapshot: {0}")]
    CorruptSnapshot(String),
}

/// Result type for store and search operations
pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    /// Create a node-not-found error
    pub fn node_not_found(id: NodeId) -> Self {
        Self::NodeNotFound { id }
    }

    /// Create an edge-not-found error
    pub fn edge_not_found(id: EdgeId) -> Self {
        Self::EdgeNotFound { id }
    }

    /// Create a dimension-mismatch error
    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }

    /// Check if the error is a missing-entity condition
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NodeNotFound { .. } | Self::EdgeNotFound { .. })
    }

    /// Check if the error indicates a configuration defect rather than caller error
    pub fn is_config_defect(&self) -> bool {
        matches!(
            self,
            Self::DimensionMismatch { .. } | Self::CorruptSnapshot(_) | Self::Configuration(_)
        )
    }
}
