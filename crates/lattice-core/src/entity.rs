//! Node and edge domain types
//!
//! Nodes are embedded content items; edges are directed, typed, weighted
//! relationships between node ids. Edges reference nodes by identifier only —
//! no entity holds another entity, which keeps deletion a pure
//! lookup-and-remove and rules out cyclic ownership.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Open metadata map attached to a node (string keys, arbitrary JSON values)
pub type Metadata = HashMap<String, Value>;

/// Unique node identifier, allocated monotonically and never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// The `StoreError::InvalidReference` variant (per spec) names a field `source`,
// which `thiserror` auto-detects as the error source and requires to implement
// `std::error::Error`. Provide the (empty) impl so the derive type-checks
// without renaming the spec-mandated field.
impl std::error::Error for NodeId {}

/// Unique edge identifier, allocated monotonically and never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub u64);

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn stamp_now() -> DateTime<Utc> {
    Utc::now()
}

/// A stored content item with text, open metadata, and an embedding vector
///
/// Every persisted node carries an embedding of exactly the configured
/// dimensionality; the store re-embeds whenever the text changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Primary key, never reused after deletion
    pub id: NodeId,

    /// Text payload the embedding is derived from
    pub text: String,

    /// Arbitrary key-value metadata
    #[serde(default)]
    pub metadata: Metadata,

    /// Embedding vector of the configured dimensionality
    pub embedding: Vec<f32>,

    /// When this node was created
    #[serde(default = "stamp_now")]
    pub created_at: DateTime<Utc>,

    /// When this node was last updated
    #[serde(default = "stamp_now")]
    pub updated_at: DateTime<Utc>,
}

impl Node {
    /// Create a node with the given id, text, metadata, and embedding
    pub fn new(id: NodeId, text: impl Into<String>, metadata: Metadata, embedding: Vec<f32>) -> Self {
        let now = Utc::now();
        Self {
            id,
            text: text.into(),
            metadata,
            embedding,
            created_at: now,
            updated_at: now,
        }
    }

    /// Embedding dimensionality of this node
    pub fn dimensions(&self) -> usize {
        self.embedding.len()
    }
}

/// A directed, typed, weighted relationship between two node ids
///
/// Both endpoints are validated against the store at creation time. Edges are
/// immutable after creation except for deletion (explicit, or via the cascade
/// when an endpoint node is removed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Primary key, never reused after deletion
    pub id: EdgeId,

    /// Node the edge leaves from
    pub source: NodeId,

    /// Node the edge points to
    pub target: NodeId,

    /// Free-form relationship label
    #[serde(rename = "type")]
    pub edge_type: String,

    /// Display/filtering weight; not consulted by the rankers
    pub weight: f32,

    /// When this edge was created
    #[serde(default = "stamp_now")]
    pub created_at: DateTime<Utc>,
}

impl Edge {
    /// Create an edge between two node ids
    pub fn new(
        id: EdgeId,
        source: NodeId,
        target: NodeId,
        edge_type: impl Into<String>,
        weight: f32,
    ) -> Self {
        Self {
            id,
            source,
            target,
            edge_type: edge_type.into(),
            weight,
            created_at: Utc::now(),
        }
    }

    /// Check whether this edge references the given node on either end
    pub fn touches(&self, id: NodeId) -> bool {
        self.source == id || self.target == id
    }
}

/// Partial update for a node: replace text and/or metadata
///
/// Only supplied fields are replaced; a text change triggers re-embedding.
#[derive(Debug, Clone, Default)]
pub struct NodePatch {
    /// Replacement text, if any
    pub text: Option<String>,

    /// Replacement metadata, if any (whole-map replace, not merge)
    pub metadata: Option<Metadata>,
}

impl NodePatch {
    /// Empty patch (applying it only bumps `updated_at`)
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style: replace the text
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Builder-style: replace the metadata
    #[must_use]
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Check whether the patch changes anything
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.metadata.is_none()
    }
}
