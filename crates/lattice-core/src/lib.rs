//! Core domain types and capability traits for the Lattice retrieval engine
//!
//! This crate defines the vocabulary shared by the storage and search layers:
//!
//! - [`Node`] / [`Edge`] — embedded content items and the directed, typed,
//!   weighted relationships between them
//! - [`StoreError`] / [`StoreResult`] — the error taxonomy every operation
//!   returns through
//! - [`EngineConfig`] — embedding dimensionality and default search parameters
//! - [`EmbeddingProvider`] — the injectable text-to-vector capability
//! - [`ChangeObserver`] — the persistence collaborator's observation point
//!
//! ## Dependency Inversion
//!
//! Core defines the traits; implementations live elsewhere. The store depends
//! on an [`EmbeddingProvider`] rather than any concrete model, so a real
//! embedding backend can replace the deterministic [`HashEmbedder`] without
//! touching store logic. Likewise the store notifies a [`ChangeObserver`]
//! after each mutation without knowing anything about snapshot files.

pub mod config;
pub mod embedding;
pub mod entity;
pub mod error;
pub mod observer;

pub use config::EngineConfig;
pub use embedding::{EmbeddingProvider, HashEmbedder};
pub use entity::{Edge, EdgeId, Metadata, Node, NodeId, NodePatch};
pub use error::{StoreError, StoreResult};
pub use observer::{ChangeObserver, NoopObserver};
