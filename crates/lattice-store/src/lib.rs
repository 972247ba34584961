//! In-memory entity store for the Lattice retrieval engine
//!
//! This crate owns all nodes and edges and enforces the referential
//! invariants the rankers rely on:
//!
//! - **EntityStore**: reader-writer-locked node/edge tables with atomic
//!   cascade deletion and per-mutation change notification
//! - **StoreView**: a read-locked consistent snapshot handed to the rankers
//! - **IdAllocator**: monotonic identifiers, independent of deletions
//! - **StoreSnapshot**: the bulk save/load contract for the persistence
//!   collaborator
//! - **ingest**: text chunking that turns a document into a chain of nodes
//!
//! ## Locking Discipline
//!
//! One `RwLock` guards both tables and both id counters. Any number of
//! readers share the lock; every mutation — including the node-deletion
//! cascade — holds the write lock for its entire effect, so a reader never
//! observes a half-deleted edge set or a node vanishing mid-traversal.

pub mod alloc;
pub mod ingest;
pub mod snapshot;
pub mod store;

pub use alloc::IdAllocator;
pub use ingest::{ingest_document, split_into_chunks, ChunkStrategy, IngestReport};
pub use snapshot::{SnapshotCounters, StoreSnapshot};
pub use store::{EntityStore, StoreView};
