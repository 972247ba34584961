//! Injectable embedding capability
//!
//! The store depends on [`EmbeddingProvider`] for all text-to-vector work, so
//! a real model backend can replace the bundled [`HashEmbedder`] without
//! changing store or ranker code. Providers must be deterministic: the same
//! text always yields the same vector.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

use crate::config::DEFAULT_DIMENSIONS;
use crate::error::{StoreError, StoreResult};

/// Text-to-vector capability injected into the store
///
/// # Contract
///
/// - `embed` returns a vector of exactly `dimensions()` components
/// - identical input text yields identical output across calls and processes
/// - failures surface as [`StoreError::Embedding`], never panics
pub trait EmbeddingProvider: Send + Sync {
    /// Fixed dimensionality of every vector this provider produces
    fn dimensions(&self) -> usize;

    /// Produce the embedding for a piece of text
    fn embed(&self, text: &str) -> StoreResult<Vec<f32>>;
}

/// Blanket implementation so `Arc<dyn EmbeddingProvider>` works everywhere a
/// provider is expected
impl<T: EmbeddingProvider + ?Sized> EmbeddingProvider for Arc<T> {
    fn dimensions(&self) -> usize {
        (**self).dimensions()
    }

    fn embed(&self, text: &str) -> StoreResult<Vec<f32>> {
        (**self).embed(text)
    }
}

/// Deterministic hash-seeded embedding provider
///
/// Seeds a PRNG from a hash of the text and draws `dimensions` floats in
/// `[0, 1)`. Not a semantic model — it exists so the engine is fully
/// exercisable in tests and demos without a model backend, while keeping the
/// provider contract (fixed dimensionality, deterministic output).
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimensions: usize,
}

impl HashEmbedder {
    /// Create a provider producing vectors of the given dimensionality
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    fn seed_for(text: &str) -> u64 {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        hasher.finish()
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSIONS)
    }
}

impl EmbeddingProvider for HashEmbedder {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn embed(&self, text: &str) -> StoreResult<Vec<f32>> {
        if self.dimensions == 0 {
            return Err(StoreError::Embedding(
                "provider configured with zero dimensions".to_string(),
            ));
        }

        let mut rng = StdRng::seed_from_u64(Self::seed_for(text));
        Ok((0..self.dimensions).map(|_| rng.random::<f32>()).collect())
    }
}
