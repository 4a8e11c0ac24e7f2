//! Vector index backend trait
//!
//! Defines the interface for swappable index implementations.
//! IvfFlatBackend (inverted-list probe search) is the shipped backend.
//!
//! IMPORTANT: this trait is built from an immutable snapshot of the cold
//! collection and never receives incremental inserts. Promotion drops the
//! index and rebuilds it from scratch; the only post-build mutation is
//! `remove`, which keeps the index honest when a file is deleted from the
//! library between maintenance runs. Do NOT add insert-style methods that
//! assume one backend's internals.

use cadenza_core::{DistanceMetric, Result, VectorKey};

/// Build parameters for a cold collection's similarity index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexParams {
    /// Embedding dimensionality; every indexed vector must have this length.
    pub dimension: usize,
    /// Number of inverted lists (memory/accuracy tradeoff).
    pub nlists: u32,
    /// Similarity metric used for both cell assignment and scoring.
    pub metric: DistanceMetric,
}

/// Trait for swappable vector index implementations
pub trait VectorIndexBackend: Send + Sync {
    /// Parameters the index was built with.
    fn params(&self) -> &IndexParams;

    /// Number of vectors currently indexed.
    fn len(&self) -> usize;

    /// Check if empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove a key from the index.
    ///
    /// Returns true if the key was indexed. Called by the cold delete path so
    /// search never surfaces a tombstoned record.
    fn remove(&mut self, key: &VectorKey) -> bool;

    /// Search for the k most similar vectors.
    ///
    /// Returns (key, score) pairs. Scores are normalized to "higher = more
    /// similar". Results are sorted by (score desc, key asc) so identical
    /// queries return identical orderings across calls.
    fn search(&self, query: &[f32], k: usize) -> Vec<(VectorKey, f32)>;
}

/// Factory for creating index backends
///
/// This abstraction allows switching the index algorithm without changing
/// the VectorStore code.
#[derive(Debug, Clone, Default)]
pub enum IndexBackendFactory {
    /// IVF-flat inverted-list search
    #[default]
    IvfFlat,
    // Hnsw(HnswParams),  // Reserved for future use
}

impl IndexBackendFactory {
    /// Build a backend over a snapshot of (key, vector) entries.
    ///
    /// # Errors
    /// Fails if any entry's length differs from `params.dimension` or if
    /// `params` are themselves unusable (zero dimension, zero nlists).
    pub fn build(
        &self,
        params: IndexParams,
        entries: Vec<(VectorKey, Vec<f32>)>,
    ) -> Result<Box<dyn VectorIndexBackend>> {
        match self {
            IndexBackendFactory::IvfFlat => Ok(Box::new(
                super::ivf_flat::IvfFlatBackend::build(params, entries)?,
            )),
        }
    }
}
