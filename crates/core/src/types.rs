//! Identifier newtypes and the vector record schema
//!
//! All identifiers are thin wrappers over strings. Validation is enforced at
//! the store boundary (see `cadenza-store`), not at construction, so that ids
//! read from external systems can be carried around before they are used.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of an embedding-model family (e.g. "effnet").
///
/// The backbone is the partition key for all hot/cold collections and for the
/// similarity index.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BackboneId(String);

impl BackboneId {
    /// Create a backbone id from a string.
    pub fn new(id: impl Into<String>) -> Self {
        BackboneId(id.into())
    }

    /// Backbone id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BackboneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BackboneId {
    fn from(s: &str) -> Self {
        BackboneId(s.to_string())
    }
}

/// Reference to the audio file that owns a vector (foreign reference only).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(String);

impl FileId {
    /// Create a file id from a string.
    pub fn new(id: impl Into<String>) -> Self {
        FileId(id.into())
    }

    /// File id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FileId {
    fn from(s: &str) -> Self {
        FileId(s.to_string())
    }
}

/// Identifies exactly which embedder+config produced a vector.
///
/// Part of key derivation: re-embedding a file with a different model suite
/// creates a distinct record instead of silently overwriting the old one.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelSuiteHash(String);

impl ModelSuiteHash {
    /// Create a model-suite hash from a string.
    pub fn new(hash: impl Into<String>) -> Self {
        ModelSuiteHash(hash.into())
    }

    /// Suite hash as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelSuiteHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModelSuiteHash {
    fn from(s: &str) -> Self {
        ModelSuiteHash(s.to_string())
    }
}

/// Deterministic content key for one (file, model-suite) pair.
///
/// Derived with [`crate::key::derive_vector_key`]; repeated upserts of the
/// same pair converge to one record. Keys sort lexicographically, which gives
/// all collection iteration a stable order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VectorKey(String);

impl VectorKey {
    /// Construct from an already-derived key string.
    ///
    /// Only `derive_vector_key` should mint new keys; this constructor exists
    /// for deserialization paths.
    pub fn from_raw(key: impl Into<String>) -> Self {
        VectorKey(key.into())
    }

    /// Key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VectorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Similarity metric for vector comparison.
///
/// All scores are normalized to "higher = more similar" regardless of metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DistanceMetric {
    /// Cosine similarity: dot(a,b) / (||a|| * ||b||), range [-1, 1].
    #[default]
    Cosine,
    /// Euclidean similarity: 1 / (1 + l2_distance), range (0, 1].
    Euclidean,
    /// Raw dot product, unbounded. Assumes pre-normalized vectors.
    DotProduct,
}

/// One stored embedding for a (file, model-backbone) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    /// Content key derived from `(file_id, model_suite_hash)`.
    pub key: VectorKey,
    /// Owning audio file (foreign reference only).
    pub file_id: FileId,
    /// Embedder+config identity that produced this vector.
    pub model_suite_hash: ModelSuiteHash,
    /// Declared dimensionality of `vector`.
    pub embed_dim: usize,
    /// The embedding components; length == `embed_dim`.
    pub vector: Vec<f32>,
    /// Count of audio segments pooled into this embedding (provenance).
    pub num_segments: u32,
    /// Microsecond UTC timestamp of the last write.
    ///
    /// Used only to pick the most recent record when transient duplicates
    /// exist for a file, never for correctness.
    pub created_at: i64,
}

/// Per-backbone hot/cold statistics.
///
/// Zero-valued when no collection exists yet; reading stats is never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HotColdStats {
    /// Records currently in the hot collection.
    pub hot_count: usize,
    /// Records currently in the cold collection.
    pub cold_count: usize,
    /// Whether a similarity index exists on the cold collection.
    pub index_exists: bool,
}
