//! Core types for the Cadenza vector lifecycle engine
//!
//! This crate defines the foundational types used throughout the system:
//! - BackboneId / FileId / ModelSuiteHash: identifier newtypes
//! - VectorKey: deterministic content key for a (file, model-suite) pair
//! - VectorRecord: one stored embedding with provenance fields
//! - DistanceMetric: similarity metrics (Cosine, Euclidean, DotProduct)
//! - HotColdStats: per-backbone collection statistics
//! - Error: error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod key;
pub mod types;

pub use error::{Error, Result};
pub use key::derive_vector_key;
pub use types::{
    BackboneId, DistanceMetric, FileId, HotColdStats, ModelSuiteHash, VectorKey, VectorRecord,
};
