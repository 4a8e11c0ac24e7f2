//! Similarity index backends for cold collections
//!
//! The index is a single mutable resource per backbone's cold collection,
//! created only during promotion and dropped before a re-drain. The backend
//! trait keeps the specific algorithm swappable; the shipped implementation
//! is IVF-flat.

pub mod backend;
pub mod ivf_flat;

pub use backend::{IndexBackendFactory, IndexParams, VectorIndexBackend};
pub use ivf_flat::IvfFlatBackend;
