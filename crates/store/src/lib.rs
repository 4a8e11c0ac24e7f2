//! Hot/cold vector storage for the Cadenza lifecycle engine
//!
//! This crate provides the data-access layer:
//!
//! - **VectorStore**: per-backbone CRUD over two named collections (hot,
//!   cold) plus cold-only similarity index management
//! - **Collection**: one named container of encoded records
//! - **Record codec**: bincode encoding shared by hot and cold
//! - **VectorIndexBackend**: trait for swappable index implementations
//! - **IvfFlatBackend**: inverted-list index partitioned into `nlists` cells
//! - **StoreMetrics**: atomic write counters for observability
//!
//! ## Design
//!
//! `VectorStore` is a stateless facade: it holds only an `Arc` of the shared
//! store state, so clones are cheap and every clone sees the same
//! collections. Interior maps are `BTreeMap` under `parking_lot::RwLock` so
//! iteration order is deterministic.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod collection;
pub mod codec;
pub mod distance;
pub mod index;
pub mod metrics;
pub mod store;

pub use collection::{cold_collection_name, hot_collection_name, validate_backbone_id, Collection};
pub use codec::{decode_record, encode_record};
pub use distance::compute_similarity;
pub use index::{IndexBackendFactory, IndexParams, IvfFlatBackend, VectorIndexBackend};
pub use metrics::{MetricsSnapshot, StoreMetrics};
pub use store::VectorStore;
