//! Cadenza - hot/cold vector lifecycle for a music-library auto-tagger
//!
//! Cadenza manages ML embedding vectors for a personal music library: a
//! write-optimized "hot" store absorbs live ingestion, and a scheduled
//! "promote & rebuild" maintenance run drains hot into a read-optimized,
//! similarity-indexed "cold" store.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use cadenza::{
//!     BackboneId, FileId, ModelSuiteHash, StaticModelRegistry, VectorMaintenanceService,
//!     VectorSearchService, VectorStore,
//! };
//!
//! let store = VectorStore::new();
//! let registry = Arc::new(StaticModelRegistry::new(discovered_heads));
//! let maintenance = VectorMaintenanceService::new(store.clone(), registry);
//! let search = VectorSearchService::new(store.clone());
//!
//! // Ingestion writes land in hot only.
//! store.upsert_hot(&backbone, &file_id, &suite, 200, embedding, segments)?;
//!
//! // A scheduled maintenance run promotes hot into cold and rebuilds the index.
//! maintenance.promote_and_rebuild(&backbone, None)?;
//!
//! // Search reads cold; point lookup falls back to hot.
//! let similar = search.search_similar_tracks(&backbone, &query, 10, 0.5)?;
//! ```
//!
//! # Architecture
//!
//! Ingestion never touches cold; cold is written only by promotion, which is
//! idempotent and convergent so a failed run is always safe to re-run.
//! Internal layers (collections, codec, index backends) are exposed through
//! [`VectorStore`]; most callers want only the two services.

pub use cadenza_core::{
    derive_vector_key, BackboneId, DistanceMetric, Error, FileId, HotColdStats, ModelSuiteHash,
    Result, VectorKey, VectorRecord,
};
pub use cadenza_engine::{
    suggest_nlists, EmbedDimResolver, EmbeddingSidecar, HeadRecord, ModelRegistry, OutputSpec,
    PromotionEngine, PromotionReport, StaticModelRegistry, VectorMaintenanceService,
    VectorSearchService, EMBEDDINGS_PURPOSE,
};
pub use cadenza_store::{MetricsSnapshot, VectorStore};
