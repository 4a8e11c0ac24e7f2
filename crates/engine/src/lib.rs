//! Maintenance engine for the Cadenza vector lifecycle
//!
//! This crate orchestrates the layers below it:
//! - ModelRegistry: the model-metadata seam probed for embedding dimensions
//! - EmbedDimResolver: derives a backbone's embedding dimensionality
//! - PromotionEngine: the drain + index-rebuild state machine
//! - VectorMaintenanceService / VectorSearchService: the operations other
//!   services call
//!
//! The engine is the only component that knows about:
//! - Promotion sequencing (drop index, drain, verify, rebuild)
//! - Single-flight enforcement per backbone
//! - Hot-as-fallback read semantics

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod promotion;
pub mod registry;
pub mod resolver;
pub mod service;

pub use promotion::{PromotionEngine, PromotionReport};
pub use registry::{
    EmbeddingSidecar, HeadRecord, ModelRegistry, OutputSpec, StaticModelRegistry,
    EMBEDDINGS_PURPOSE,
};
pub use resolver::EmbedDimResolver;
pub use service::{suggest_nlists, VectorMaintenanceService, VectorSearchService};
