//! Model registry seam
//!
//! The registry is an external collaborator: per backbone it exposes zero or
//! more "head" records, each optionally carrying an embedding sidecar with a
//! list of declared outputs. The resolver reads only this. The trait keeps
//! the real registry (however it is discovered) swappable; tests and small
//! deployments use [`StaticModelRegistry`].

use cadenza_core::BackboneId;
use serde::{Deserialize, Serialize};

/// `output_purpose` value that marks an output as the embedding vector.
pub const EMBEDDINGS_PURPOSE: &str = "embeddings";

/// One declared output of a model head.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSpec {
    /// Output name within the head's graph.
    pub name: String,
    /// What the output carries (e.g. "embeddings", "logits").
    pub output_purpose: Option<String>,
    /// Declared tensor shape; the last dimension of an embeddings-purpose
    /// shape is the embedding dimensionality.
    pub shape: Option<Vec<usize>>,
}

/// Embedding sidecar descriptor attached to a head.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddingSidecar {
    /// Outputs the sidecar declares.
    pub outputs: Vec<OutputSpec>,
}

/// One model head discovered for a backbone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadRecord {
    /// Head identity within the model suite.
    pub head_id: String,
    /// Backbone this head is attached to.
    pub backbone: String,
    /// Optional embedding sidecar descriptor.
    pub embedding_sidecar: Option<EmbeddingSidecar>,
}

/// Read-only view of discovered model metadata.
pub trait ModelRegistry: Send + Sync {
    /// Every head associated with `backbone`; empty when the backbone is
    /// unknown.
    fn heads_for_backbone(&self, backbone: &BackboneId) -> Vec<HeadRecord>;
}

/// In-memory registry over a fixed set of heads.
#[derive(Debug, Clone, Default)]
pub struct StaticModelRegistry {
    heads: Vec<HeadRecord>,
}

impl StaticModelRegistry {
    /// Build a registry from discovered heads.
    pub fn new(heads: Vec<HeadRecord>) -> Self {
        StaticModelRegistry { heads }
    }
}

impl ModelRegistry for StaticModelRegistry {
    fn heads_for_backbone(&self, backbone: &BackboneId) -> Vec<HeadRecord> {
        self.heads
            .iter()
            .filter(|head| head.backbone == backbone.as_str())
            .cloned()
            .collect()
    }
}
