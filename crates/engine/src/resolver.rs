//! Embedding-dimension resolution
//!
//! Derives a backbone's embedding dimensionality from model-registry
//! metadata. A pure read of static metadata; it runs only during maintenance,
//! never on the ingestion hot path, so there is no caching here beyond what
//! the registry itself provides.

use std::sync::Arc;

use cadenza_core::{BackboneId, Error, Result};
use tracing::debug;

use crate::registry::{ModelRegistry, EMBEDDINGS_PURPOSE};

/// Resolves embedding dimensionality per backbone.
#[derive(Clone)]
pub struct EmbedDimResolver {
    registry: Arc<dyn ModelRegistry>,
}

impl EmbedDimResolver {
    /// Create a resolver over a model registry.
    pub fn new(registry: Arc<dyn ModelRegistry>) -> Self {
        EmbedDimResolver { registry }
    }

    /// Embedding dimensionality for `backbone`.
    ///
    /// Scans every head associated with the backbone for an
    /// embeddings-purpose output that declares a shape and returns that
    /// shape's last dimension.
    ///
    /// # Errors
    /// - `BackboneNotFound` if no head references the backbone
    /// - `EmbedDimUndetermined` if heads exist but none declares a usable
    ///   embeddings-purpose shape
    pub fn resolve(&self, backbone: &BackboneId) -> Result<usize> {
        let heads = self.registry.heads_for_backbone(backbone);
        if heads.is_empty() {
            return Err(Error::BackboneNotFound {
                backbone: backbone.as_str().to_string(),
            });
        }

        for head in &heads {
            let Some(sidecar) = &head.embedding_sidecar else {
                continue;
            };
            for output in &sidecar.outputs {
                if output.output_purpose.as_deref() != Some(EMBEDDINGS_PURPOSE) {
                    continue;
                }
                if let Some(&dim) = output.shape.as_ref().and_then(|shape| shape.last()) {
                    if dim > 0 {
                        debug!(backbone = %backbone, head = %head.head_id, dim, "resolved embed dim");
                        return Ok(dim);
                    }
                }
            }
        }

        Err(Error::EmbedDimUndetermined {
            backbone: backbone.as_str().to_string(),
            reason: "no embeddings-purpose output declares a shape".to_string(),
        })
    }
}
