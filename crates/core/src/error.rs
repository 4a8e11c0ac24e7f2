//! Error types for the vector lifecycle engine
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait
//! implementations.
//!
//! Not-found conditions (missing collection, missing file vector) are
//! represented as `None`/`0`/empty results, never as errors. Only genuinely
//! exceptional conditions raise: missing metadata, violated post-conditions,
//! and underlying store failures.

use thiserror::Error;

/// Result type alias for vector lifecycle operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the vector lifecycle engine
#[derive(Debug, Error)]
pub enum Error {
    /// No head in the model registry references this backbone
    #[error("backbone not found in model registry: {backbone}")]
    BackboneNotFound {
        /// Backbone that was probed
        backbone: String,
    },

    /// A head exists for the backbone but no output declares an
    /// embeddings-purpose shape
    #[error("embedding dimension undetermined for backbone {backbone}: {reason}")]
    EmbedDimUndetermined {
        /// Backbone that was probed
        backbone: String,
        /// What was missing from the registry metadata
        reason: String,
    },

    /// Post-condition violation: hot was not empty after drain
    #[error("drain incomplete for backbone {backbone}: {remaining} records remain in hot")]
    DrainIncomplete {
        /// Backbone being promoted
        backbone: String,
        /// Records still present in the hot collection
        remaining: usize,
    },

    /// The underlying index build failed
    #[error("index creation failed for backbone {backbone}: {reason}")]
    IndexCreation {
        /// Backbone whose cold collection was being indexed
        backbone: String,
        /// Underlying build failure
        reason: String,
    },

    /// Similarity search requested but no index exists on cold
    #[error("no similarity index exists for backbone {backbone}")]
    IndexUnavailable {
        /// Backbone that was queried
        backbone: String,
    },

    /// Backbone id failed validation
    #[error("invalid backbone id {backbone:?}: {reason}")]
    InvalidBackboneId {
        /// The offending id
        backbone: String,
        /// Why it was rejected
        reason: String,
    },

    /// Vector length does not match its declared dimensionality
    #[error("dimension mismatch: declared {declared}, got {actual}")]
    DimensionMismatch {
        /// Declared embedding dimension
        declared: usize,
        /// Actual component count observed
        actual: usize,
    },

    /// A promotion run is already in flight for this backbone
    #[error("promotion already in flight for backbone {backbone}")]
    PromotionBusy {
        /// Backbone whose lease is held
        backbone: String,
    },

    /// Record encode/decode error
    #[error("codec error: {0}")]
    Codec(String),

    /// Underlying storage error
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<bincode::Error> for Error {
    fn from(e: bincode::Error) -> Self {
        Error::Codec(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_backbone_not_found() {
        let err = Error::BackboneNotFound {
            backbone: "effnet".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("backbone not found"));
        assert!(msg.contains("effnet"));
    }

    #[test]
    fn test_error_display_embed_dim_undetermined() {
        let err = Error::EmbedDimUndetermined {
            backbone: "effnet".to_string(),
            reason: "no embeddings-purpose output declares a shape".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("undetermined"));
        assert!(msg.contains("shape"));
    }

    #[test]
    fn test_error_display_drain_incomplete() {
        let err = Error::DrainIncomplete {
            backbone: "effnet".to_string(),
            remaining: 7,
        };
        let msg = err.to_string();
        assert!(msg.contains("drain incomplete"));
        assert!(msg.contains('7'));
    }

    #[test]
    fn test_error_display_index_unavailable() {
        let err = Error::IndexUnavailable {
            backbone: "musicnn".to_string(),
        };
        assert!(err.to_string().contains("no similarity index"));
    }

    #[test]
    fn test_error_display_dimension_mismatch() {
        let err = Error::DimensionMismatch {
            declared: 200,
            actual: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("200"));
        assert!(msg.contains('3'));
    }

    #[test]
    fn test_error_from_bincode_is_codec() {
        let bincode_err: bincode::Error =
            Box::new(bincode::ErrorKind::Custom("truncated".to_string()));
        let err: Error = bincode_err.into();
        assert!(matches!(err, Error::Codec(_)));
        assert!(err.to_string().contains("truncated"));
    }
}
