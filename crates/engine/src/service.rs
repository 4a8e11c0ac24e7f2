//! External-facing maintenance and search services
//!
//! These are the operations other parts of the tagger call in-process:
//! trigger promotion, report hot/cold statistics, similarity search with a
//! score floor, point lookup with hot-as-fallback, and library-wide vector
//! deletion.
//!
//! ## Single-flight promotion
//!
//! Promotion must never run concurrently with itself for one backbone. The
//! maintenance service enforces that with a per-backbone lease: a second
//! `promote_and_rebuild` for a backbone whose lease is held fails fast with
//! `PromotionBusy` instead of racing the drain.

use std::sync::Arc;

use cadenza_core::{BackboneId, Error, FileId, HotColdStats, Result, VectorRecord};
use cadenza_store::VectorStore;
use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::promotion::{PromotionEngine, PromotionReport};
use crate::registry::ModelRegistry;
use crate::resolver::EmbedDimResolver;

/// Default inverted-list count for a given total vector population:
/// `clamp(round(sqrt(total)), 10, 100)`.
pub fn suggest_nlists(total_vectors: usize) -> u32 {
    let root = (total_vectors as f64).sqrt().round() as u32;
    root.clamp(10, 100)
}

/// Operator-facing maintenance operations.
pub struct VectorMaintenanceService {
    store: VectorStore,
    engine: PromotionEngine,
    leases: DashMap<String, Arc<Mutex<()>>>,
}

impl VectorMaintenanceService {
    /// Create the service over a store and a model registry.
    pub fn new(store: VectorStore, registry: Arc<dyn ModelRegistry>) -> Self {
        let engine = PromotionEngine::new(store.clone(), EmbedDimResolver::new(registry));
        VectorMaintenanceService {
            store,
            engine,
            leases: DashMap::new(),
        }
    }

    /// Run the full promotion state machine for `backbone`.
    ///
    /// When `nlists` is `None` it is computed from the current total vector
    /// population with [`suggest_nlists`]. Synchronous; blocks until the run
    /// completes or fails.
    ///
    /// # Errors
    /// `PromotionBusy` when a run for this backbone is already in flight;
    /// otherwise whatever the state machine surfaces (see
    /// [`PromotionEngine::promote`]).
    pub fn promote_and_rebuild(
        &self,
        backbone: &BackboneId,
        nlists: Option<u32>,
    ) -> Result<PromotionReport> {
        let lease = self
            .leases
            .entry(backbone.as_str().to_string())
            .or_default()
            .value()
            .clone();
        let Some(_guard) = lease.try_lock() else {
            return Err(Error::PromotionBusy {
                backbone: backbone.as_str().to_string(),
            });
        };

        let nlists = nlists.unwrap_or_else(|| {
            let total = self.store.count_hot(backbone) + self.store.count_cold(backbone);
            let suggested = suggest_nlists(total);
            debug!(backbone = %backbone, total, nlists = suggested, "computed nlists");
            suggested
        });

        self.engine.promote(backbone, nlists)
    }

    /// Hot/cold counts and index presence for `backbone`.
    ///
    /// Zero-valued when nothing was ever written for the backbone; reading
    /// stats is never an error.
    pub fn get_hot_cold_stats(&self, backbone: &BackboneId) -> HotColdStats {
        HotColdStats {
            hot_count: self.store.count_hot(backbone),
            cold_count: self.store.count_cold(backbone),
            index_exists: self.store.has_vector_index(backbone),
        }
    }

    /// Remove every vector for `file_id` across all known backbones, hot and
    /// cold, returning the total removed.
    ///
    /// Returns 0 without error for a file that was never embedded under any
    /// backbone.
    pub fn delete_vectors_by_file_id(&self, file_id: &FileId) -> Result<usize> {
        let mut total = 0;
        for backbone in self.store.known_backbones() {
            total += self.store.delete_hot_by_file_id(&backbone, file_id)?;
            total += self.store.delete_cold_by_file_id(&backbone, file_id)?;
        }
        if total > 0 {
            info!(file_id = %file_id, removed = total, "deleted vectors for file");
        }
        Ok(total)
    }
}

/// Read-side similarity search and point lookup.
pub struct VectorSearchService {
    store: VectorStore,
}

impl VectorSearchService {
    /// Create the service over a store.
    pub fn new(store: VectorStore) -> Self {
        VectorSearchService { store }
    }

    /// Tracks most similar to `query`, best first, with scores below
    /// `min_score` filtered out.
    ///
    /// Searches cold only; a track embedded since the last promotion is not
    /// searchable yet.
    ///
    /// # Errors
    /// `IndexUnavailable` when no index exists: the caller is told search
    /// is unavailable rather than handed a misleadingly-empty result.
    pub fn search_similar_tracks(
        &self,
        backbone: &BackboneId,
        query: &[f32],
        limit: usize,
        min_score: f32,
    ) -> Result<Vec<(VectorRecord, f32)>> {
        let mut results = self.store.search_cold(backbone, query, limit)?;
        results.retain(|(_, score)| *score >= min_score);
        Ok(results)
    }

    /// Point lookup with hot-as-fallback.
    ///
    /// Cold is authoritative post-promotion and wins when both tiers hold a
    /// record; hot is consulted on a cold miss so a track embedded since the
    /// last promotion is still retrievable by direct lookup. `None` only when
    /// both tiers miss.
    pub fn get_track_vector(
        &self,
        backbone: &BackboneId,
        file_id: &FileId,
    ) -> Result<Option<VectorRecord>> {
        if let Some(record) = self.store.get_cold(backbone, file_id)? {
            return Ok(Some(record));
        }
        self.store.get_hot(backbone, file_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggest_nlists_clamps_low() {
        assert_eq!(suggest_nlists(0), 10);
        assert_eq!(suggest_nlists(1), 10);
        assert_eq!(suggest_nlists(100), 10);
    }

    #[test]
    fn test_suggest_nlists_tracks_sqrt() {
        assert_eq!(suggest_nlists(400), 20);
        assert_eq!(suggest_nlists(2500), 50);
        // 48.98.. rounds to 49
        assert_eq!(suggest_nlists(2399), 49);
    }

    #[test]
    fn test_suggest_nlists_clamps_high() {
        assert_eq!(suggest_nlists(10_000), 100);
        assert_eq!(suggest_nlists(1_000_000), 100);
    }
}
