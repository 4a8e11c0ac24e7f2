//! VectorStore: per-backbone hot/cold storage facade
//!
//! ## Design
//!
//! VectorStore is a **stateless facade** over shared store state:
//!
//! - VectorStore holds only `Arc<StoreState>` (no private state)
//! - Clones are cheap and every clone sees the same collections
//! - Interior maps are `BTreeMap` under `RwLock` for deterministic iteration
//!
//! Collections are created lazily: a backbone becomes known the first time a
//! vector is upserted for it, and its hot collection appears at that moment.
//! Ingestion writes only ever touch hot; cold is written exclusively by
//! `drain_hot_to_cold`. The similarity index is a single mutable resource per
//! backbone's cold collection, managed through `has_vector_index` /
//! `drop_vector_index` / `build_vector_index`.
//!
//! ## Thread Safety
//!
//! VectorStore is `Send + Sync`. Hot upserts from concurrent writers hit the
//! per-collection lock; two writers on the same key resolve last-write-wins.
//! Draining concurrently with ingestion is tolerated (see
//! `drain_hot_to_cold`); draining concurrently with itself for one backbone
//! is not, and is serialized by the maintenance service above this layer.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use cadenza_core::{
    derive_vector_key, BackboneId, Error, FileId, ModelSuiteHash, Result, VectorRecord,
};
use chrono::Utc;
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::codec::{decode_record, encode_record};
use crate::collection::{
    cold_collection_name, hot_collection_name, validate_backbone_id, Collection,
};
use crate::index::{IndexBackendFactory, IndexParams, VectorIndexBackend};
use crate::metrics::{MetricsSnapshot, StoreMetrics};

/// Shared state behind every VectorStore clone.
struct StoreState {
    /// Named collections (hot and cold), lazily created.
    collections: RwLock<BTreeMap<String, Arc<Collection>>>,
    /// 0-or-1 similarity index per backbone's cold collection.
    indexes: RwLock<BTreeMap<String, Box<dyn VectorIndexBackend>>>,
    /// Backbones seen by ingestion, in id order.
    backbones: RwLock<BTreeSet<String>>,
    /// Write-path counters.
    metrics: StoreMetrics,
    /// Index algorithm selector.
    factory: IndexBackendFactory,
}

/// Per-backbone CRUD over hot/cold collections plus cold-only index
/// management.
#[derive(Clone)]
pub struct VectorStore {
    state: Arc<StoreState>,
}

impl VectorStore {
    /// Create an empty store.
    pub fn new() -> Self {
        VectorStore {
            state: Arc::new(StoreState {
                collections: RwLock::new(BTreeMap::new()),
                indexes: RwLock::new(BTreeMap::new()),
                backbones: RwLock::new(BTreeSet::new()),
                metrics: StoreMetrics::default(),
                factory: IndexBackendFactory::default(),
            }),
        }
    }

    /// Point-in-time copy of the write counters.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.state.metrics.snapshot()
    }

    /// Every backbone that has ever received an ingestion write, in id order.
    pub fn known_backbones(&self) -> Vec<BackboneId> {
        self.state
            .backbones
            .read()
            .iter()
            .map(|b| BackboneId::new(b.clone()))
            .collect()
    }

    fn collection(&self, name: &str) -> Option<Arc<Collection>> {
        self.state.collections.read().get(name).cloned()
    }

    fn collection_or_create(&self, name: &str) -> Arc<Collection> {
        let mut collections = self.state.collections.write();
        collections
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Collection::new()))
            .clone()
    }

    /// Most recent record for `file_id` in `collection`, by
    /// (created_at, key).
    ///
    /// Multiple records per file exist only transiently (e.g. two model
    /// suites embedded the same file); the timestamp picks the newest, the
    /// key breaks exact ties deterministically.
    fn latest_record_for_file(
        &self,
        collection: &Collection,
        file_id: &FileId,
    ) -> Result<Option<VectorRecord>> {
        let mut latest: Option<VectorRecord> = None;
        for (_, bytes) in collection.snapshot() {
            let record = decode_record(&bytes)?;
            if record.file_id != *file_id {
                continue;
            }
            let newer = match &latest {
                None => true,
                Some(current) => {
                    (record.created_at, &record.key) > (current.created_at, &current.key)
                }
            };
            if newer {
                latest = Some(record);
            }
        }
        Ok(latest)
    }

    // ========================================================================
    // Ingestion (hot only)
    // ========================================================================

    /// Insert or replace the hot record keyed by `(file_id,
    /// model_suite_hash)`.
    ///
    /// Idempotent: calling twice with the same inputs leaves exactly one
    /// record. Lazily registers the backbone and creates the hot collection.
    ///
    /// # Errors
    /// - `InvalidBackboneId` if the backbone id fails validation
    /// - `DimensionMismatch` if `vector.len() != embed_dim` or `embed_dim`
    ///   is zero
    pub fn upsert_hot(
        &self,
        backbone: &BackboneId,
        file_id: &FileId,
        model_suite_hash: &ModelSuiteHash,
        embed_dim: usize,
        vector: Vec<f32>,
        num_segments: u32,
    ) -> Result<()> {
        validate_backbone_id(backbone.as_str())?;
        if embed_dim == 0 || vector.len() != embed_dim {
            return Err(Error::DimensionMismatch {
                declared: embed_dim,
                actual: vector.len(),
            });
        }

        let key = derive_vector_key(file_id, model_suite_hash);
        let record = VectorRecord {
            key: key.clone(),
            file_id: file_id.clone(),
            model_suite_hash: model_suite_hash.clone(),
            embed_dim,
            vector,
            num_segments,
            created_at: Utc::now().timestamp_micros(),
        };
        let bytes = encode_record(&record)?;

        self.state
            .backbones
            .write()
            .insert(backbone.as_str().to_string());
        let hot = self.collection_or_create(&hot_collection_name(backbone.as_str()));
        hot.upsert(key, bytes);
        self.state.metrics.record_hot_upsert();

        debug!(backbone = %backbone, file_id = %file_id, "hot upsert");
        Ok(())
    }

    // ========================================================================
    // Point Lookup
    // ========================================================================

    /// Most recent hot record for `file_id`, or `None`.
    pub fn get_hot(&self, backbone: &BackboneId, file_id: &FileId) -> Result<Option<VectorRecord>> {
        match self.collection(&hot_collection_name(backbone.as_str())) {
            Some(col) => self.latest_record_for_file(&col, file_id),
            None => Ok(None),
        }
    }

    /// Most recent cold record for `file_id`, or `None`.
    pub fn get_cold(
        &self,
        backbone: &BackboneId,
        file_id: &FileId,
    ) -> Result<Option<VectorRecord>> {
        match self.collection(&cold_collection_name(backbone.as_str())) {
            Some(col) => self.latest_record_for_file(&col, file_id),
            None => Ok(None),
        }
    }

    // ========================================================================
    // Counts
    // ========================================================================

    /// Records in the hot collection; 0 if it does not exist yet.
    pub fn count_hot(&self, backbone: &BackboneId) -> usize {
        self.collection(&hot_collection_name(backbone.as_str()))
            .map(|col| col.count())
            .unwrap_or(0)
    }

    /// Records in the cold collection; 0 if it does not exist yet.
    pub fn count_cold(&self, backbone: &BackboneId) -> usize {
        self.collection(&cold_collection_name(backbone.as_str()))
            .map(|col| col.count())
            .unwrap_or(0)
    }

    // ========================================================================
    // Deletion
    // ========================================================================

    /// Remove all hot records for `file_id`; returns the count removed.
    ///
    /// Returns 0 (not an error) when the file was never embedded.
    pub fn delete_hot_by_file_id(&self, backbone: &BackboneId, file_id: &FileId) -> Result<usize> {
        let Some(col) = self.collection(&hot_collection_name(backbone.as_str())) else {
            return Ok(0);
        };
        let removed = col.remove_matching(|bytes| {
            decode_record(bytes)
                .map(|r| r.file_id == *file_id)
                .unwrap_or(false)
        });
        if !removed.is_empty() {
            self.state.metrics.record_hot_deletes(removed.len() as u64);
            debug!(backbone = %backbone, file_id = %file_id, count = removed.len(), "hot delete");
        }
        Ok(removed.len())
    }

    /// Remove all cold records for `file_id`; returns the count removed.
    ///
    /// Also removes the keys from a live index so search never surfaces a
    /// tombstoned record. Returns 0 when the file was never embedded.
    pub fn delete_cold_by_file_id(&self, backbone: &BackboneId, file_id: &FileId) -> Result<usize> {
        let Some(col) = self.collection(&cold_collection_name(backbone.as_str())) else {
            return Ok(0);
        };
        let removed = col.remove_matching(|bytes| {
            decode_record(bytes)
                .map(|r| r.file_id == *file_id)
                .unwrap_or(false)
        });
        if !removed.is_empty() {
            if let Some(index) = self.state.indexes.write().get_mut(backbone.as_str()) {
                for key in &removed {
                    index.remove(key);
                }
            }
            self.state.metrics.record_cold_deletes(removed.len() as u64);
            debug!(backbone = %backbone, file_id = %file_id, count = removed.len(), "cold delete");
        }
        Ok(removed.len())
    }

    // ========================================================================
    // Cold Collection & Index Management
    // ========================================================================

    /// Create the cold collection if missing; idempotent.
    pub fn ensure_cold_collection(&self, backbone: &BackboneId) -> Result<()> {
        validate_backbone_id(backbone.as_str())?;
        self.collection_or_create(&cold_collection_name(backbone.as_str()));
        Ok(())
    }

    /// Whether a similarity index exists on the cold collection.
    pub fn has_vector_index(&self, backbone: &BackboneId) -> bool {
        self.state.indexes.read().contains_key(backbone.as_str())
    }

    /// Remove the similarity index if present; no-op when the collection or
    /// index does not exist.
    pub fn drop_vector_index(&self, backbone: &BackboneId) {
        if self
            .state
            .indexes
            .write()
            .remove(backbone.as_str())
            .is_some()
        {
            self.state.metrics.record_index_drop();
            debug!(backbone = %backbone, "dropped similarity index");
        }
    }

    /// Build the similarity index over the cold collection.
    ///
    /// Replaces any existing index for the backbone. The build reads a
    /// snapshot of cold, so it must only run once cold is complete; the
    /// promotion engine sequences it after a verified drain.
    ///
    /// # Errors
    /// `IndexCreation` when the underlying build fails (stored vector with a
    /// different dimensionality, undecodable document, unusable parameters).
    /// The caller must treat this as fatal to the maintenance run.
    pub fn build_vector_index(
        &self,
        backbone: &BackboneId,
        embed_dim: usize,
        nlists: u32,
    ) -> Result<()> {
        validate_backbone_id(backbone.as_str())?;

        let entries = match self.collection(&cold_collection_name(backbone.as_str())) {
            Some(col) => {
                let mut entries = Vec::with_capacity(col.count());
                for (key, bytes) in col.snapshot() {
                    let record = decode_record(&bytes).map_err(|e| Error::IndexCreation {
                        backbone: backbone.as_str().to_string(),
                        reason: e.to_string(),
                    })?;
                    entries.push((key, record.vector));
                }
                entries
            }
            None => Vec::new(),
        };
        let count = entries.len();

        let params = IndexParams {
            dimension: embed_dim,
            nlists,
            metric: Default::default(),
        };
        let index =
            self.state
                .factory
                .build(params, entries)
                .map_err(|e| Error::IndexCreation {
                    backbone: backbone.as_str().to_string(),
                    reason: e.to_string(),
                })?;

        self.state
            .indexes
            .write()
            .insert(backbone.as_str().to_string(), index);
        self.state.metrics.record_index_build();

        info!(backbone = %backbone, vectors = count, nlists, "built similarity index");
        Ok(())
    }

    // ========================================================================
    // Drain
    // ========================================================================

    /// Move every hot record into cold via upsert-by-key, then clear hot.
    ///
    /// Convergent: an existing cold record with the same key is overwritten,
    /// never duplicated, so running this twice with no new hot writes yields
    /// the same cold state as running it once. Safe to call when hot is empty
    /// or absent (returns 0).
    ///
    /// Concurrent ingestion is tolerated: a hot record overwritten while the
    /// drain is in flight no longer matches the drained bytes and is left in
    /// hot for the next maintenance run, where the verify step will report
    /// it. Cold is never touched destructively.
    pub fn drain_hot_to_cold(&self, backbone: &BackboneId) -> Result<usize> {
        validate_backbone_id(backbone.as_str())?;

        let Some(hot) = self.collection(&hot_collection_name(backbone.as_str())) else {
            return Ok(0);
        };
        let drained = hot.snapshot();
        if drained.is_empty() {
            return Ok(0);
        }

        let cold = self.collection_or_create(&cold_collection_name(backbone.as_str()));
        for (key, bytes) in &drained {
            cold.upsert(key.clone(), bytes.clone());
        }
        self.state.metrics.record_cold_upserts(drained.len() as u64);

        for (key, bytes) in &drained {
            hot.remove_if_unchanged(key, bytes);
        }
        self.state.metrics.record_drain();

        info!(backbone = %backbone, drained = drained.len(), "drained hot to cold");
        Ok(drained.len())
    }

    // ========================================================================
    // Search (cold only)
    // ========================================================================

    /// Similarity search against the cold collection.
    ///
    /// Search never falls back to hot: a record that was only ever upserted
    /// hot and never drained is not searchable.
    ///
    /// # Errors
    /// - `IndexUnavailable` if no index exists for the backbone
    /// - `DimensionMismatch` if the query length differs from the index
    ///   dimension
    pub fn search_cold(
        &self,
        backbone: &BackboneId,
        query: &[f32],
        limit: usize,
    ) -> Result<Vec<(VectorRecord, f32)>> {
        let hits = {
            let indexes = self.state.indexes.read();
            let Some(index) = indexes.get(backbone.as_str()) else {
                return Err(Error::IndexUnavailable {
                    backbone: backbone.as_str().to_string(),
                });
            };
            if query.len() != index.params().dimension {
                return Err(Error::DimensionMismatch {
                    declared: index.params().dimension,
                    actual: query.len(),
                });
            }
            index.search(query, limit)
        };

        let Some(cold) = self.collection(&cold_collection_name(backbone.as_str())) else {
            return Ok(Vec::new());
        };
        let mut results = Vec::with_capacity(hits.len());
        for (key, score) in hits {
            // A key deleted since the index snapshot is skipped, not an error.
            if let Some(bytes) = cold.get(&key) {
                results.push((decode_record(&bytes)?, score));
            }
        }
        Ok(results)
    }
}

impl Default for VectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadenza_core::VectorKey;
    use proptest::prelude::*;

    fn effnet() -> BackboneId {
        BackboneId::new("effnet")
    }

    fn file(n: u32) -> FileId {
        FileId::new(format!("library_files/{n}"))
    }

    fn suite(s: &str) -> ModelSuiteHash {
        ModelSuiteHash::new(s)
    }

    fn upsert(store: &VectorStore, file_id: u32, vector: Vec<f32>) {
        let dim = vector.len();
        store
            .upsert_hot(&effnet(), &file(file_id), &suite("s1"), dim, vector, 4)
            .unwrap();
    }

    /// Key-ordered (key, bytes) dump of a collection, for state comparisons.
    fn dump(store: &VectorStore, name: &str) -> Vec<(VectorKey, Vec<u8>)> {
        store
            .collection(name)
            .map(|col| col.snapshot())
            .unwrap_or_default()
    }

    // ========================================================================
    // Ingestion
    // ========================================================================

    #[test]
    fn test_upsert_hot_creates_collection_lazily() {
        let store = VectorStore::new();
        assert_eq!(store.count_hot(&effnet()), 0);
        assert!(store.known_backbones().is_empty());

        upsert(&store, 42, vec![0.4, 0.5, 0.6]);

        assert_eq!(store.count_hot(&effnet()), 1);
        assert_eq!(store.known_backbones(), vec![effnet()]);
    }

    #[test]
    fn test_upsert_hot_same_pair_converges() {
        let store = VectorStore::new();
        upsert(&store, 42, vec![0.1, 0.1, 0.1]);
        upsert(&store, 42, vec![0.9, 0.9, 0.9]);

        assert_eq!(store.count_hot(&effnet()), 1);
        let record = store.get_hot(&effnet(), &file(42)).unwrap().unwrap();
        assert_eq!(record.vector, vec![0.9, 0.9, 0.9]);
    }

    #[test]
    fn test_upsert_hot_distinct_suites_distinct_records() {
        let store = VectorStore::new();
        store
            .upsert_hot(&effnet(), &file(1), &suite("s1"), 2, vec![1.0, 0.0], 1)
            .unwrap();
        store
            .upsert_hot(&effnet(), &file(1), &suite("s2"), 2, vec![0.0, 1.0], 1)
            .unwrap();
        assert_eq!(store.count_hot(&effnet()), 2);
    }

    #[test]
    fn test_upsert_hot_dimension_mismatch() {
        let store = VectorStore::new();
        let result = store.upsert_hot(&effnet(), &file(1), &suite("s1"), 4, vec![1.0, 2.0], 1);
        assert!(matches!(
            result,
            Err(Error::DimensionMismatch {
                declared: 4,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_upsert_hot_invalid_backbone() {
        let store = VectorStore::new();
        let result = store.upsert_hot(
            &BackboneId::new("_reserved"),
            &file(1),
            &suite("s1"),
            1,
            vec![1.0],
            1,
        );
        assert!(matches!(result, Err(Error::InvalidBackboneId { .. })));
    }

    #[test]
    fn test_upsert_never_touches_cold() {
        let store = VectorStore::new();
        upsert(&store, 1, vec![1.0, 0.0]);
        assert_eq!(store.count_cold(&effnet()), 0);
    }

    // ========================================================================
    // Point Lookup
    // ========================================================================

    #[test]
    fn test_get_hot_missing_collection_is_none() {
        let store = VectorStore::new();
        assert!(store.get_hot(&effnet(), &file(1)).unwrap().is_none());
        assert!(store.get_cold(&effnet(), &file(1)).unwrap().is_none());
    }

    #[test]
    fn test_get_hot_picks_latest_created_at() {
        let store = VectorStore::new();
        // Hand-place two records for one file with explicit timestamps.
        let hot = store.collection_or_create(&hot_collection_name("effnet"));
        for (suite_id, created_at, component) in
            [("s1", 100i64, 0.1f32), ("s2", 200, 0.2), ("s3", 150, 0.3)]
        {
            let record = VectorRecord {
                key: derive_vector_key(&file(7), &suite(suite_id)),
                file_id: file(7),
                model_suite_hash: suite(suite_id),
                embed_dim: 1,
                vector: vec![component],
                num_segments: 1,
                created_at,
            };
            hot.upsert(record.key.clone(), encode_record(&record).unwrap());
        }

        let latest = store.get_hot(&effnet(), &file(7)).unwrap().unwrap();
        assert_eq!(latest.created_at, 200);
        assert_eq!(latest.vector, vec![0.2]);
    }

    // ========================================================================
    // Deletion
    // ========================================================================

    #[test]
    fn test_delete_never_embedded_returns_zero() {
        let store = VectorStore::new();
        assert_eq!(store.delete_hot_by_file_id(&effnet(), &file(9)).unwrap(), 0);
        assert_eq!(
            store.delete_cold_by_file_id(&effnet(), &file(9)).unwrap(),
            0
        );
    }

    #[test]
    fn test_delete_hot_removes_all_suites() {
        let store = VectorStore::new();
        store
            .upsert_hot(&effnet(), &file(1), &suite("s1"), 1, vec![1.0], 1)
            .unwrap();
        store
            .upsert_hot(&effnet(), &file(1), &suite("s2"), 1, vec![2.0], 1)
            .unwrap();
        store
            .upsert_hot(&effnet(), &file(2), &suite("s1"), 1, vec![3.0], 1)
            .unwrap();

        assert_eq!(store.delete_hot_by_file_id(&effnet(), &file(1)).unwrap(), 2);
        assert_eq!(store.count_hot(&effnet()), 1);
    }

    #[test]
    fn test_delete_cold_hides_record_from_search() {
        let store = VectorStore::new();
        upsert(&store, 1, vec![1.0, 0.0]);
        upsert(&store, 2, vec![0.9, 0.1]);
        store.drain_hot_to_cold(&effnet()).unwrap();
        store.build_vector_index(&effnet(), 2, 10).unwrap();

        assert_eq!(store.delete_cold_by_file_id(&effnet(), &file(1)).unwrap(), 1);

        let results = store.search_cold(&effnet(), &[1.0, 0.0], 5).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0.file_id, file(2));
    }

    // ========================================================================
    // Drain
    // ========================================================================

    #[test]
    fn test_drain_empty_or_missing_hot_is_zero() {
        let store = VectorStore::new();
        assert_eq!(store.drain_hot_to_cold(&effnet()).unwrap(), 0);

        upsert(&store, 1, vec![1.0]);
        store.delete_hot_by_file_id(&effnet(), &file(1)).unwrap();
        assert_eq!(store.drain_hot_to_cold(&effnet()).unwrap(), 0);
    }

    #[test]
    fn test_drain_moves_everything() {
        let store = VectorStore::new();
        for i in 0..5 {
            upsert(&store, i, vec![i as f32, 1.0]);
        }

        assert_eq!(store.drain_hot_to_cold(&effnet()).unwrap(), 5);
        assert_eq!(store.count_hot(&effnet()), 0);
        assert_eq!(store.count_cold(&effnet()), 5);
    }

    #[test]
    fn test_drain_is_convergent() {
        let store = VectorStore::new();
        for i in 0..4 {
            upsert(&store, i, vec![i as f32]);
        }

        store.drain_hot_to_cold(&effnet()).unwrap();
        let first = dump(&store, &cold_collection_name("effnet"));

        assert_eq!(store.drain_hot_to_cold(&effnet()).unwrap(), 0);
        let second = dump(&store, &cold_collection_name("effnet"));

        assert_eq!(first, second);
        assert_eq!(store.count_cold(&effnet()), 4);
    }

    #[test]
    fn test_drain_overwrites_cold_by_key() {
        let store = VectorStore::new();
        upsert(&store, 1, vec![0.1]);
        store.drain_hot_to_cold(&effnet()).unwrap();

        // Re-embed the same pair, then promote again: cold ends with exactly
        // one record carrying the newest vector.
        upsert(&store, 1, vec![0.9]);
        store.drain_hot_to_cold(&effnet()).unwrap();

        assert_eq!(store.count_cold(&effnet()), 1);
        let record = store.get_cold(&effnet(), &file(1)).unwrap().unwrap();
        assert_eq!(record.vector, vec![0.9]);
    }

    // ========================================================================
    // Index & Search
    // ========================================================================

    #[test]
    fn test_ensure_cold_collection_is_idempotent() {
        let store = VectorStore::new();
        store.ensure_cold_collection(&effnet()).unwrap();
        store.ensure_cold_collection(&effnet()).unwrap();
        assert_eq!(store.count_cold(&effnet()), 0);
        // Ensuring a collection does not make the backbone "known";
        // only ingestion does.
        assert!(store.known_backbones().is_empty());
    }

    #[test]
    fn test_search_without_index_is_unavailable() {
        let store = VectorStore::new();
        let result = store.search_cold(&effnet(), &[1.0], 5);
        assert!(matches!(result, Err(Error::IndexUnavailable { .. })));
    }

    #[test]
    fn test_index_lifecycle() {
        let store = VectorStore::new();
        assert!(!store.has_vector_index(&effnet()));

        // Dropping a missing index is a no-op, not an error.
        store.drop_vector_index(&effnet());

        upsert(&store, 1, vec![1.0, 0.0]);
        store.drain_hot_to_cold(&effnet()).unwrap();
        store.build_vector_index(&effnet(), 2, 10).unwrap();
        assert!(store.has_vector_index(&effnet()));

        store.drop_vector_index(&effnet());
        assert!(!store.has_vector_index(&effnet()));
    }

    #[test]
    fn test_build_index_mixed_dimensions_fails() {
        let store = VectorStore::new();
        store
            .upsert_hot(&effnet(), &file(1), &suite("s1"), 2, vec![1.0, 0.0], 1)
            .unwrap();
        store
            .upsert_hot(&effnet(), &file(2), &suite("s1"), 3, vec![1.0, 0.0, 0.0], 1)
            .unwrap();
        store.drain_hot_to_cold(&effnet()).unwrap();

        let result = store.build_vector_index(&effnet(), 2, 10);
        assert!(matches!(result, Err(Error::IndexCreation { .. })));
        assert!(!store.has_vector_index(&effnet()));
    }

    #[test]
    fn test_search_query_dimension_checked() {
        let store = VectorStore::new();
        upsert(&store, 1, vec![1.0, 0.0]);
        store.drain_hot_to_cold(&effnet()).unwrap();
        store.build_vector_index(&effnet(), 2, 10).unwrap();

        let result = store.search_cold(&effnet(), &[1.0, 0.0, 0.0], 5);
        assert!(matches!(result, Err(Error::DimensionMismatch { .. })));
    }

    #[test]
    fn test_search_never_sees_undrained_hot_records() {
        let store = VectorStore::new();
        upsert(&store, 1, vec![0.1, 0.9, 0.2]);
        store.drain_hot_to_cold(&effnet()).unwrap();
        store.build_vector_index(&effnet(), 3, 10).unwrap();

        // Lands in hot only; closer to the query than anything in cold.
        upsert(&store, 2, vec![0.9, 0.1, 0.0]);

        let results = store.search_cold(&effnet(), &[0.9, 0.1, 0.0], 5).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0.file_id, file(1));
    }

    #[test]
    fn test_metrics_track_write_paths() {
        let store = VectorStore::new();
        upsert(&store, 1, vec![1.0]);
        store.drain_hot_to_cold(&effnet()).unwrap();
        store.build_vector_index(&effnet(), 1, 10).unwrap();

        let snap = store.metrics();
        assert_eq!(snap.hot_upserts, 1);
        assert_eq!(snap.cold_upserts, 1);
        assert_eq!(snap.drains, 1);
        assert_eq!(snap.index_builds, 1);
    }

    // ========================================================================
    // Convergence Property
    // ========================================================================

    proptest! {
        /// Draining N times with no intervening hot writes produces the same
        /// cold contents as draining once: no duplicate keys, no count drift.
        #[test]
        fn prop_repeated_drain_converges(
            files in prop::collection::vec((0u32..24, prop::collection::vec(-1.0f32..1.0, 3)), 1..40),
            extra_drains in 1usize..4,
        ) {
            let store = VectorStore::new();
            for (file_id, vector) in &files {
                upsert(&store, *file_id, vector.clone());
            }

            store.drain_hot_to_cold(&effnet()).unwrap();
            let baseline = dump(&store, &cold_collection_name("effnet"));

            for _ in 0..extra_drains {
                prop_assert_eq!(store.drain_hot_to_cold(&effnet()).unwrap(), 0);
            }

            let after = dump(&store, &cold_collection_name("effnet"));
            prop_assert_eq!(baseline, after);
            prop_assert_eq!(store.count_hot(&effnet()), 0);
        }
    }
}
