//! Blackbox lifecycle tests against the public facade
//!
//! Drives the crate the way the tagger's services would: batches of
//! ingestion, scheduled promotions in between, searches and deletions
//! against the result.

use std::sync::Arc;

use cadenza::{
    BackboneId, EmbeddingSidecar, FileId, HeadRecord, ModelSuiteHash, OutputSpec,
    StaticModelRegistry, VectorMaintenanceService, VectorSearchService, VectorStore,
    EMBEDDINGS_PURPOSE,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const DIM: usize = 8;

fn setup() -> (VectorStore, VectorMaintenanceService, VectorSearchService) {
    let store = VectorStore::new();
    let registry = Arc::new(StaticModelRegistry::new(vec![HeadRecord {
        head_id: "effnet-mood-head".to_string(),
        backbone: "effnet".to_string(),
        embedding_sidecar: Some(EmbeddingSidecar {
            outputs: vec![OutputSpec {
                name: "embeddings".to_string(),
                output_purpose: Some(EMBEDDINGS_PURPOSE.to_string()),
                shape: Some(vec![1, DIM]),
            }],
        }),
    }]));
    let maintenance = VectorMaintenanceService::new(store.clone(), registry);
    let search = VectorSearchService::new(store.clone());
    (store, maintenance, search)
}

fn effnet() -> BackboneId {
    BackboneId::new("effnet")
}

fn random_vector(rng: &mut StdRng) -> Vec<f32> {
    (0..DIM).map(|_| rng.gen_range(-1.0..1.0)).collect()
}

fn ingest(store: &VectorStore, track: usize, vector: Vec<f32>) {
    store
        .upsert_hot(
            &effnet(),
            &FileId::new(format!("library_files/{track}")),
            &ModelSuiteHash::new("suite-v1"),
            DIM,
            vector,
            4,
        )
        .unwrap();
}

#[test]
fn test_ingest_promote_search_cycle() {
    let (store, maintenance, search) = setup();
    let mut rng = StdRng::seed_from_u64(7);

    let vectors: Vec<Vec<f32>> = (0..30).map(|_| random_vector(&mut rng)).collect();
    for (track, vector) in vectors.iter().enumerate() {
        ingest(&store, track, vector.clone());
    }

    let report = maintenance.promote_and_rebuild(&effnet(), None).unwrap();
    assert_eq!(report.drained, 30);
    assert_eq!(report.cold_after, 30);

    // Querying with a stored vector must return that track first with a
    // near-perfect cosine score.
    let results = search
        .search_similar_tracks(&effnet(), &vectors[12], 5, 0.0)
        .unwrap();
    assert!(!results.is_empty());
    assert_eq!(results[0].0.file_id, FileId::new("library_files/12"));
    assert!(results[0].1 > 0.999);
}

#[test]
fn test_multiple_maintenance_cycles_accumulate_in_cold() {
    let (store, maintenance, search) = setup();
    let mut rng = StdRng::seed_from_u64(11);

    for batch in 0..3 {
        for track in (batch * 10)..(batch * 10 + 10) {
            ingest(&store, track, random_vector(&mut rng));
        }
        maintenance.promote_and_rebuild(&effnet(), None).unwrap();
    }

    let stats = maintenance.get_hot_cold_stats(&effnet());
    assert_eq!(stats.hot_count, 0);
    assert_eq!(stats.cold_count, 30);
    assert!(stats.index_exists);

    // Every track stays reachable by point lookup across cycles.
    for track in 0..30 {
        assert!(search
            .get_track_vector(&effnet(), &FileId::new(format!("library_files/{track}")))
            .unwrap()
            .is_some());
    }
}

#[test]
fn test_library_removal_clears_both_tiers() {
    let (store, maintenance, search) = setup();
    let mut rng = StdRng::seed_from_u64(13);

    ingest(&store, 1, random_vector(&mut rng));
    maintenance.promote_and_rebuild(&effnet(), None).unwrap();
    ingest(&store, 1, random_vector(&mut rng)); // re-embedded since promotion

    let removed = maintenance
        .delete_vectors_by_file_id(&FileId::new("library_files/1"))
        .unwrap();
    assert_eq!(removed, 2);

    assert!(search
        .get_track_vector(&effnet(), &FileId::new("library_files/1"))
        .unwrap()
        .is_none());
}
