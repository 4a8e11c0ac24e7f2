//! IVF-flat index backend
//!
//! Vectors are partitioned into `nlists` inverted lists by nearest centroid.
//! Centroids come from a few deterministic Lloyd iterations seeded with
//! evenly-spaced entries, so two builds over the same snapshot produce the
//! same cells. Search ranks centroids against the query, probes the nearest
//! lists, and scores only the vectors inside them.
//!
//! Probing breadth is fixed at build time: every list when there are at most
//! `PROBE_EXHAUSTIVE` of them, otherwise at least a quarter of the lists.
//! Small collections are therefore searched exhaustively and only large ones
//! trade recall for speed.

use std::cmp::Ordering;

use cadenza_core::{Error, Result, VectorKey};

use crate::distance::compute_similarity;
use crate::index::backend::{IndexParams, VectorIndexBackend};

/// Lloyd refinement passes over the snapshot during build.
const KMEANS_ITERS: usize = 4;

/// List-count threshold below which every list is probed.
const PROBE_EXHAUSTIVE: usize = 32;

struct Entry {
    key: VectorKey,
    vector: Vec<f32>,
}

/// Inverted-list index over a snapshot of a cold collection.
pub struct IvfFlatBackend {
    params: IndexParams,
    centroids: Vec<Vec<f32>>,
    lists: Vec<Vec<Entry>>,
    nprobe: usize,
    len: usize,
}

impl IvfFlatBackend {
    /// Build the index over (key, vector) entries.
    ///
    /// # Errors
    /// - `DimensionMismatch` if any entry's length differs from
    ///   `params.dimension`
    /// - `Storage` if `params.dimension` or `params.nlists` is zero
    pub fn build(params: IndexParams, mut entries: Vec<(VectorKey, Vec<f32>)>) -> Result<Self> {
        if params.dimension == 0 {
            return Err(Error::Storage(
                "index dimension must be positive".to_string(),
            ));
        }
        if params.nlists == 0 {
            return Err(Error::Storage("index nlists must be positive".to_string()));
        }
        for (_, vector) in &entries {
            if vector.len() != params.dimension {
                return Err(Error::DimensionMismatch {
                    declared: params.dimension,
                    actual: vector.len(),
                });
            }
        }

        // Key order makes seeding (and therefore the whole build)
        // deterministic regardless of how the caller gathered the snapshot.
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        let len = entries.len();
        if len == 0 {
            return Ok(IvfFlatBackend {
                params,
                centroids: Vec::new(),
                lists: Vec::new(),
                nprobe: 0,
                len: 0,
            });
        }

        let effective = (params.nlists as usize).min(len);
        let mut centroids: Vec<Vec<f32>> = (0..effective)
            .map(|i| entries[i * len / effective].1.clone())
            .collect();

        let mut assignment = vec![0usize; len];
        for _ in 0..KMEANS_ITERS {
            for (i, (_, vector)) in entries.iter().enumerate() {
                assignment[i] = nearest_centroid(&centroids, vector, params.metric);
            }

            let mut sums = vec![vec![0.0f32; params.dimension]; effective];
            let mut counts = vec![0usize; effective];
            for (i, (_, vector)) in entries.iter().enumerate() {
                let cell = assignment[i];
                counts[cell] += 1;
                for (s, v) in sums[cell].iter_mut().zip(vector.iter()) {
                    *s += v;
                }
            }
            for cell in 0..effective {
                // An empty cell keeps its previous centroid.
                if counts[cell] > 0 {
                    for s in sums[cell].iter_mut() {
                        *s /= counts[cell] as f32;
                    }
                    centroids[cell] = std::mem::take(&mut sums[cell]);
                }
            }
        }

        let mut lists: Vec<Vec<Entry>> = (0..effective).map(|_| Vec::new()).collect();
        for (i, (key, vector)) in entries.into_iter().enumerate() {
            lists[assignment[i]].push(Entry { key, vector });
        }

        let nprobe = effective.min(PROBE_EXHAUSTIVE).max(effective / 4);

        Ok(IvfFlatBackend {
            params,
            centroids,
            lists,
            nprobe,
            len,
        })
    }

    /// Number of inverted lists actually materialized.
    ///
    /// Lower than `nlists` when the snapshot had fewer vectors than lists.
    pub fn list_count(&self) -> usize {
        self.lists.len()
    }
}

/// Index of the centroid most similar to `vector`; ties break to the lowest
/// cell index.
fn nearest_centroid(
    centroids: &[Vec<f32>],
    vector: &[f32],
    metric: cadenza_core::DistanceMetric,
) -> usize {
    let mut best = 0usize;
    let mut best_score = f32::NEG_INFINITY;
    for (cell, centroid) in centroids.iter().enumerate() {
        let score = compute_similarity(vector, centroid, metric);
        if score > best_score {
            best_score = score;
            best = cell;
        }
    }
    best
}

impl VectorIndexBackend for IvfFlatBackend {
    fn params(&self) -> &IndexParams {
        &self.params
    }

    fn len(&self) -> usize {
        self.len
    }

    fn remove(&mut self, key: &VectorKey) -> bool {
        for list in &mut self.lists {
            if let Some(pos) = list.iter().position(|entry| &entry.key == key) {
                list.remove(pos);
                self.len -= 1;
                return true;
            }
        }
        false
    }

    fn search(&self, query: &[f32], k: usize) -> Vec<(VectorKey, f32)> {
        if k == 0 || self.len == 0 {
            return Vec::new();
        }

        // Validate query dimension (validated at the facade too; a mismatch
        // here returns empty rather than scoring garbage).
        if query.len() != self.params.dimension {
            return Vec::new();
        }

        // Rank cells by centroid similarity, probe the nearest nprobe.
        let mut cells: Vec<(usize, f32)> = self
            .centroids
            .iter()
            .enumerate()
            .map(|(cell, centroid)| {
                (cell, compute_similarity(query, centroid, self.params.metric))
            })
            .collect();
        cells.sort_by(|(cell_a, score_a), (cell_b, score_b)| {
            score_b
                .partial_cmp(score_a)
                .unwrap_or(Ordering::Equal)
                .then_with(|| cell_a.cmp(cell_b))
        });

        let mut results: Vec<(VectorKey, f32)> = cells
            .iter()
            .take(self.nprobe)
            .flat_map(|(cell, _)| self.lists[*cell].iter())
            .map(|entry| {
                let score = compute_similarity(query, &entry.vector, self.params.metric);
                (entry.key.clone(), score)
            })
            .collect();

        // Sort by (score desc, key asc) so identical queries return
        // identical orderings across calls.
        results.sort_by(|(key_a, score_a), (key_b, score_b)| {
            score_b
                .partial_cmp(score_a)
                .unwrap_or(Ordering::Equal)
                .then_with(|| key_a.cmp(key_b))
        });

        results.truncate(k);
        results
    }
}
