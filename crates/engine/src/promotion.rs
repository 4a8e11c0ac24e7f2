//! Promotion engine: the drain + index-rebuild state machine
//!
//! One promotion run executes seven strictly-sequential steps:
//!
//! 1. **Resolve** the backbone's embedding dimension (fatal on failure;
//!    nothing has been mutated yet)
//! 2. **Snapshot** hot/cold counts and index presence; short-circuit when hot
//!    is empty and an index exists (the steady state between maintenance
//!    windows)
//! 3. **Drop** the stale index if one exists
//! 4. **Drain** hot into cold (convergent upsert by key)
//! 5. **Verify** hot is empty, else fail with `DrainIncomplete`
//! 6. **Rebuild** the index with the computed `nlists`
//! 7. **Complete**, logging final counts
//!
//! No retries live here: each step's failure is surfaced to the caller
//! unchanged, and re-invocation is always safe because drain is convergent
//! and drop-index is a no-op when absent. A failure after step 4 leaves hot
//! empty, cold populated, and no index; the next run's snapshot will not
//! short-circuit and re-attempts from step 3 onward.

use cadenza_core::{BackboneId, Error, Result};
use cadenza_store::VectorStore;
use tracing::{debug, info};

use crate::resolver::EmbedDimResolver;

/// Outcome summary of one promotion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromotionReport {
    /// Backbone that was promoted.
    pub backbone: BackboneId,
    /// Embedding dimension resolved from the model registry.
    pub embed_dim: usize,
    /// Inverted-list count the index was (or would have been) built with.
    pub nlists: u32,
    /// Hot count observed at snapshot time.
    pub hot_before: usize,
    /// Cold count observed at snapshot time.
    pub cold_before: usize,
    /// Records moved by the drain step.
    pub drained: usize,
    /// Cold count after the run.
    pub cold_after: usize,
    /// Whether the index was rebuilt (false only for a short-circuited run).
    pub index_rebuilt: bool,
    /// Whether the run stopped at the snapshot step with nothing to do.
    pub short_circuited: bool,
}

/// Executes promotion runs against a store, one backbone at a time.
///
/// The engine itself is not serialized; the maintenance service holds a
/// per-backbone lease so two runs for the same backbone never overlap.
#[derive(Clone)]
pub struct PromotionEngine {
    store: VectorStore,
    resolver: EmbedDimResolver,
}

impl PromotionEngine {
    /// Create an engine over a store and a resolver.
    pub fn new(store: VectorStore, resolver: EmbedDimResolver) -> Self {
        PromotionEngine { store, resolver }
    }

    /// Run the full promotion state machine for `backbone`.
    ///
    /// Synchronous; returns when the run completes or fails. Every
    /// intermediate failure state is safe to re-run.
    pub fn promote(&self, backbone: &BackboneId, nlists: u32) -> Result<PromotionReport> {
        // Step 1: Resolve.
        let embed_dim = self.resolver.resolve(backbone)?;

        // Step 2: Snapshot.
        let hot_before = self.store.count_hot(backbone);
        let cold_before = self.store.count_cold(backbone);
        let had_index = self.store.has_vector_index(backbone);
        info!(
            backbone = %backbone,
            hot = hot_before,
            cold = cold_before,
            index = had_index,
            "promotion run starting"
        );

        if hot_before == 0 && had_index {
            debug!(backbone = %backbone, "hot empty and index present, nothing to promote");
            return Ok(PromotionReport {
                backbone: backbone.clone(),
                embed_dim,
                nlists,
                hot_before,
                cold_before,
                drained: 0,
                cold_after: cold_before,
                index_rebuilt: false,
                short_circuited: true,
            });
        }

        // Step 3: Drop the stale index. Rebuilding with the old index still
        // standing would serve inconsistent results while new data streams
        // in; promotion trades search availability for strict eventual
        // correctness.
        if had_index {
            self.store.drop_vector_index(backbone);
        }

        // Step 4: Drain. The cold collection is created first so the rebuild
        // in step 6 always has a target even when hot was empty.
        self.store.ensure_cold_collection(backbone)?;
        let drained = self.store.drain_hot_to_cold(backbone)?;
        debug!(backbone = %backbone, drained, "drain finished");

        // Step 5: Verify. A non-empty hot here means ingestion raced the
        // drain (or the drain partially failed); building an index over a
        // still-moving collection is disallowed.
        let remaining = self.store.count_hot(backbone);
        if remaining != 0 {
            return Err(Error::DrainIncomplete {
                backbone: backbone.as_str().to_string(),
                remaining,
            });
        }

        // Step 6: Rebuild.
        self.store.build_vector_index(backbone, embed_dim, nlists)?;

        // Step 7: Complete.
        let cold_after = self.store.count_cold(backbone);
        info!(
            backbone = %backbone,
            cold = cold_after,
            drained,
            nlists,
            "promotion run complete"
        );

        Ok(PromotionReport {
            backbone: backbone.clone(),
            embed_dim,
            nlists,
            hot_before,
            cold_before,
            drained,
            cold_after,
            index_rebuilt: true,
            short_circuited: false,
        })
    }
}
