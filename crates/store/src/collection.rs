//! Collection naming, backbone-id validation, and the collection container
//!
//! A collection is one named container of encoded records. Hot and cold are
//! two disjoint collections per backbone sharing the same record codec; the
//! names are derived here so every caller agrees on them.

use cadenza_core::{Error, Result, VectorKey};
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// Validate a backbone id before it is used as a collection partition key
///
/// # Validation Rules
/// - Cannot be empty
/// - Cannot exceed 256 characters
/// - Cannot contain '/' (used as key separator)
/// - Cannot contain null bytes
/// - Cannot start with '_' (reserved for system use)
pub fn validate_backbone_id(backbone: &str) -> Result<()> {
    if backbone.is_empty() {
        return Err(Error::InvalidBackboneId {
            backbone: backbone.to_string(),
            reason: "backbone id cannot be empty".to_string(),
        });
    }

    if backbone.len() > 256 {
        return Err(Error::InvalidBackboneId {
            backbone: backbone.to_string(),
            reason: "backbone id cannot exceed 256 characters".to_string(),
        });
    }

    // Forbidden characters that could cause key parsing issues
    if backbone.contains('/') {
        return Err(Error::InvalidBackboneId {
            backbone: backbone.to_string(),
            reason: "backbone id cannot contain '/'".to_string(),
        });
    }

    if backbone.contains('\0') {
        return Err(Error::InvalidBackboneId {
            backbone: backbone.to_string(),
            reason: "backbone id cannot contain null bytes".to_string(),
        });
    }

    // Names starting with underscore are reserved for system use
    if backbone.starts_with('_') {
        return Err(Error::InvalidBackboneId {
            backbone: backbone.to_string(),
            reason: "backbone ids starting with '_' are reserved".to_string(),
        });
    }

    Ok(())
}

/// Name of the hot (write-optimized, unindexed) collection for a backbone.
pub fn hot_collection_name(backbone: &str) -> String {
    format!("{backbone}__hot")
}

/// Name of the cold (read-optimized, indexed) collection for a backbone.
pub fn cold_collection_name(backbone: &str) -> String {
    format!("{backbone}__cold")
}

/// One named container of encoded records, keyed by [`VectorKey`].
///
/// Documents are stored as encoded bytes; decoding happens at the store
/// layer. `BTreeMap` keeps iteration in key order so snapshots and scans are
/// deterministic. The lock is per-collection: writers to different
/// collections never contend.
pub struct Collection {
    docs: RwLock<BTreeMap<VectorKey, Vec<u8>>>,
}

impl Collection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Collection {
            docs: RwLock::new(BTreeMap::new()),
        }
    }

    /// Insert or replace the document stored under `key`.
    pub fn upsert(&self, key: VectorKey, bytes: Vec<u8>) {
        self.docs.write().insert(key, bytes);
    }

    /// Fetch the document stored under `key`.
    pub fn get(&self, key: &VectorKey) -> Option<Vec<u8>> {
        self.docs.read().get(key).cloned()
    }

    /// Number of documents currently stored.
    pub fn count(&self) -> usize {
        self.docs.read().len()
    }

    /// Copy out every (key, bytes) pair in key order.
    pub fn snapshot(&self) -> Vec<(VectorKey, Vec<u8>)> {
        self.docs
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Remove `key` only if its stored bytes still equal `expected`.
    ///
    /// Used when clearing hot after a drain: a record overwritten by a
    /// concurrent ingestion write mid-drain no longer matches the drained
    /// bytes and must stay in hot for the next maintenance run.
    pub fn remove_if_unchanged(&self, key: &VectorKey, expected: &[u8]) -> bool {
        let mut docs = self.docs.write();
        match docs.get(key) {
            Some(current) if current.as_slice() == expected => {
                docs.remove(key);
                true
            }
            _ => false,
        }
    }

    /// Remove every document whose bytes match `predicate`, returning the
    /// removed keys in key order.
    ///
    /// The scan and the removal happen under one write lock, so a concurrent
    /// writer cannot slip a matching document between them.
    pub fn remove_matching<F>(&self, predicate: F) -> Vec<VectorKey>
    where
        F: Fn(&[u8]) -> bool,
    {
        let mut docs = self.docs.write();
        let keys: Vec<VectorKey> = docs
            .iter()
            .filter(|(_, bytes)| predicate(bytes))
            .map(|(k, _)| k.clone())
            .collect();
        for key in &keys {
            docs.remove(key);
        }
        keys
    }
}

impl Default for Collection {
    fn default() -> Self {
        Self::new()
    }
}
