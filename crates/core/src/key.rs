//! Deterministic content-key derivation
//!
//! A vector's key is a function of `(file_id, model_suite_hash)` and nothing
//! else. The same pair always derives the same key, so repeated upserts
//! converge to one record, and a different model suite derives a different
//! key, so re-embedding never silently overwrites an older suite's vector.

use crate::types::{FileId, ModelSuiteHash, VectorKey};
use xxhash_rust::xxh3::xxh3_128;

/// Derive the content key for a (file, model-suite) pair.
///
/// The two fields are length-prefixed before hashing so that the pair
/// `("ab", "c")` can never collide with `("a", "bc")`. The 128-bit XXH3
/// digest is rendered as 32 hex characters.
pub fn derive_vector_key(file_id: &FileId, model_suite_hash: &ModelSuiteHash) -> VectorKey {
    let file = file_id.as_str().as_bytes();
    let suite = model_suite_hash.as_str().as_bytes();

    let mut buf = Vec::with_capacity(8 + file.len() + 8 + suite.len());
    buf.extend_from_slice(&(file.len() as u64).to_le_bytes());
    buf.extend_from_slice(file);
    buf.extend_from_slice(&(suite.len() as u64).to_le_bytes());
    buf.extend_from_slice(suite);

    VectorKey::from_raw(format!("{:032x}", xxh3_128(&buf)))
}
