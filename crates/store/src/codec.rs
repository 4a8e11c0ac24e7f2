//! Record codec shared by the hot and cold collections
//!
//! Records are stored as bincode-encoded bytes. Hot and cold share this one
//! codec, so a drained document lands in cold byte-identical to its hot form
//! and repeated drains converge.

use cadenza_core::{Result, VectorRecord};

/// Encode a record for storage.
pub fn encode_record(record: &VectorRecord) -> Result<Vec<u8>> {
    Ok(bincode::serialize(record)?)
}

/// Decode a stored record.
///
/// Fails with [`cadenza_core::Error::Codec`] on corrupt bytes; a document
/// that cannot be decoded is genuinely exceptional, not a not-found.
pub fn decode_record(bytes: &[u8]) -> Result<VectorRecord> {
    Ok(bincode::deserialize(bytes)?)
}
