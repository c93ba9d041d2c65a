//! # Record Hashes
//!
//! - The record hash is the hex canonical hash of `record` alone.
//! - The signing payload is the canonical hash of the whole signed record
//!   with `signature` set to null, so it also covers `parent_hash` and
//!   `hash`.

use shared_crypto::{structured_hash_hex, structured_hash_of, CryptoError, Hash};
use shared_types::{ChangeRecord, SignedChangeRecord};

/// Hex canonical hash of a change record.
pub fn record_hash(record: &ChangeRecord) -> Result<String, CryptoError> {
    structured_hash_hex(record)
}

/// Digest the signer signs.
pub fn signing_payload(record: &SignedChangeRecord) -> Result<Hash, CryptoError> {
    let unsigned = SignedChangeRecord {
        signature: None,
        ..record.clone()
    };
    structured_hash_of(&unsigned)
}
