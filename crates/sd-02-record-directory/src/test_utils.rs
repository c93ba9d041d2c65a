//! Test utilities for the record directory.
//!
//! Signed-record builders backed by a throwaway CA, and in-memory
//! directories whose log can be written behind the directory's back.
//! Enable with the `test-utils` feature flag.

#![allow(clippy::expect_used)]

use crate::domain::RecordSigner;
use crate::service::{RecordDirectory, SIGNED_CHANGE_RECORD_ENTRY};
use chrono::{DateTime, TimeZone, Utc};
use sd_01_chunk_store::{ChunkStoreConfig, DataEntry, DataStore, InMemoryDataStore};
use serde_json::json;
use shared_types::{
    ChangeRecord, OperatorCertificate, SignedChangeRecord, KEY_USAGE_SIGNING, SECTION_CERTIFICATES,
    SECTION_CHANNELS,
};

pub use shared_crypto::test_pki::{TestOperator, TestPki};

/// Signer using `operator`'s key and certificate.
pub fn signer(operator: &TestOperator) -> RecordSigner {
    RecordSigner::new(operator.key_pair(), operator.certificate_pem.clone())
}

/// 2021-06-01 at `hour`:00 UTC.
pub fn fixed_time(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2021, 6, 1, hour, 0, 0)
        .single()
        .expect("valid hour")
}

/// `channels` record publishing one endpoint.
pub fn channels_record(name: &str, endpoint: &str) -> ChangeRecord {
    ChangeRecord::new(name, SECTION_CHANNELS, json!({ "endpoint": endpoint }))
}

pub fn channels_record_at(name: &str, endpoint: &str, created_at: DateTime<Utc>) -> ChangeRecord {
    ChangeRecord::at(
        name,
        SECTION_CHANNELS,
        json!({ "endpoint": endpoint }),
        created_at,
    )
}

/// `certificates` record pinning `fingerprint` as `name`'s signing certificate.
pub fn certificates_record(name: &str, fingerprint: &str) -> ChangeRecord {
    let certificates = vec![OperatorCertificate {
        fingerprint: fingerprint.to_string(),
        key_usage: KEY_USAGE_SIGNING.to_string(),
    }];
    ChangeRecord::new(
        name,
        SECTION_CERTIFICATES,
        serde_json::to_value(certificates).expect("certificate list"),
    )
}

/// Initialised in-memory store.
pub fn memory_store() -> InMemoryDataStore {
    let mut store = InMemoryDataStore::new_in_memory(ChunkStoreConfig::default());
    store.init().expect("in-memory store");
    store
}

/// Directory over a fresh in-memory log trusting `pki`, plus a second handle
/// on the same log for writing behind the directory's back.
pub fn memory_directory(pki: &TestPki) -> (RecordDirectory, InMemoryDataStore) {
    let raw = memory_store();
    let directory = attached_directory(&raw, pki);
    (directory, raw)
}

/// Another directory process over the log of `store`.
pub fn attached_directory(store: &InMemoryDataStore, pki: &TestPki) -> RecordDirectory {
    RecordDirectory::new(store.attach(), pki.trust_store()).expect("directory")
}

/// Append `record` to the log as a signed change record entry, skipping
/// every directory check.
pub fn write_raw(store: &mut InMemoryDataStore, record: &SignedChangeRecord) {
    let data = serde_json::to_vec(record).expect("record json");
    store
        .write(&DataEntry::new(SIGNED_CHANGE_RECORD_ENTRY, data))
        .expect("raw write");
}
