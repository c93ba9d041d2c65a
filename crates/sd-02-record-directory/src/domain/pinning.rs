//! # Certificate Pinning
//!
//! An operator's `certificates` section lists the fingerprints of the
//! certificates it uses. Once a `signing` certificate is pinned for a name,
//! later records signed for that name must use exactly that certificate.

use shared_types::{OperatorCertificate, SignedChangeRecord, SECTION_CERTIFICATES};
use tracing::debug;

/// Fingerprint of the last certificate with `key_usage` pinned for `name`
/// by `records`, if any.
pub fn pinned_fingerprint<'a>(
    records: impl IntoIterator<Item = &'a SignedChangeRecord>,
    name: &str,
    key_usage: &str,
) -> Option<String> {
    let mut pinned = None;
    for signed in records {
        let record = &signed.record;
        if record.section != SECTION_CERTIFICATES || record.name != name {
            continue;
        }
        let certificates: Vec<OperatorCertificate> = if record.data.is_null() {
            Vec::new()
        } else {
            match serde_json::from_value(record.data.clone()) {
                Ok(certificates) => certificates,
                Err(e) => {
                    debug!("[sd-02] Skipping malformed certificates record {}: {e}", signed.hash);
                    continue;
                }
            }
        };
        for certificate in certificates {
            if certificate.key_usage == key_usage {
                pinned = Some(certificate.fingerprint);
            }
        }
    }
    pinned
}
