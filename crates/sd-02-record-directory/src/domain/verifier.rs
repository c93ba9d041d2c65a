//! # Record Verification
//!
//! Checks, in order, for one record given the chain prefix before it:
//!
//! 1. `hash` recomputes from `record`
//! 2. The signature is present and its certificate is a signing certificate
//! 3. The certificate matches the one pinned for its subject, if any
//! 4. The certificate chains to a configured root
//! 5. `r`/`s` verify over the signing payload
//! 6. The subject may write the record (skipped for records verified before)

use super::authorization::may_write;
use super::errors::VerificationError;
use super::hashing::{record_hash, signing_payload};
use super::pinning::pinned_fingerprint;
use shared_crypto::{Certificate, EcdsaSignature, SubjectInfo, TrustStore};
use shared_types::{SignedChangeRecord, KEY_USAGE_SIGNING};

/// Verifies signed change records against a set of trust anchors.
#[derive(Debug, Clone)]
pub struct RecordVerifier {
    trust: TrustStore,
}

impl RecordVerifier {
    pub fn new(trust: TrustStore) -> Self {
        Self { trust }
    }

    pub fn trust_store(&self) -> &TrustStore {
        &self.trust
    }

    /// Verify `record` as the successor of `prefix`, returning the signer.
    ///
    /// `known_good` marks a record that passed verification in an earlier
    /// update; it still has to be intact and correctly signed, but is not
    /// re-authorized.
    pub fn verify(
        &self,
        record: &SignedChangeRecord,
        prefix: &[&SignedChangeRecord],
        known_good: bool,
    ) -> Result<SubjectInfo, VerificationError> {
        let computed = record_hash(&record.record)?;
        if computed != record.hash {
            return Err(VerificationError::HashMismatch {
                declared: record.hash.clone(),
                computed,
            });
        }

        let signature = record
            .signature
            .as_ref()
            .ok_or(VerificationError::MissingSignature)?;
        let certificate = Certificate::load_signing(&signature.certificate)?;
        let subject = certificate.subject_info()?;

        if let Some(pinned) =
            pinned_fingerprint(prefix.iter().copied(), &subject.name, KEY_USAGE_SIGNING)
        {
            let fingerprint = certificate.fingerprint();
            if !fingerprint.eq_ignore_ascii_case(&pinned) {
                return Err(VerificationError::CertificateNotPinned {
                    name: subject.name,
                    fingerprint,
                });
            }
        }

        self.trust.verify(&certificate, None)?;

        let payload = signing_payload(record)?;
        let ecdsa = EcdsaSignature::from_decimal(&signature.r, &signature.s)?;
        certificate.public_key()?.verify_prehash(&payload, &ecdsa)?;

        if !known_good && !may_write(&subject, &record.record) {
            return Err(VerificationError::Unauthorized {
                signer: subject.name,
                name: record.record.name.clone(),
                section: record.record.section.clone(),
            });
        }
        Ok(subject)
    }
}
