//! # Record Signing
//!
//! Operator-side helper producing `SignedChangeRecord`s the directory will
//! accept: hash the record, link it to its parent, sign the payload with
//! the operator key and attach the operator certificate.

use super::hashing::{record_hash, signing_payload};
use shared_crypto::{Certificate, CryptoError, P256KeyPair};
use shared_types::{ChangeRecord, RecordSignature, SignedChangeRecord};
use std::path::Path;

pub struct RecordSigner {
    key: P256KeyPair,
    certificate_pem: String,
}

impl RecordSigner {
    pub fn new(key: P256KeyPair, certificate_pem: impl Into<String>) -> Self {
        Self {
            key,
            certificate_pem: certificate_pem.into(),
        }
    }

    /// Load a PEM key and a PEM signing certificate from disk.
    pub fn from_pem_files(
        key_file: impl AsRef<Path>,
        certificate_file: impl AsRef<Path>,
    ) -> Result<Self, CryptoError> {
        let key = P256KeyPair::from_pem_file(key_file)?;
        let path = certificate_file.as_ref();
        let certificate_pem = std::fs::read_to_string(path)
            .map_err(|e| CryptoError::Io(format!("{}: {e}", path.display())))?;
        let certificate = Certificate::load_signing(&certificate_pem)?;
        if certificate.public_key()? != key.public_key() {
            return Err(CryptoError::InvalidInput(
                "certificate does not belong to the signing key".into(),
            ));
        }
        Ok(Self::new(key, certificate_pem))
    }

    pub fn certificate_pem(&self) -> &str {
        &self.certificate_pem
    }

    /// Sign `record` as a child of `parent_hash` (empty for a new root).
    pub fn sign(
        &self,
        record: ChangeRecord,
        parent_hash: &str,
    ) -> Result<SignedChangeRecord, CryptoError> {
        let mut signed = SignedChangeRecord {
            hash: record_hash(&record)?,
            record,
            parent_hash: parent_hash.to_string(),
            signature: None,
        };
        let signature = self.key.sign_prehash(&signing_payload(&signed)?)?;
        signed.signature = Some(RecordSignature {
            r: signature.r_decimal(),
            s: signature.s_decimal(),
            certificate: self.certificate_pem.clone(),
        });
        Ok(signed)
    }

    /// Sign a batch linked parent-to-child. The first record extends
    /// `parent`, or starts a new root when `parent` is `None`.
    pub fn sign_chain(
        &self,
        records: Vec<ChangeRecord>,
        parent: Option<&str>,
    ) -> Result<Vec<SignedChangeRecord>, CryptoError> {
        let mut parent_hash = parent.unwrap_or_default().to_string();
        let mut signed = Vec::with_capacity(records.len());
        for record in records {
            let next = self.sign(record, &parent_hash)?;
            parent_hash = next.hash.clone();
            signed.push(next);
        }
        Ok(signed)
    }
}
