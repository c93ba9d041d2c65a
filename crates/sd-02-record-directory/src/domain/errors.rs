//! # Domain Errors
//!
//! ## Propagation
//!
//! | Error | Raised by | Effect |
//! |-------|-----------|--------|
//! | `Io`, `Protocol`, `Decode`, `Consistency` | `update` | Whole update aborted, projection kept |
//! | `Crypto`, `Permission`, `Conflict` | `append` | Batch stops, nothing else changes |
//! | `VerificationError` | chain verification | Logged; the chain is dropped |

use sd_01_chunk_store::StoreError;
use shared_crypto::CryptoError;
use thiserror::Error;

/// Errors surfaced by the record directory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    /// Filesystem or log access failed.
    #[error("I/O error: {0}")]
    Io(String),

    /// The log does not follow the chunk format.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// A log entry is not a signed change record.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Signature, certificate or record hash invalid.
    #[error("Crypto error: {0}")]
    Crypto(String),

    /// Signer may not write this section of this entry.
    #[error("Permission denied: {signer:?} may not write section {section:?} of {name:?}")]
    Permission {
        signer: String,
        name: String,
        section: String,
    },

    /// Submission conflicts with the current chain; refresh and retry.
    #[error("Conflict: {0}")]
    Conflict(#[from] ConflictError),

    /// Record graph is corrupt, or an accepted record vanished.
    #[error("Consistency error: {0}")]
    Consistency(String),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Reasons an append conflicts with the current directory state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConflictError {
    /// Parent hash is not the current tip.
    #[error("stale append: expected parent {expected:?}, got {provided:?}")]
    StaleParent {
        expected: Option<String>,
        provided: String,
    },

    /// New root submitted by a signer outside `sd-admin`.
    #[error("only sd-admin may start a new root, {signer:?} is not a member")]
    RootRequiresAdmin { signer: String },

    /// New root would not win fork choice against the current root.
    #[error("new root created at {provided} is not later than the current root created at {current}")]
    StaleRoot {
        current: chrono::DateTime<chrono::Utc>,
        provided: chrono::DateTime<chrono::Utc>,
    },

    /// Record hash already present in the log.
    #[error("record {0} already exists")]
    DuplicateRecord(String),
}

impl DirectoryError {
    /// Whether the caller should refresh and resubmit.
    pub fn is_conflict(&self) -> bool {
        matches!(self, DirectoryError::Conflict(_))
    }
}

impl From<StoreError> for DirectoryError {
    fn from(err: StoreError) -> Self {
        if err.is_protocol() {
            DirectoryError::Protocol(err.to_string())
        } else {
            DirectoryError::Io(err.to_string())
        }
    }
}

impl From<CryptoError> for DirectoryError {
    fn from(err: CryptoError) -> Self {
        DirectoryError::Crypto(err.to_string())
    }
}

impl From<serde_json::Error> for DirectoryError {
    fn from(err: serde_json::Error) -> Self {
        DirectoryError::Decode(err.to_string())
    }
}

/// Why a single record failed verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    #[error("hash mismatch: declared {declared}, computed {computed}")]
    HashMismatch { declared: String, computed: String },

    #[error("record is not signed")]
    MissingSignature,

    #[error("signing certificate {fingerprint} is not the one pinned for {name:?}")]
    CertificateNotPinned { name: String, fingerprint: String },

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error("{signer:?} may not write section {section:?} of {name:?}")]
    Unauthorized {
        signer: String,
        name: String,
        section: String,
    },
}

impl From<VerificationError> for DirectoryError {
    fn from(err: VerificationError) -> Self {
        match err {
            VerificationError::Unauthorized {
                signer,
                name,
                section,
            } => DirectoryError::Permission {
                signer,
                name,
                section,
            },
            other => DirectoryError::Crypto(other.to_string()),
        }
    }
}
