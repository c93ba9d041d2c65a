//! # Domain Errors
//!
//! Error types for the chunked log.
//!
//! Two families matter to callers: `IOError` (the backing file failed) and
//! protocol errors (the bytes on disk do not follow the chunk format). See
//! [`StoreError::is_protocol`].

use thiserror::Error;

/// Errors that can occur while writing or reading the chunked log.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Filesystem or log access failed.
    #[error("I/O error: {message}")]
    IOError { message: String },

    /// Chunk or entry carries a version this codec does not know.
    #[error("Unknown {kind} version: {version}")]
    UnknownVersion { kind: &'static str, version: u8 },

    /// Fewer bytes available than the layout requires.
    #[error("Truncated {what}: need {needed} bytes, {available} available")]
    Truncated {
        what: &'static str,
        needed: usize,
        available: usize,
    },

    /// Chunk coordinates are inconsistent with their group.
    #[error("Invalid chunk: {0}")]
    InvalidChunk(String),

    /// Entry needs more chunks than a 16-bit chunk count can address.
    #[error("Data is too large: {chunks} chunks needed, at most {max} allowed")]
    TooLarge { chunks: usize, max: usize },

    /// A length-prefixed field exceeds its 16-bit length prefix.
    #[error("{field} is too long: {len} bytes")]
    FieldTooLong { field: &'static str, len: usize },

    /// Store configuration is unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// `write` or `read` called before `init`.
    #[error("Store not initialised")]
    NotInitialized,
}

impl StoreError {
    /// Whether the error stems from malformed log contents rather than I/O
    /// or misuse.
    pub fn is_protocol(&self) -> bool {
        matches!(
            self,
            StoreError::UnknownVersion { .. }
                | StoreError::Truncated { .. }
                | StoreError::InvalidChunk(_)
        )
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::IOError {
            message: err.to_string(),
        }
    }
}
