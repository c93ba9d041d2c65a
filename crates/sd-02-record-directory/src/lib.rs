//! # Record Directory (sd-02)
//!
//! Tamper-evident service directory built from signed change records on a
//! shared chunked log. Any operator can publish how it is reached; no single
//! process owns the log.
//!
//! ## Records
//!
//! Each `SignedChangeRecord` names its logical predecessor by hash, so the
//! log holds a forest of hash chains. Every update re-enumerates the chains,
//! verifies each record against the chain before it, drops any chain with
//! a bad record, and keeps the chain whose root is most recent.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Description |
//! |----|-----------|-------------|
//! | 1 | Hash Integrity | A record's `hash` recomputes from its content |
//! | 2 | Chain Of Trust | Every signer certificate chains to a configured root |
//! | 3 | Authorization | Operators write only `channels`/`preferences` of their own entry; `sd-admin` writes anything |
//! | 4 | Whole Chains | One failing record drops its entire chain |
//! | 5 | Derived Projection | Entries are rebuilt from the winning chain on every update |
//! | 6 | Optimistic Append | A record extends the current tip or is rejected as stale |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Graph, verification, fork choice, projection, signing, config
//! - `ports/` - `ServiceDirectoryApi` (inbound) and `DataStore` (outbound)
//! - `service.rs` - `RecordDirectory`
//!
//! ## Usage
//!
//! ```ignore
//! use sd_02_record_directory::{DirectoryConfig, RecordDirectory, RecordSigner, ServiceDirectoryApi};
//!
//! let directory = RecordDirectory::open(&config)?;
//! let signer = RecordSigner::from_pem_files("alice.key", "alice.crt")?;
//! let tip = directory.tip().map(|tip| tip.hash);
//! let records = signer.sign_chain(vec![record], tip.as_deref())?;
//! directory.append(records)?;
//! ```

pub mod domain;
pub mod ports;
pub mod service;

/// Signed-record builders for tests.
///
/// Requires feature: `test-utils`
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use domain::{
    ConflictError, DirectoryConfig, DirectoryError, RecordSigner, RecordVerifier,
    VerificationError,
};
pub use ports::inbound::ServiceDirectoryApi;
pub use service::{RecordDirectory, SIGNED_CHANGE_RECORD_ENTRY};
