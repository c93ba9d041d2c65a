//! # Domain Layer
//!
//! Chain construction, verification and projection. No I/O besides loading
//! configuration and key files.
//!
//! ## Modules
//!
//! - `graph` - Record arena and chain enumeration
//! - `hashing` - Record hash and signing payload
//! - `verifier` - Per-record signature, trust and authorization checks
//! - `authorization` - Who may write which section
//! - `pinning` - Certificates pinned in `certificates` sections
//! - `fork_choice` - Picking one chain among the verified ones
//! - `projection` - Folding the winning chain into directory entries
//! - `signer` - Operator-side record signing
//! - `config` - `DirectoryConfig`
//! - `errors` - Domain error types

pub mod authorization;
pub mod config;
pub mod errors;
pub mod fork_choice;
pub mod graph;
pub mod hashing;
pub mod pinning;
pub mod projection;
pub mod signer;
pub mod verifier;

pub use authorization::{is_admin, may_write};
pub use config::DirectoryConfig;
pub use errors::{ConflictError, DirectoryError, VerificationError};
pub use fork_choice::select_chain;
pub use graph::{Chain, RecordGraph, RecordIndex};
pub use hashing::{record_hash, signing_payload};
pub use pinning::pinned_fingerprint;
pub use projection::{project, Projection};
pub use signer::RecordSigner;
pub use verifier::RecordVerifier;
