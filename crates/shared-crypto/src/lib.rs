//! # Shared Crypto - Directory Cryptography
//!
//! The cryptographic collaborator of the service directory.
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `hashing` | SHA-256 structured hash | Record hashes, signing payloads |
//! | `ecdsa` | P-256 | Record signatures |
//! | `certificate` | X.509 | Operator identity, chain of trust |
//!
//! ## Security Properties
//!
//! - **Structured hash**: independent of map key order, distinguishes types
//!   and nesting
//! - **P-256**: RFC 6979 deterministic nonces
//! - **Chain of trust**: validity period, CA constraints and code-signing
//!   usage checked on every path element

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod certificate;
pub mod ecdsa;
pub mod errors;
pub mod hashing;

#[cfg(any(test, feature = "test-pki"))]
pub mod test_pki;

// Re-exports
pub use certificate::{Certificate, SubjectInfo, TrustStore};
pub use ecdsa::{EcdsaSignature, P256KeyPair, P256PublicKey};
pub use errors::CryptoError;
pub use hashing::{sha256, structured_hash, structured_hash_hex, structured_hash_of, Hash};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
