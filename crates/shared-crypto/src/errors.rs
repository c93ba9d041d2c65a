//! Crypto error types.

use thiserror::Error;

/// Cryptographic operation errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// PEM block is missing or not a certificate
    #[error("Not a certificate: {0}")]
    NotACertificate(String),

    /// DER structure could not be parsed
    #[error("Malformed certificate: {0}")]
    MalformedCertificate(String),

    /// Certificate lacks the digitalSignature key usage
    #[error("Expected a certificate for signing")]
    MissingSigningUsage,

    /// Certificate key is not an ECDSA key
    #[error("Expected an ECDSA-based certificate")]
    NotEcdsa,

    /// ECDSA key on a curve other than P-256
    #[error("Unsupported elliptic curve")]
    UnsupportedCurve,

    /// Certificate is outside its validity period
    #[error("Certificate expired or not yet valid: {subject}")]
    CertificateExpired {
        /// Subject of the offending certificate
        subject: String,
    },

    /// Extended key usage does not allow code signing
    #[error("Certificate not valid for code signing")]
    InvalidExtendedKeyUsage,

    /// Certificate is not valid for the requested DNS name
    #[error("Certificate not valid for name {0}")]
    NameMismatch(String),

    /// No path from the certificate to a configured root
    #[error("Certificate signed by unknown authority: {issuer}")]
    UntrustedChain {
        /// Issuer of the last certificate that could not be chained further
        issuer: String,
    },

    /// Malformed SAN URI
    #[error("Invalid subject alternative name: {0}")]
    InvalidSubjectName(String),

    /// Signature scalar is not a base-10 integer of at most 256 bits
    #[error("Not a big integer in base 10: {0}")]
    InvalidScalar(String),

    /// Invalid signature
    #[error("Invalid signature")]
    InvalidSignature,

    /// Signature verification failed
    #[error("Signature verification failed")]
    SignatureVerificationFailed,

    /// Invalid public key
    #[error("Invalid public key")]
    InvalidPublicKey,

    /// Invalid private key
    #[error("Invalid private key")]
    InvalidPrivateKey,

    /// Value cannot be canonically hashed
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Reading key or certificate material failed
    #[error("I/O error: {0}")]
    Io(String),
}
