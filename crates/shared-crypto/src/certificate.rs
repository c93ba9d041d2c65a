//! # X.509 Certificates
//!
//! Loading operator certificates, checking that they are fit for signing,
//! extracting the operator identity from subject alternative names and
//! verifying the chain of trust up to a configured root.
//!
//! Operator identity lives in SAN URIs:
//!
//! - `iris-name://<name>` names the operator.
//! - `iris-group://<group>` adds the operator to a group (e.g. `sd-admin`).

use crate::ecdsa::P256PublicKey;
use crate::hashing::sha256;
use crate::CryptoError;
use std::path::Path;
use x509_parser::certificate::X509Certificate;
use x509_parser::extensions::GeneralName;
use x509_parser::pem::parse_x509_pem;
use x509_parser::public_key::PublicKey;

/// Maximum number of intermediates between a leaf and its root.
pub const MAX_CHAIN_DEPTH: usize = 8;

const NAME_SCHEME: &str = "iris-name";
const GROUP_SCHEME: &str = "iris-group";

/// A parsed-on-demand DER certificate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Certificate {
    der: Vec<u8>,
}

impl Certificate {
    /// Load from DER bytes.
    pub fn from_der(der: Vec<u8>) -> Result<Self, CryptoError> {
        let certificate = Self { der };
        certificate.parse()?;
        Ok(certificate)
    }

    /// Load the first PEM block, which must be a `CERTIFICATE`.
    pub fn from_pem(pem: &str) -> Result<Self, CryptoError> {
        let (_, block) = parse_x509_pem(pem.as_bytes())
            .map_err(|e| CryptoError::NotACertificate(e.to_string()))?;
        if block.label != "CERTIFICATE" {
            return Err(CryptoError::NotACertificate(block.label));
        }
        Self::from_der(block.contents)
    }

    /// Load a PEM certificate from disk.
    pub fn from_pem_file(path: impl AsRef<Path>) -> Result<Self, CryptoError> {
        let pem = std::fs::read_to_string(path.as_ref())
            .map_err(|e| CryptoError::Io(format!("{}: {e}", path.as_ref().display())))?;
        Self::from_pem(&pem)
    }

    /// Load a certificate that will be used to verify signatures: it must
    /// carry an ECDSA key and the digitalSignature key usage.
    pub fn load_signing(pem: &str) -> Result<Self, CryptoError> {
        let certificate = Self::from_pem(pem)?;
        certificate.check_signing_usage()?;
        Ok(certificate)
    }

    /// Raw DER bytes.
    pub fn der(&self) -> &[u8] {
        &self.der
    }

    /// Hex SHA-256 over the DER encoding.
    pub fn fingerprint(&self) -> String {
        hex::encode(sha256(&self.der))
    }

    /// Subject distinguished name, for diagnostics.
    pub fn subject(&self) -> String {
        self.parse()
            .map(|cert| cert.subject().to_string())
            .unwrap_or_default()
    }

    /// Check the key usage and key algorithm required of signing certificates.
    pub fn check_signing_usage(&self) -> Result<(), CryptoError> {
        let cert = self.parse()?;
        let digital_signature = cert
            .key_usage()
            .map_err(malformed)?
            .map(|usage| usage.value.digital_signature())
            .unwrap_or(false);
        if !digital_signature {
            return Err(CryptoError::MissingSigningUsage);
        }
        match cert.public_key().parsed().map_err(malformed)? {
            PublicKey::EC(_) => Ok(()),
            _ => Err(CryptoError::NotEcdsa),
        }
    }

    /// The certificate's P-256 public key.
    pub fn public_key(&self) -> Result<P256PublicKey, CryptoError> {
        let cert = self.parse()?;
        match cert.public_key().parsed().map_err(malformed)? {
            PublicKey::EC(point) => {
                P256PublicKey::from_sec1_bytes(point.data()).map_err(|_| CryptoError::UnsupportedCurve)
            }
            _ => Err(CryptoError::NotEcdsa),
        }
    }

    /// Operator identity from the subject alternative names.
    pub fn subject_info(&self) -> Result<SubjectInfo, CryptoError> {
        let cert = self.parse()?;
        let mut info = SubjectInfo::default();
        let Some(san) = cert.subject_alternative_name().map_err(malformed)? else {
            return Ok(info);
        };
        for name in &san.value.general_names {
            match name {
                GeneralName::URI(uri) => {
                    let (scheme, host) = split_uri(uri)?;
                    match scheme {
                        GROUP_SCHEME if !host.is_empty() => info.groups.push(host.to_string()),
                        NAME_SCHEME => info.name = host.to_string(),
                        _ => {}
                    }
                }
                GeneralName::DNSName(dns) => info.dns_names.push(dns.to_string()),
                _ => {}
            }
        }
        Ok(info)
    }

    fn parse(&self) -> Result<X509Certificate<'_>, CryptoError> {
        x509_parser::parse_x509_certificate(&self.der)
            .map(|(_, cert)| cert)
            .map_err(|e| CryptoError::MalformedCertificate(e.to_string()))
    }
}

fn malformed(error: impl std::fmt::Display) -> CryptoError {
    CryptoError::MalformedCertificate(error.to_string())
}

/// Split `scheme://host[:port][/path]` into scheme and host.
fn split_uri(uri: &str) -> Result<(&str, &str), CryptoError> {
    let (scheme, rest) = uri
        .split_once(':')
        .ok_or_else(|| CryptoError::InvalidSubjectName(uri.to_string()))?;
    let Some(authority) = rest.strip_prefix("//") else {
        return Ok((scheme, ""));
    };
    let end = authority
        .find(|c| matches!(c, '/' | '?' | '#'))
        .unwrap_or(authority.len());
    let authority = &authority[..end];
    let host = authority.rsplit_once('@').map_or(authority, |(_, host)| host);
    Ok((scheme, host))
}

/// Identity carried by a certificate.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubjectInfo {
    /// Operator name (`iris-name://` URI).
    pub name: String,
    /// DNS subject alternative names.
    pub dns_names: Vec<String>,
    /// Group memberships (`iris-group://` URIs).
    pub groups: Vec<String>,
}

impl SubjectInfo {
    /// Whether the subject belongs to `group`.
    pub fn in_group(&self, group: &str) -> bool {
        self.groups.iter().any(|g| g == group)
    }
}

/// Root and intermediate certificates a signer must chain to.
#[derive(Clone, Debug, Default)]
pub struct TrustStore {
    roots: Vec<Certificate>,
    intermediates: Vec<Certificate>,
}

impl TrustStore {
    /// Create from already loaded certificates.
    pub fn new(roots: Vec<Certificate>, intermediates: Vec<Certificate>) -> Self {
        Self {
            roots,
            intermediates,
        }
    }

    /// Load roots and intermediates from PEM files.
    pub fn from_pem_files<P: AsRef<Path>>(
        roots: &[P],
        intermediates: &[P],
    ) -> Result<Self, CryptoError> {
        let load = |paths: &[P]| {
            paths
                .iter()
                .map(Certificate::from_pem_file)
                .collect::<Result<Vec<_>, _>>()
        };
        Ok(Self::new(load(roots)?, load(intermediates)?))
    }

    /// Number of root certificates.
    pub fn root_count(&self) -> usize {
        self.roots.len()
    }

    /// Verify that `leaf` chains to one of the roots, optionally through the
    /// intermediates, and is valid for code signing. When `dns_name` is set,
    /// the leaf must list it among its DNS names.
    pub fn verify(&self, leaf: &Certificate, dns_name: Option<&str>) -> Result<(), CryptoError> {
        let cert = leaf.parse()?;
        check_validity(&cert)?;

        if let Some(eku) = cert.extended_key_usage().map_err(malformed)? {
            if !(eku.value.code_signing || eku.value.any) {
                return Err(CryptoError::InvalidExtendedKeyUsage);
            }
        }

        if let Some(name) = dns_name {
            let info = leaf.subject_info()?;
            if !info.dns_names.iter().any(|dns| dns.eq_ignore_ascii_case(name)) {
                return Err(CryptoError::NameMismatch(name.to_string()));
            }
        }

        let roots = parse_all(&self.roots)?;
        let intermediates = parse_all(&self.intermediates)?;
        let mut used = vec![false; intermediates.len()];

        if chains_to_root(&cert, &roots, &intermediates, &mut used, 0) {
            Ok(())
        } else {
            Err(CryptoError::UntrustedChain {
                issuer: cert.issuer().to_string(),
            })
        }
    }
}

fn parse_all(certificates: &[Certificate]) -> Result<Vec<X509Certificate<'_>>, CryptoError> {
    certificates.iter().map(Certificate::parse).collect()
}

fn check_validity(cert: &X509Certificate<'_>) -> Result<(), CryptoError> {
    if cert.validity().is_valid() {
        Ok(())
    } else {
        Err(CryptoError::CertificateExpired {
            subject: cert.subject().to_string(),
        })
    }
}

/// Depth-first search for a path from `cert` to a root. Each intermediate is
/// used at most once per path.
fn chains_to_root(
    cert: &X509Certificate<'_>,
    roots: &[X509Certificate<'_>],
    intermediates: &[X509Certificate<'_>],
    used: &mut [bool],
    depth: usize,
) -> bool {
    if roots.iter().any(|root| issued_by(cert, root)) {
        return true;
    }
    if depth >= MAX_CHAIN_DEPTH {
        return false;
    }
    for (index, intermediate) in intermediates.iter().enumerate() {
        if used[index] || !issued_by(cert, intermediate) {
            continue;
        }
        used[index] = true;
        if chains_to_root(intermediate, roots, intermediates, used, depth + 1) {
            return true;
        }
        used[index] = false;
    }
    false
}

fn issued_by(cert: &X509Certificate<'_>, issuer: &X509Certificate<'_>) -> bool {
    if cert.issuer().as_raw() != issuer.subject().as_raw() {
        return false;
    }
    let is_ca = matches!(issuer.basic_constraints(), Ok(Some(bc)) if bc.value.ca);
    is_ca
        && check_validity(issuer).is_ok()
        && cert.verify_signature(Some(issuer.public_key())).is_ok()
}
