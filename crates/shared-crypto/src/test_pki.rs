//! Throwaway certificate authority for tests.
//!
//! Mints a P-256 root, an intermediate, and operator certificates carrying
//! `iris-name://` and `iris-group://` SAN URIs.

#![allow(missing_docs)]
#![allow(clippy::expect_used)]

use crate::certificate::{Certificate, TrustStore};
use crate::ecdsa::P256KeyPair;
use rcgen::{
    date_time_ymd, BasicConstraints, CertificateParams, DistinguishedName, DnType,
    ExtendedKeyUsagePurpose, Ia5String, IsCa, KeyPair, KeyUsagePurpose, SanType,
};

pub struct TestPki {
    root_key: KeyPair,
    root: rcgen::Certificate,
    intermediate_key: KeyPair,
    intermediate: rcgen::Certificate,
}

/// Operator credentials as PEM strings.
#[derive(Clone, Debug)]
pub struct TestOperator {
    pub name: String,
    pub key_pem: String,
    pub certificate_pem: String,
}

impl TestOperator {
    pub fn key_pair(&self) -> P256KeyPair {
        P256KeyPair::from_pem(&self.key_pem).expect("operator key")
    }

    pub fn certificate(&self) -> Certificate {
        Certificate::from_pem(&self.certificate_pem).expect("operator certificate")
    }
}

fn distinguished_name(common_name: &str) -> DistinguishedName {
    let mut name = DistinguishedName::new();
    name.push(DnType::CommonName, common_name);
    name
}

fn uri(value: String) -> SanType {
    SanType::URI(Ia5String::try_from(value).expect("ascii uri"))
}

fn ca_params(common_name: &str) -> CertificateParams {
    let mut params = CertificateParams::default();
    params.distinguished_name = distinguished_name(common_name);
    params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    params.key_usages = vec![KeyUsagePurpose::KeyCertSign, KeyUsagePurpose::CrlSign];
    params
}

fn operator_params(name: &str, groups: &[&str]) -> CertificateParams {
    let mut params = CertificateParams::default();
    params.distinguished_name = distinguished_name(name);
    params.is_ca = IsCa::ExplicitNoCa;
    params.key_usages = vec![KeyUsagePurpose::DigitalSignature];
    params.extended_key_usages = vec![ExtendedKeyUsagePurpose::CodeSigning];
    params.subject_alt_names = std::iter::once(uri(format!("iris-name://{name}")))
        .chain(groups.iter().map(|group| uri(format!("iris-group://{group}"))))
        .collect();
    params
}

impl TestPki {
    pub fn new() -> Self {
        let root_key = KeyPair::generate().expect("root key");
        let root = ca_params("SD Test Root CA")
            .self_signed(&root_key)
            .expect("root certificate");

        let intermediate_key = KeyPair::generate().expect("intermediate key");
        let intermediate = ca_params("SD Test Intermediate CA")
            .signed_by(&intermediate_key, &root, &root_key)
            .expect("intermediate certificate");

        Self {
            root_key,
            root,
            intermediate_key,
            intermediate,
        }
    }

    pub fn root_pem(&self) -> String {
        self.root.pem()
    }

    pub fn intermediate_pem(&self) -> String {
        self.intermediate.pem()
    }

    /// Trust store with this PKI's root and intermediate.
    pub fn trust_store(&self) -> TrustStore {
        TrustStore::new(
            vec![Certificate::from_pem(&self.root_pem()).expect("root")],
            vec![Certificate::from_pem(&self.intermediate_pem()).expect("intermediate")],
        )
    }

    /// Operator signed directly by the root.
    pub fn operator(&self, name: &str, groups: &[&str]) -> TestOperator {
        self.issue(name, operator_params(name, groups), false)
    }

    /// Operator signed by the intermediate.
    pub fn intermediate_operator(&self, name: &str, groups: &[&str]) -> TestOperator {
        self.issue(name, operator_params(name, groups), true)
    }

    /// Operator whose certificate expired long ago.
    pub fn expired_operator(&self, name: &str) -> TestOperator {
        let mut params = operator_params(name, &[]);
        params.not_before = date_time_ymd(1990, 1, 1);
        params.not_after = date_time_ymd(2000, 1, 1);
        self.issue(name, params, false)
    }

    /// Operator with an additional DNS subject alternative name.
    pub fn operator_with_dns(&self, name: &str, dns_name: &str) -> TestOperator {
        let mut params = operator_params(name, &[]);
        params.subject_alt_names.push(SanType::DnsName(
            Ia5String::try_from(dns_name.to_string()).expect("ascii dns name"),
        ));
        self.issue(name, params, false)
    }

    /// Operator certificate only valid for TLS servers.
    pub fn tls_operator(&self, name: &str) -> TestOperator {
        let mut params = operator_params(name, &[]);
        params.extended_key_usages = vec![ExtendedKeyUsagePurpose::ServerAuth];
        self.issue(name, params, false)
    }

    fn issue(&self, name: &str, params: CertificateParams, via_intermediate: bool) -> TestOperator {
        let key = KeyPair::generate().expect("operator key");
        let certificate = if via_intermediate {
            params.signed_by(&key, &self.intermediate, &self.intermediate_key)
        } else {
            params.signed_by(&key, &self.root, &self.root_key)
        }
        .expect("operator certificate");

        TestOperator {
            name: name.to_string(),
            key_pem: key.serialize_pem(),
            certificate_pem: certificate.pem(),
        }
    }
}

impl Default for TestPki {
    fn default() -> Self {
        Self::new()
    }
}
