//! # Change Records
//!
//! A `ChangeRecord` describes one update to one section of an operator's
//! directory entry. Operators sign it off-system and submit it wrapped in a
//! `SignedChangeRecord`, which links it to its logical predecessor by hash.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use serde_json::Value;

/// Section holding the channels an operator can be reached through.
pub const SECTION_CHANNELS: &str = "channels";

/// Section holding operator preferences.
pub const SECTION_PREFERENCES: &str = "preferences";

/// Section pinning the certificates an operator signs with.
pub const SECTION_CERTIFICATES: &str = "certificates";

/// `key_usage` of a pinned certificate used to sign change records.
pub const KEY_USAGE_SIGNING: &str = "signing";

/// Certificate group granting unrestricted append rights.
pub const ADMIN_GROUP: &str = "sd-admin";

/// Hex-encoded SHA-256 digest identifying a record.
pub type RecordHash = String;

/// RFC 3339 creation time that serializes back to the exact text it was
/// read from.
///
/// Record hashes are computed over the serialized record, so a timestamp
/// written with a local offset or trimmed fractional seconds must not be
/// normalized on the way through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestamp {
    text: String,
    time: DateTime<Utc>,
}

impl Timestamp {
    /// Parse an RFC 3339 timestamp, keeping its text.
    pub fn parse(text: impl Into<String>) -> Result<Self, chrono::ParseError> {
        let text = text.into();
        let time = DateTime::parse_from_rfc3339(&text)?.with_timezone(&Utc);
        Ok(Self { text, time })
    }

    /// The timestamp as it appears on the wire.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The instant, in UTC.
    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(time: DateTime<Utc>) -> Self {
        Self {
            text: time.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            time,
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(text).map_err(serde::de::Error::custom)
    }
}

/// The signed payload of a directory update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    /// Operator whose entry this record modifies.
    pub name: String,
    /// Entry section the data replaces (e.g. `channels`).
    pub section: String,
    /// Section content. Arbitrary JSON.
    #[serde(default)]
    pub data: Value,
    /// Creation time, set by the signer.
    pub created_at: Timestamp,
}

impl ChangeRecord {
    /// Create a record stamped with the current time.
    pub fn new(name: impl Into<String>, section: impl Into<String>, data: Value) -> Self {
        Self::at(name, section, data, Utc::now())
    }

    /// Create a record with an explicit creation time.
    pub fn at(
        name: impl Into<String>,
        section: impl Into<String>,
        data: Value,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            section: section.into(),
            data,
            created_at: created_at.into(),
        }
    }
}

/// ECDSA signature over a signed change record.
///
/// `r` and `s` are base-10 integers; `certificate` is the signer's PEM
/// certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSignature {
    pub r: String,
    pub s: String,
    #[serde(rename = "c")]
    pub certificate: String,
}

/// A change record linked into the directory's hash forest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedChangeRecord {
    pub record: ChangeRecord,
    /// Hash of the logical predecessor. Empty for a new root.
    #[serde(default)]
    pub parent_hash: RecordHash,
    /// Canonical digest of `record` alone.
    pub hash: RecordHash,
    #[serde(default)]
    pub signature: Option<RecordSignature>,
}

impl SignedChangeRecord {
    /// Whether this record starts a new chain.
    pub fn is_root(&self) -> bool {
        self.parent_hash.is_empty()
    }

    /// Creation time of the wrapped record.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.record.created_at.time()
    }
}

/// Certificate an operator publishes in its `certificates` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorCertificate {
    /// Hex SHA-256 of the DER certificate.
    pub fingerprint: String,
    /// What the certificate is used for (e.g. `signing`).
    pub key_usage: String,
}
