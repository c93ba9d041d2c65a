//! # Canonical Structured Hashing
//!
//! SHA-256 over a tagged traversal of a JSON value. The digest reflects both
//! the values and the structure of the input, and does not depend on map key
//! order.
//!
//! ## Encoding
//!
//! | Value | Fed to SHA-256 |
//! |-------|----------------|
//! | string `v` | `"string"` then the UTF-8 bytes of `v` |
//! | map | tag `map`, then each key (sorted) followed by its value |
//! | list | tag `list`, then each index (as int) followed by its value |
//! | bool | tag `bool`, then int `1` or `0` |
//! | number | tag `float64`, then a 10-byte buffer holding the LE IEEE-754 bits |
//! | int | tag `int`, tag `int64`, then a 10-byte zig-zag varint buffer |
//! | null | tag `nil` |
//!
//! Tags are themselves hashed as strings.

use crate::CryptoError;
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

/// SHA-256 output (256-bit).
pub type Hash = [u8; 32];

/// Width of the scalar buffers (maximum varint length of a 64-bit value).
const SCALAR_BUFFER_LEN: usize = 10;

/// Stateful structured hasher.
pub struct StructuredHasher {
    inner: Sha256,
}

impl StructuredHasher {
    /// Create new hasher.
    pub fn new() -> Self {
        Self {
            inner: Sha256::new(),
        }
    }

    /// Feed a JSON value.
    pub fn update(&mut self, value: &Value) -> Result<&mut Self, CryptoError> {
        match value {
            Value::Null => self.string("nil"),
            Value::Bool(flag) => {
                self.string("bool");
                self.int(i64::from(*flag));
            }
            Value::Number(number) => {
                let float = number
                    .as_f64()
                    .ok_or_else(|| CryptoError::InvalidInput(format!("number {number}")))?;
                self.float64(float);
            }
            Value::String(text) => self.string(text),
            Value::Array(items) => {
                self.string("list");
                for (index, item) in items.iter().enumerate() {
                    let index = i64::try_from(index)
                        .map_err(|_| CryptoError::InvalidInput("list too long".into()))?;
                    self.int(index);
                    self.update(item)?;
                }
            }
            Value::Object(map) => {
                self.string("map");
                let mut keys: Vec<&String> = map.keys().collect();
                keys.sort();
                for key in keys {
                    self.string(key);
                    self.update(&map[key])?;
                }
            }
        }
        Ok(self)
    }

    /// Finalize and return hash.
    pub fn finalize(self) -> Hash {
        self.inner.finalize().into()
    }

    fn string(&mut self, text: &str) {
        self.inner.update(b"string");
        self.inner.update(text.as_bytes());
    }

    fn int(&mut self, value: i64) {
        self.string("int");
        self.int64(value);
    }

    fn int64(&mut self, value: i64) {
        self.string("int64");
        self.inner.update(zigzag_varint(value));
    }

    fn float64(&mut self, value: f64) {
        self.string("float64");
        let mut buffer = [0u8; SCALAR_BUFFER_LEN];
        buffer[..8].copy_from_slice(&value.to_bits().to_le_bytes());
        self.inner.update(buffer);
    }
}

impl Default for StructuredHasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Signed varint in a zero-padded fixed-width buffer.
fn zigzag_varint(value: i64) -> [u8; SCALAR_BUFFER_LEN] {
    let mut encoded = (value as u64) << 1;
    if value < 0 {
        encoded = !encoded;
    }
    let mut buffer = [0u8; SCALAR_BUFFER_LEN];
    let mut position = 0;
    while encoded >= 0x80 {
        buffer[position] = (encoded as u8) | 0x80;
        encoded >>= 7;
        position += 1;
    }
    buffer[position] = encoded as u8;
    buffer
}

/// Canonical hash of a JSON value (one-shot).
pub fn structured_hash(value: &Value) -> Result<Hash, CryptoError> {
    let mut hasher = StructuredHasher::new();
    hasher.update(value)?;
    Ok(hasher.finalize())
}

/// Canonical hash of any serializable value, taken over its JSON form.
pub fn structured_hash_of<T: Serialize>(value: &T) -> Result<Hash, CryptoError> {
    let value = serde_json::to_value(value).map_err(|e| CryptoError::InvalidInput(e.to_string()))?;
    structured_hash(&value)
}

/// Hex-encoded canonical hash.
pub fn structured_hash_hex<T: Serialize>(value: &T) -> Result<String, CryptoError> {
    structured_hash_of(value).map(hex::encode)
}

/// Plain SHA-256.
pub fn sha256(data: &[u8]) -> Hash {
    Sha256::digest(data).into()
}
