//! # Store Configuration

use super::chunk::CHUNK_HEADER_SIZE;
use super::errors::StoreError;
use serde::{Deserialize, Serialize};

/// Default bound on one serialized chunk, below `PIPE_BUF` on every POSIX
/// platform so that a single append stays atomic.
pub const DEFAULT_BUFFER_SIZE: usize = 255;

/// Configuration for the chunked log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkStoreConfig {
    /// Upper bound, in bytes, of one serialized chunk (header included).
    ///
    /// Every process appending to the same log must use a value within the
    /// platform's atomic-append limit.
    pub buffer_size: usize,
}

impl ChunkStoreConfig {
    /// Payload bytes carried by one chunk.
    pub fn effective_payload(&self) -> usize {
        self.buffer_size.saturating_sub(CHUNK_HEADER_SIZE)
    }

    /// Check that a chunk can carry at least one payload byte and that the
    /// payload length fits the 16-bit length prefix.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.buffer_size <= CHUNK_HEADER_SIZE {
            return Err(StoreError::InvalidConfig(format!(
                "buffer_size {} must exceed the {CHUNK_HEADER_SIZE}-byte chunk header",
                self.buffer_size
            )));
        }
        if self.effective_payload() > usize::from(u16::MAX) {
            return Err(StoreError::InvalidConfig(format!(
                "buffer_size {} exceeds the maximum chunk payload",
                self.buffer_size
            )));
        }
        Ok(())
    }
}

impl Default for ChunkStoreConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_payload() {
        let config = ChunkStoreConfig::default();
        assert_eq!(config.buffer_size, 255);
        assert_eq!(config.effective_payload(), 230);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_bounds() {
        assert!(ChunkStoreConfig { buffer_size: 25 }.validate().is_err());
        assert!(ChunkStoreConfig { buffer_size: 26 }.validate().is_ok());
        assert!(ChunkStoreConfig {
            buffer_size: CHUNK_HEADER_SIZE + 65_536
        }
        .validate()
        .is_err());
    }

    #[test]
    fn test_deserialize_defaults() {
        let config: ChunkStoreConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ChunkStoreConfig::default());

        let config: ChunkStoreConfig = serde_json::from_str(r#"{"buffer_size": 512}"#).unwrap();
        assert_eq!(config.effective_payload(), 487);
    }
}
