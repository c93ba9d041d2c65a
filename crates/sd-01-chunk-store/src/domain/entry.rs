//! # Data Entries
//!
//! A `DataEntry` is one logical record of the log. Its byte layout is:
//!
//! ```text
//! [version:1][type:1][idLen:u16-LE][id][data]
//! ```

use super::errors::StoreError;
use rand::RngCore;

/// Version byte of the entry layout.
pub const ENTRY_VERSION: u8 = 1;

/// Length of generated entry IDs.
pub const ENTRY_ID_LENGTH: usize = 16;

const ENTRY_HEADER_SIZE: usize = 4;

/// One logical, opaque log record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataEntry {
    pub entry_type: u8,
    pub id: Vec<u8>,
    pub data: Vec<u8>,
}

impl DataEntry {
    /// Create an entry with a random 16-byte ID.
    pub fn new(entry_type: u8, data: Vec<u8>) -> Self {
        let mut id = vec![0u8; ENTRY_ID_LENGTH];
        rand::thread_rng().fill_bytes(&mut id);
        Self {
            entry_type,
            id,
            data,
        }
    }

    /// Serialize to the entry layout.
    pub fn encode(&self) -> Result<Vec<u8>, StoreError> {
        let id_len = u16::try_from(self.id.len()).map_err(|_| StoreError::FieldTooLong {
            field: "entry ID",
            len: self.id.len(),
        })?;

        let mut bytes = Vec::with_capacity(ENTRY_HEADER_SIZE + self.id.len() + self.data.len());
        bytes.push(ENTRY_VERSION);
        bytes.push(self.entry_type);
        bytes.extend_from_slice(&id_len.to_le_bytes());
        bytes.extend_from_slice(&self.id);
        bytes.extend_from_slice(&self.data);
        Ok(bytes)
    }

    /// Parse the entry layout. Everything after the ID is data.
    pub fn decode(bytes: &[u8]) -> Result<Self, StoreError> {
        if bytes.len() < ENTRY_HEADER_SIZE {
            return Err(StoreError::Truncated {
                what: "entry header",
                needed: ENTRY_HEADER_SIZE,
                available: bytes.len(),
            });
        }
        if bytes[0] != ENTRY_VERSION {
            return Err(StoreError::UnknownVersion {
                kind: "entry",
                version: bytes[0],
            });
        }

        let id_len = usize::from(u16::from_le_bytes([bytes[2], bytes[3]]));
        let id_end = ENTRY_HEADER_SIZE + id_len;
        if bytes.len() < id_end {
            return Err(StoreError::Truncated {
                what: "entry ID",
                needed: id_end,
                available: bytes.len(),
            });
        }

        Ok(Self {
            entry_type: bytes[1],
            id: bytes[ENTRY_HEADER_SIZE..id_end].to_vec(),
            data: bytes[id_end..].to_vec(),
        })
    }
}
