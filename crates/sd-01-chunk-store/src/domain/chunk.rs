//! # Data Chunks
//!
//! The physical unit of the log. Entries are split into chunks small enough
//! to be appended with one atomic write, so that concurrent writers can
//! interleave chunks but never bytes within a chunk.
//!
//! ```text
//! [version:1][chunks:u16-LE][index:u16-LE][idLen:u16-LE][id][dataLen:u16-LE][data]
//! ```

use super::config::ChunkStoreConfig;
use super::entry::DataEntry;
use super::errors::StoreError;
use rand::RngCore;
use tracing::debug;

/// Version byte of the chunk layout.
pub const CHUNK_VERSION: u8 = 1;

/// Length of the random group ID shared by the chunks of one entry.
pub const CHUNK_ID_LENGTH: usize = 16;

/// Fixed bytes of a chunk besides its ID and data.
const CHUNK_FRAME_SIZE: usize = 9;

/// Header bytes of a chunk carrying a standard 16-byte group ID.
pub const CHUNK_HEADER_SIZE: usize = CHUNK_FRAME_SIZE + CHUNK_ID_LENGTH;

/// One physical, atomically appended piece of an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataChunk {
    /// Number of chunks in the group.
    pub chunks: u16,
    /// Position of this chunk within the group.
    pub index: u16,
    /// Group ID shared by all chunks of one entry.
    pub id: Vec<u8>,
    pub data: Vec<u8>,
}

impl DataChunk {
    /// Serialized length.
    pub fn encoded_len(&self) -> usize {
        CHUNK_FRAME_SIZE + self.id.len() + self.data.len()
    }

    /// Serialize to the chunk layout.
    pub fn encode(&self) -> Result<Vec<u8>, StoreError> {
        let id_len = u16::try_from(self.id.len()).map_err(|_| StoreError::FieldTooLong {
            field: "chunk ID",
            len: self.id.len(),
        })?;
        let data_len = u16::try_from(self.data.len()).map_err(|_| StoreError::FieldTooLong {
            field: "chunk data",
            len: self.data.len(),
        })?;

        let mut bytes = Vec::with_capacity(self.encoded_len());
        bytes.push(CHUNK_VERSION);
        bytes.extend_from_slice(&self.chunks.to_le_bytes());
        bytes.extend_from_slice(&self.index.to_le_bytes());
        bytes.extend_from_slice(&id_len.to_le_bytes());
        bytes.extend_from_slice(&self.id);
        bytes.extend_from_slice(&data_len.to_le_bytes());
        bytes.extend_from_slice(&self.data);
        Ok(bytes)
    }

    /// Parse one chunk from the front of `bytes`, returning it with the
    /// number of bytes consumed.
    pub fn decode(bytes: &[u8]) -> Result<(Self, usize), StoreError> {
        let mut reader = Reader::new(bytes);

        let version = reader.u8("chunk version")?;
        if version != CHUNK_VERSION {
            return Err(StoreError::UnknownVersion {
                kind: "chunk",
                version,
            });
        }
        let chunks = reader.u16("chunk count")?;
        let index = reader.u16("chunk index")?;
        let id_len = reader.u16("chunk ID length")?;
        let id = reader.take(usize::from(id_len), "chunk ID")?.to_vec();
        let data_len = reader.u16("chunk data length")?;
        let data = reader.take(usize::from(data_len), "chunk data")?.to_vec();

        if chunks == 0 {
            return Err(StoreError::InvalidChunk("chunk count is zero".into()));
        }
        if index >= chunks {
            return Err(StoreError::InvalidChunk(format!(
                "index {index} out of range for {chunks} chunks"
            )));
        }

        let chunk = Self {
            chunks,
            index,
            id,
            data,
        };
        Ok((chunk, reader.position))
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    fn take(&mut self, len: usize, what: &'static str) -> Result<&'a [u8], StoreError> {
        let end = self.position + len;
        if end > self.bytes.len() {
            return Err(StoreError::Truncated {
                what,
                needed: len,
                available: self.bytes.len() - self.position,
            });
        }
        let slice = &self.bytes[self.position..end];
        self.position = end;
        Ok(slice)
    }

    fn u8(&mut self, what: &'static str) -> Result<u8, StoreError> {
        Ok(self.take(1, what)?[0])
    }

    fn u16(&mut self, what: &'static str) -> Result<u16, StoreError> {
        let bytes = self.take(2, what)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }
}

/// Parse every chunk in `bytes`. Fails on the first malformed or truncated
/// chunk; on success all bytes were consumed.
pub fn decode_chunks(bytes: &[u8]) -> Result<Vec<DataChunk>, StoreError> {
    let mut chunks = Vec::new();
    let mut offset = 0;
    while offset < bytes.len() {
        let (chunk, consumed) = DataChunk::decode(&bytes[offset..])?;
        chunks.push(chunk);
        offset += consumed;
    }
    Ok(chunks)
}

/// Split an entry into chunks of at most `config.buffer_size` serialized
/// bytes, all tagged with one fresh random group ID.
pub fn split(entry: &DataEntry, config: &ChunkStoreConfig) -> Result<Vec<DataChunk>, StoreError> {
    config.validate()?;
    let bytes = entry.encode()?;
    let payload = config.effective_payload();

    let count = bytes.len().div_ceil(payload);
    let chunks = u16::try_from(count).map_err(|_| StoreError::TooLarge {
        chunks: count,
        max: usize::from(u16::MAX),
    })?;

    let mut id = vec![0u8; CHUNK_ID_LENGTH];
    rand::thread_rng().fill_bytes(&mut id);

    let result: Vec<DataChunk> = bytes
        .chunks(payload)
        .zip(0u16..)
        .map(|(data, index)| DataChunk {
            chunks,
            index,
            id: id.clone(),
            data: data.to_vec(),
        })
        .collect();

    debug!("[sd-01] Split entry into {} chunks", result.len());
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_of(len: usize) -> DataEntry {
        DataEntry::new(1, vec![0x5A; len])
    }

    #[test]
    fn test_header_size() {
        let chunk = DataChunk {
            chunks: 1,
            index: 0,
            id: vec![0; CHUNK_ID_LENGTH],
            data: vec![],
        };
        assert_eq!(chunk.encode().unwrap().len(), CHUNK_HEADER_SIZE);
        assert_eq!(CHUNK_HEADER_SIZE, 25);
    }

    #[test]
    fn test_layout() {
        let chunk = DataChunk {
            chunks: 0x0102,
            index: 0x0001,
            id: vec![0xEE],
            data: vec![7, 8, 9],
        };

        let bytes = chunk.encode().unwrap();
        assert_eq!(
            bytes,
            vec![1, 0x02, 0x01, 0x01, 0x00, 1, 0, 0xEE, 3, 0, 7, 8, 9]
        );

        let (decoded, consumed) = DataChunk::decode(&bytes).unwrap();
        assert_eq!(decoded, chunk);
        assert_eq!(consumed, bytes.len());
    }

    #[test]
    fn test_split_respects_buffer_size() {
        let config = ChunkStoreConfig::default();
        let entry = entry_of(1000);

        let chunks = split(&entry, &config).unwrap();
        // 4 + 16 + 1000 = 1020 entry bytes over 230-byte payloads
        assert_eq!(chunks.len(), 5);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index as usize, i);
            assert_eq!(chunk.chunks, 5);
            assert_eq!(chunk.id, chunks[0].id);
            assert!(chunk.encode().unwrap().len() <= config.buffer_size);
        }
        assert_eq!(chunks[0].encode().unwrap().len(), config.buffer_size);
    }

    #[test]
    fn test_split_uses_fresh_group_id() {
        let config = ChunkStoreConfig::default();
        let entry = entry_of(10);

        let a = split(&entry, &config).unwrap();
        let b = split(&entry, &config).unwrap();

        assert_eq!(a[0].id.len(), CHUNK_ID_LENGTH);
        assert_ne!(a[0].id, b[0].id);
        assert_ne!(a[0].id, entry.id);
    }

    #[test]
    fn test_split_rejects_too_many_chunks() {
        // One payload byte per chunk
        let config = ChunkStoreConfig { buffer_size: 26 };
        let entry = entry_of(u16::MAX as usize);

        assert!(matches!(
            split(&entry, &config),
            Err(StoreError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_bad_coordinates() {
        let mut chunk = DataChunk {
            chunks: 2,
            index: 2,
            id: vec![1; 16],
            data: vec![0],
        };
        let bytes = chunk.encode().unwrap();
        assert!(matches!(
            DataChunk::decode(&bytes),
            Err(StoreError::InvalidChunk(_))
        ));

        chunk.chunks = 0;
        chunk.index = 0;
        let bytes = chunk.encode().unwrap();
        assert!(matches!(
            DataChunk::decode(&bytes),
            Err(StoreError::InvalidChunk(_))
        ));
    }

    #[test]
    fn test_decode_rejects_unknown_version() {
        let result = DataChunk::decode(&[9, 1, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(
            result,
            Err(StoreError::UnknownVersion {
                kind: "chunk",
                version: 9
            })
        );
    }

    #[test]
    fn test_decode_chunks_truncated_tail() {
        let config = ChunkStoreConfig::default();
        let chunks = split(&entry_of(300), &config).unwrap();
        let mut bytes = Vec::new();
        for chunk in &chunks {
            bytes.extend(chunk.encode().unwrap());
        }

        assert_eq!(decode_chunks(&bytes).unwrap(), chunks);

        let result = decode_chunks(&bytes[..bytes.len() - 3]);
        assert!(matches!(result, Err(StoreError::Truncated { .. })));
        assert!(result.unwrap_err().is_protocol());
    }
}
