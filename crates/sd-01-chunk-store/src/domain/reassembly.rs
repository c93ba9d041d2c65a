//! # Entry Reassembly
//!
//! Rebuilds entries from chunks that may arrive interleaved with chunks of
//! other entries (concurrent writers) or spread over several reads (an entry
//! still being written). Each writer appends its chunks in index order, but
//! the reassembler does not rely on it.
//!
//! ## Ordering
//!
//! Entries are returned in the order their first chunk was seen. Groups left
//! incomplete by an earlier call come first.
//!
//! ## Malformed Groups
//!
//! A repeated chunk index or a group declaring two different chunk counts is
//! a protocol error. The group is never skipped, so a reader stops at it
//! until the log is repaired.

use super::chunk::DataChunk;
use super::entry::DataEntry;
use super::errors::StoreError;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Chunks collected so far for one group ID.
#[derive(Debug, Clone)]
struct PendingGroup {
    id: Vec<u8>,
    chunks: u16,
    parts: BTreeMap<u16, Vec<u8>>,
}

impl PendingGroup {
    fn new(chunk: &DataChunk) -> Self {
        Self {
            id: chunk.id.clone(),
            chunks: chunk.chunks,
            parts: BTreeMap::new(),
        }
    }

    fn add(&mut self, chunk: DataChunk) -> Result<(), StoreError> {
        if chunk.chunks != self.chunks {
            return Err(StoreError::InvalidChunk(format!(
                "group declares both {} and {} chunks",
                self.chunks, chunk.chunks
            )));
        }
        if self.parts.contains_key(&chunk.index) {
            return Err(StoreError::InvalidChunk(format!(
                "duplicate chunk index {}",
                chunk.index
            )));
        }
        self.parts.insert(chunk.index, chunk.data);
        Ok(())
    }

    /// Indices are unique and below `chunks`, so a full count means
    /// `0..chunks` are all present.
    fn is_complete(&self) -> bool {
        self.parts.len() == usize::from(self.chunks)
    }

    fn chunk_count(&self) -> usize {
        self.parts.len()
    }

    fn into_entry(self) -> Result<DataEntry, StoreError> {
        let bytes: Vec<u8> = self.parts.into_values().flatten().collect();
        DataEntry::decode(&bytes)
    }
}

/// Stateful reassembler carrying incomplete groups across reads.
#[derive(Debug, Clone, Default)]
pub struct ChunkAssembler {
    pending: Vec<PendingGroup>,
}

impl ChunkAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed newly read chunks and return every entry completed by them.
    ///
    /// On error the assembler is left exactly as it was before the call.
    pub fn reassemble(&mut self, chunks: Vec<DataChunk>) -> Result<Vec<DataEntry>, StoreError> {
        let mut groups = self.pending.clone();
        let mut positions: HashMap<Vec<u8>, usize> = groups
            .iter()
            .enumerate()
            .map(|(position, group)| (group.id.clone(), position))
            .collect();

        for chunk in chunks {
            let position = *positions.entry(chunk.id.clone()).or_insert_with(|| {
                groups.push(PendingGroup::new(&chunk));
                groups.len() - 1
            });
            groups[position].add(chunk)?;
        }

        let mut entries = Vec::new();
        let mut remaining = Vec::new();
        for group in groups {
            if group.is_complete() {
                entries.push(group.into_entry()?);
            } else {
                remaining.push(group);
            }
        }

        self.pending = remaining;
        debug!(
            "[sd-01] Found {} entries, {} remaining chunks",
            entries.len(),
            self.pending_chunks()
        );
        Ok(entries)
    }

    /// Groups still waiting for chunks.
    pub fn pending_groups(&self) -> usize {
        self.pending.len()
    }

    /// Chunks held for incomplete groups.
    pub fn pending_chunks(&self) -> usize {
        self.pending.iter().map(PendingGroup::chunk_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chunk::{decode_chunks, split};
    use crate::domain::config::ChunkStoreConfig;
    use proptest::prelude::*;

    fn small_config() -> ChunkStoreConfig {
        // 5 payload bytes per chunk
        ChunkStoreConfig { buffer_size: 30 }
    }

    fn entry(text: &str) -> DataEntry {
        DataEntry::new(1, text.as_bytes().to_vec())
    }

    #[test]
    fn test_single_entry() {
        let original = entry("hello world, this spans chunks");
        let chunks = split(&original, &small_config()).unwrap();
        assert!(chunks.len() > 1);

        let mut assembler = ChunkAssembler::new();
        let entries = assembler.reassemble(chunks).unwrap();

        assert_eq!(entries, vec![original]);
        assert_eq!(assembler.pending_groups(), 0);
    }

    #[test]
    fn test_interleaved_entries_keep_first_seen_order() {
        let a = entry("first entry from writer one");
        let b = entry("second entry from writer two");
        let a_chunks = split(&a, &small_config()).unwrap();
        let b_chunks = split(&b, &small_config()).unwrap();

        // b starts first, then the two writers alternate
        let mut mixed = Vec::new();
        let mut a_iter = a_chunks.into_iter();
        let mut b_iter = b_chunks.into_iter();
        loop {
            let next_b = b_iter.next();
            let next_a = a_iter.next();
            if next_a.is_none() && next_b.is_none() {
                break;
            }
            mixed.extend(next_b);
            mixed.extend(next_a);
        }

        let entries = ChunkAssembler::new().reassemble(mixed).unwrap();
        assert_eq!(entries, vec![b, a]);
    }

    #[test]
    fn test_incomplete_group_deferred() {
        let a = entry("an entry that is split over two reads");
        let b = entry("complete");
        let mut a_chunks = split(&a, &small_config()).unwrap();
        let tail = a_chunks.split_off(2);
        let b_chunks = split(&b, &small_config()).unwrap();

        let mut assembler = ChunkAssembler::new();
        let mut first = a_chunks;
        first.extend(b_chunks);

        let entries = assembler.reassemble(first).unwrap();
        assert_eq!(entries, vec![b]);
        assert_eq!(assembler.pending_groups(), 1);
        assert_eq!(assembler.pending_chunks(), 2);

        let entries = assembler.reassemble(tail).unwrap();
        assert_eq!(entries, vec![a]);
        assert_eq!(assembler.pending_groups(), 0);
    }

    #[test]
    fn test_pending_groups_precede_new_ones() {
        let a = entry("started earlier, finished later");
        let b = entry("new one");
        let mut a_chunks = split(&a, &small_config()).unwrap();
        let a_tail = a_chunks.split_off(1);

        let mut assembler = ChunkAssembler::new();
        assert!(assembler.reassemble(a_chunks).unwrap().is_empty());

        let mut next = split(&b, &small_config()).unwrap();
        next.extend(a_tail);
        assert_eq!(assembler.reassemble(next).unwrap(), vec![a, b]);
    }

    #[test]
    fn test_out_of_order_chunks() {
        let original = entry("reversed chunk order still works");
        let mut chunks = split(&original, &small_config()).unwrap();
        chunks.reverse();

        assert_eq!(
            ChunkAssembler::new().reassemble(chunks).unwrap(),
            vec![original]
        );
    }

    #[test]
    fn test_duplicate_index_rejected_without_state_change() {
        let a = entry("duplicate chunk somewhere in here");
        let chunks = split(&a, &small_config()).unwrap();

        let mut assembler = ChunkAssembler::new();
        assembler.reassemble(vec![chunks[0].clone()]).unwrap();
        assert_eq!(assembler.pending_chunks(), 1);

        let result = assembler.reassemble(vec![chunks[1].clone(), chunks[0].clone()]);
        assert!(matches!(result, Err(StoreError::InvalidChunk(_))));
        // Failed call did not commit chunk 1
        assert_eq!(assembler.pending_chunks(), 1);
    }

    #[test]
    fn test_inconsistent_chunk_count_rejected() {
        let a = entry("some entry with several chunks");
        let mut chunks = split(&a, &small_config()).unwrap();
        chunks[1].chunks += 1;

        let result = ChunkAssembler::new().reassemble(chunks);
        assert!(matches!(result, Err(StoreError::InvalidChunk(_))));
    }

    proptest! {
        #[test]
        fn prop_split_reassemble_roundtrip(
            entry_type in any::<u8>(),
            id in proptest::collection::vec(any::<u8>(), 0..64),
            data in proptest::collection::vec(any::<u8>(), 0..4096),
            buffer_size in 26usize..600,
        ) {
            let config = ChunkStoreConfig { buffer_size };
            let original = DataEntry { entry_type, id, data };

            let chunks = split(&original, &config).unwrap();
            let mut bytes = Vec::new();
            for chunk in &chunks {
                let encoded = chunk.encode().unwrap();
                prop_assert!(encoded.len() <= buffer_size);
                bytes.extend(encoded);
            }

            let decoded = decode_chunks(&bytes).unwrap();
            let entries = ChunkAssembler::new().reassemble(decoded).unwrap();
            prop_assert_eq!(entries, vec![original]);
        }
    }
}
