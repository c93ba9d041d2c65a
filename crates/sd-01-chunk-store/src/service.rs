//! # Chunk Store Service
//!
//! Wires the chunk codec to an `AppendLog` and implements `DataStore`.
//!
//! ## Read Cursor
//!
//! The store remembers how many log bytes it has consumed. A read decodes
//! everything after that offset, hands the chunks to the assembler, and only
//! then advances the offset. Chunks of entries that are not complete yet stay
//! in the assembler until a later read completes them.

use crate::adapters::{FileLog, MemoryLog};
use crate::domain::{decode_chunks, split, ChunkAssembler, ChunkStoreConfig, DataEntry, StoreError};
use crate::ports::inbound::DataStore;
use crate::ports::outbound::AppendLog;
use std::path::Path;
use tracing::debug;

/// Chunked store over any append log.
pub struct ChunkStore<L: AppendLog> {
    log: L,
    config: ChunkStoreConfig,
    read_offset: u64,
    assembler: ChunkAssembler,
    initialized: bool,
}

/// Chunk store persisted to a file.
pub type FileDataStore = ChunkStore<FileLog>;

/// Chunk store over an in-memory log.
pub type InMemoryDataStore = ChunkStore<MemoryLog>;

impl<L: AppendLog> ChunkStore<L> {
    /// Create a store over `log`. Call `init` before use.
    pub fn with_log(log: L, config: ChunkStoreConfig) -> Self {
        Self {
            log,
            config,
            read_offset: 0,
            assembler: ChunkAssembler::new(),
            initialized: false,
        }
    }

    pub fn config(&self) -> &ChunkStoreConfig {
        &self.config
    }

    /// Log bytes consumed by reads so far.
    pub fn read_offset(&self) -> u64 {
        self.read_offset
    }

    /// Chunks held for entries that are not complete yet.
    pub fn pending_chunks(&self) -> usize {
        self.assembler.pending_chunks()
    }

    fn ensure_initialized(&self) -> Result<(), StoreError> {
        if self.initialized {
            Ok(())
        } else {
            Err(StoreError::NotInitialized)
        }
    }
}

impl FileDataStore {
    /// Store backed by the file at `path`.
    pub fn new<P: AsRef<Path>>(path: P, config: ChunkStoreConfig) -> Self {
        Self::with_log(FileLog::new(path), config)
    }

    pub fn path(&self) -> &Path {
        self.log.path()
    }
}

impl InMemoryDataStore {
    /// Store over a fresh in-memory log.
    pub fn new_in_memory(config: ChunkStoreConfig) -> Self {
        Self::with_log(MemoryLog::new(), config)
    }

    /// Another store over the same log, with its own read cursor, as a
    /// second process opening the same file would have.
    pub fn attach(&self) -> Self {
        Self::with_log(self.log.clone(), self.config)
    }

    /// The shared log.
    pub fn log(&self) -> &MemoryLog {
        &self.log
    }
}

impl<L: AppendLog> DataStore for ChunkStore<L> {
    fn init(&mut self) -> Result<(), StoreError> {
        self.config.validate()?;
        self.log.open()?;
        self.initialized = true;
        Ok(())
    }

    fn write(&mut self, entry: &DataEntry) -> Result<(), StoreError> {
        self.ensure_initialized()?;
        let chunks = split(entry, &self.config)?;
        for chunk in &chunks {
            // One append per chunk keeps each write within the atomic limit
            self.log.append(&chunk.encode()?)?;
        }
        self.log.sync()
    }

    fn read(&mut self) -> Result<Vec<DataEntry>, StoreError> {
        self.ensure_initialized()?;
        let bytes = self.log.read_from(self.read_offset)?;
        if bytes.is_empty() {
            return Ok(Vec::new());
        }

        let chunks = decode_chunks(&bytes)?;
        let chunk_count = chunks.len();
        let entries = self.assembler.reassemble(chunks)?;
        self.read_offset += bytes.len() as u64;

        debug!(
            "[sd-01] Read {} bytes: {} chunks, {} entries, {} chunks pending",
            bytes.len(),
            chunk_count,
            entries.len(),
            self.assembler.pending_chunks()
        );
        Ok(entries)
    }
}
