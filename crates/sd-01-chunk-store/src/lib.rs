//! # Chunk Store (sd-01)
//!
//! Append-only log of opaque entries, shared by every directory process that
//! opens the same file.
//!
//! ## Concurrency Model
//!
//! There is no cross-process lock. Each entry is split into chunks no larger
//! than `buffer_size`, and each chunk is appended with a single write, which
//! POSIX file systems apply atomically for sizes below `PIPE_BUF`. Concurrent
//! writers may therefore interleave their chunks but never corrupt one
//! another's chunk framing. Readers regroup chunks by their random group ID.
//!
//! ```text
//! writer A ──[A0][A1][A2]──┐
//!                          ├──→ [A0][B0][A1][B1][A2] ──→ reader ──→ A, B
//! writer B ──[B0][B1]──────┘
//! ```
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Description |
//! |----|-----------|-------------|
//! | 1 | Bounded Chunks | Every serialized chunk fits in `buffer_size` bytes |
//! | 2 | Append Only | Written bytes are never rewritten or removed |
//! | 3 | Exactly Once | Each entry is returned by exactly one `read` per store |
//! | 4 | Transactional Read | A failed `read` leaves cursor and pending chunks untouched |
//!
//! Network file systems without atomic appends are not supported.
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Entry and chunk codecs, reassembly, configuration
//! - `ports/` - `DataStore` (inbound) and `AppendLog` (outbound)
//! - `adapters/` - `FileLog`, `MemoryLog`
//! - `service.rs` - `ChunkStore`, the `DataStore` implementation
//!
//! ## Usage
//!
//! ```ignore
//! use sd_01_chunk_store::{ChunkStoreConfig, DataEntry, DataStore, FileDataStore};
//!
//! let mut store = FileDataStore::new("/var/lib/sd/records.sd", ChunkStoreConfig::default());
//! store.init()?;
//! store.write(&DataEntry::new(1, b"payload".to_vec()))?;
//! let entries = store.read()?;
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{FileLog, MemoryLog};
pub use domain::{ChunkStoreConfig, DataChunk, DataEntry, StoreError};
pub use ports::inbound::DataStore;
pub use ports::outbound::AppendLog;
pub use service::{ChunkStore, FileDataStore, InMemoryDataStore};
