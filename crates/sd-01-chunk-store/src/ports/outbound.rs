//! # Outbound Ports (Driven Ports)
//!
//! The physical byte log the store appends chunks to.
//!
//! Production: `FileLog` (adapters/file.rs)
//! Testing: `MemoryLog` (adapters/memory.rs)

use crate::domain::StoreError;

/// A shared, growing byte log.
pub trait AppendLog: Send {
    /// Open or create the log.
    fn open(&mut self) -> Result<(), StoreError>;

    /// Append `bytes` with a single write. Callers keep `bytes` within the
    /// platform's atomic-append limit.
    fn append(&mut self, bytes: &[u8]) -> Result<(), StoreError>;

    /// Flush appended bytes to durable storage.
    fn sync(&mut self) -> Result<(), StoreError>;

    /// All bytes from `offset` to the current end of the log.
    fn read_from(&mut self, offset: u64) -> Result<Vec<u8>, StoreError>;
}
