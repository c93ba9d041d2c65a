//! # Outbound Ports (Driven Ports)
//!
//! The directory persists records through the chunk store's `DataStore`.
//!
//! Production: `FileDataStore`
//! Testing: `InMemoryDataStore`

pub use sd_01_chunk_store::DataStore;
