//! # Domain Layer
//!
//! Pure codec and reassembly logic for the chunked log. No I/O.
//!
//! ## Modules
//!
//! - `entry` - `DataEntry` and its byte layout
//! - `chunk` - `DataChunk`, its byte layout, and splitting entries into chunks
//! - `reassembly` - Rebuilding entries from interleaved chunks
//! - `config` - `ChunkStoreConfig`
//! - `errors` - Domain error types

pub mod chunk;
pub mod config;
pub mod entry;
pub mod errors;
pub mod reassembly;

pub use chunk::{decode_chunks, split, DataChunk, CHUNK_HEADER_SIZE, CHUNK_ID_LENGTH, CHUNK_VERSION};
pub use config::ChunkStoreConfig;
pub use entry::{DataEntry, ENTRY_VERSION};
pub use errors::StoreError;
pub use reassembly::ChunkAssembler;
