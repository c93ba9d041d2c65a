//! # Adapters Module
//!
//! `AppendLog` implementations.
//!
//! - `file`: a file opened in append mode, shared by every process that
//!   opens the same path
//! - `memory`: an in-process byte buffer that several stores can share

mod file;
mod memory;

pub use file::FileLog;
pub use memory::MemoryLog;
