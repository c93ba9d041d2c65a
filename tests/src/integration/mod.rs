//! # Integration Flows
//!
//! - `file_directory` - Directories opened from configuration on real files
//! - `shared_log` - Several writers appending to one chunked log
//! - `concurrent_writers` - Threads and processes racing on one directory

pub mod concurrent_writers;
pub mod file_directory;
pub mod shared_log;
