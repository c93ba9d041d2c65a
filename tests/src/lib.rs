//! # Service Directory Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # On-disk deployments with a throwaway CA
//! └── integration/      # Cross-crate flows
//!     ├── file_directory.rs
//!     ├── shared_log.rs
//!     └── concurrent_writers.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p sd-tests
//! cargo test -p sd-tests integration::shared_log::
//!
//! # Benchmarks
//! cargo bench -p sd-tests
//! ```

pub mod fixtures;
pub mod integration;
