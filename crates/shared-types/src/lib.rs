//! # Shared Types Crate
//!
//! Record and directory types exchanged between operators and the service
//! directory.
//!
//! ## Design Principles
//!
//! - **Wire Compatibility**: Field names follow the JSON shape every operator
//!   produces (`record`, `parent_hash`, `hash`, `signature.{r,s,c}`).
//! - **Records Are Immutable**: A `SignedChangeRecord` is never mutated once
//!   signed; the directory only accepts or rejects it.
//! - **Projection Is Derived**: `DirectoryEntry` values are rebuilt from the
//!   winning chain and never written directly.

pub mod directory;
pub mod entities;

pub use directory::{DirectoryEntry, DirectoryQuery};
pub use entities::*;
