//! # Inbound Ports (Driving Ports)
//!
//! The API the directory offers to RPC handlers and operators.

use crate::domain::errors::DirectoryError;
use shared_types::{DirectoryEntry, DirectoryQuery, SignedChangeRecord};

/// Primary API of the service directory.
///
/// Every call is serialized by the directory's lock. Read accessors return
/// snapshots of the projection built by the last successful update and never
/// fail on account of bad records in the log.
pub trait ServiceDirectoryApi: Send + Sync {
    /// Submit a batch of signed records, in order.
    ///
    /// ## Errors
    ///
    /// - `Conflict`: parent is not the current tip, new root without
    ///   `sd-admin`, or record already present
    /// - `Permission`: signer may not write the record's section
    /// - `Crypto`: hash, certificate or signature invalid
    /// - `Consistency`: an accepted record is missing from the recomputed chain
    /// - `Io` / `Protocol` / `Decode`: refreshing from the log failed
    ///
    /// Records of the batch written before the failing one stay written.
    fn append(&self, records: Vec<SignedChangeRecord>) -> Result<(), DirectoryError>;

    /// Read new log entries and recompute the winning chain and projection.
    fn update(&self) -> Result<(), DirectoryError>;

    /// Entry of operator `name`.
    fn entry(&self, name: &str) -> Option<DirectoryEntry>;

    /// All entries, ordered by name.
    fn all_entries(&self) -> Vec<DirectoryEntry>;

    /// Entries matching `query`, ordered by name.
    fn entries(&self, query: &DirectoryQuery) -> Vec<DirectoryEntry>;

    /// Records of the winning chain after the one hashed `after`; the whole
    /// chain if no record matches.
    fn records(&self, after: &str) -> Vec<SignedChangeRecord>;

    /// Last record of the winning chain.
    fn tip(&self) -> Option<SignedChangeRecord>;
}
