//! # Inbound Ports (Driving Ports)
//!
//! The store API offered to the record directory.

use crate::domain::{DataEntry, StoreError};

/// Append-only store of opaque entries with a forward-only read cursor.
pub trait DataStore: Send {
    /// Prepare the backing log. Must be called before `write` or `read`.
    fn init(&mut self) -> Result<(), StoreError>;

    /// Append one entry. Every chunk of the entry is durable on success.
    fn write(&mut self, entry: &DataEntry) -> Result<(), StoreError>;

    /// Return the entries completed since the previous call, in log order.
    ///
    /// Entries already returned are never returned again. On error the read
    /// cursor does not move, so a later call retries the same bytes.
    fn read(&mut self) -> Result<Vec<DataEntry>, StoreError>;
}

impl<T: DataStore + ?Sized> DataStore for Box<T> {
    fn init(&mut self) -> Result<(), StoreError> {
        (**self).init()
    }

    fn write(&mut self, entry: &DataEntry) -> Result<(), StoreError> {
        (**self).write(entry)
    }

    fn read(&mut self) -> Result<Vec<DataEntry>, StoreError> {
        (**self).read()
    }
}
