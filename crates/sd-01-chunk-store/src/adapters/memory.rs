use crate::domain::StoreError;
use crate::ports::outbound::AppendLog;
use parking_lot::Mutex;
use std::sync::Arc;

/// In-memory append log for testing.
///
/// Clones share the same buffer, standing in for several processes that
/// append to one file.
#[derive(Clone, Default)]
pub struct MemoryLog {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append raw bytes, bypassing the chunk codec.
    pub fn append_raw(&self, bytes: &[u8]) {
        self.bytes.lock().extend_from_slice(bytes);
    }

    /// Current log length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AppendLog for MemoryLog {
    fn open(&mut self) -> Result<(), StoreError> {
        Ok(())
    }

    fn append(&mut self, bytes: &[u8]) -> Result<(), StoreError> {
        self.append_raw(bytes);
        Ok(())
    }

    fn sync(&mut self) -> Result<(), StoreError> {
        Ok(())
    }

    fn read_from(&mut self, offset: u64) -> Result<Vec<u8>, StoreError> {
        let bytes = self.bytes.lock();
        let start = usize::try_from(offset).map_err(|_| StoreError::IOError {
            message: format!("offset {offset} out of range"),
        })?;
        Ok(bytes.get(start..).map(<[u8]>::to_vec).unwrap_or_default())
    }
}
