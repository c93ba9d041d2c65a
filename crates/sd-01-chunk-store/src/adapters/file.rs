use crate::domain::StoreError;
use crate::ports::outbound::AppendLog;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// File-backed append log.
///
/// The writer handle is opened with `O_APPEND`, so each `append` lands at
/// the current end of the file even when other processes append to it too.
/// Reads go through a separate handle.
pub struct FileLog {
    path: PathBuf,
    writer: Option<File>,
    reader: Option<File>,
}

impl FileLog {
    /// Create a log for `path`. Nothing is opened until `open`.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            writer: None,
            reader: None,
        }
    }

    /// Location of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append_options() -> OpenOptions {
        let mut options = OpenOptions::new();
        options.create(true).append(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o700);
        }
        options
    }
}

impl AppendLog for FileLog {
    fn open(&mut self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let writer = Self::append_options().open(&self.path)?;
        let reader = File::open(&self.path)?;

        let len = writer.metadata()?.len();
        if len > 0 {
            info!(
                "[sd-01] 💾 Found existing log file: {} ({} bytes)",
                self.path.display(),
                len
            );
        } else {
            info!("[sd-01] 📁 New log file at {}", self.path.display());
        }

        self.writer = Some(writer);
        self.reader = Some(reader);
        Ok(())
    }

    fn append(&mut self, bytes: &[u8]) -> Result<(), StoreError> {
        let writer = self.writer.as_mut().ok_or(StoreError::NotInitialized)?;
        writer.write_all(bytes)?;
        Ok(())
    }

    fn sync(&mut self) -> Result<(), StoreError> {
        let writer = self.writer.as_mut().ok_or(StoreError::NotInitialized)?;
        writer.sync_all()?;
        Ok(())
    }

    fn read_from(&mut self, offset: u64) -> Result<Vec<u8>, StoreError> {
        let reader = self.reader.as_mut().ok_or(StoreError::NotInitialized)?;
        reader.seek(SeekFrom::Start(offset))?;
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}
