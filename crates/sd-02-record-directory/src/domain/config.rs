//! # Directory Configuration
//!
//! Loaded from JSON, then overridden from the environment:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `SD_DATABASE_FILE` | `database_file` |
//! | `SD_CA_CERTIFICATE_FILES` | `ca_certificate_files` (comma-separated) |
//! | `SD_CA_INTERMEDIATE_CERTIFICATE_FILES` | `ca_intermediate_certificate_files` (comma-separated) |

use super::errors::DirectoryError;
use sd_01_chunk_store::ChunkStoreConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const ENV_DATABASE_FILE: &str = "SD_DATABASE_FILE";
pub const ENV_CA_CERTIFICATE_FILES: &str = "SD_CA_CERTIFICATE_FILES";
pub const ENV_CA_INTERMEDIATE_CERTIFICATE_FILES: &str = "SD_CA_INTERMEDIATE_CERTIFICATE_FILES";

/// Record directory configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// Chunked log shared by every directory process.
    pub database_file: PathBuf,
    /// Root CA certificates (PEM) signers must chain to.
    pub ca_certificate_files: Vec<PathBuf>,
    /// Intermediate CA certificates (PEM) allowed in a signer's chain.
    pub ca_intermediate_certificate_files: Vec<PathBuf>,
    pub chunk_store: ChunkStoreConfig,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            database_file: PathBuf::from("./data/sd/records.sd"),
            ca_certificate_files: Vec::new(),
            ca_intermediate_certificate_files: Vec::new(),
            chunk_store: ChunkStoreConfig::default(),
        }
    }
}

impl DirectoryConfig {
    /// Load a JSON configuration file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, DirectoryError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| DirectoryError::Config(format!("{}: {e}", path.display())))?;
        serde_json::from_str(&raw)
            .map_err(|e| DirectoryError::Config(format!("{}: {e}", path.display())))
    }

    /// Override fields from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Override fields from `lookup`, which maps variable names to values.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(file) = lookup(ENV_DATABASE_FILE) {
            if file.trim().is_empty() {
                warn!("[sd-02] {ENV_DATABASE_FILE} is empty, keeping {}", self.database_file.display());
            } else {
                self.database_file = PathBuf::from(file.trim());
                info!("[sd-02] Database file set from environment");
            }
        }
        if let Some(files) = lookup(ENV_CA_CERTIFICATE_FILES) {
            self.ca_certificate_files = split_paths(&files);
        }
        if let Some(files) = lookup(ENV_CA_INTERMEDIATE_CERTIFICATE_FILES) {
            self.ca_intermediate_certificate_files = split_paths(&files);
        }
    }

    /// Check the configuration can be used to open a directory.
    pub fn validate(&self) -> Result<(), DirectoryError> {
        if self.ca_certificate_files.is_empty() {
            return Err(DirectoryError::Config(
                "at least one CA certificate file is required".into(),
            ));
        }
        if self.database_file.as_os_str().is_empty() {
            return Err(DirectoryError::Config("database_file is empty".into()));
        }
        self.chunk_store
            .validate()
            .map_err(|e| DirectoryError::Config(e.to_string()))
    }
}

fn split_paths(list: &str) -> Vec<PathBuf> {
    list.split(',')
        .map(str::trim)
        .filter(|path| !path.is_empty())
        .map(PathBuf::from)
        .collect()
}
