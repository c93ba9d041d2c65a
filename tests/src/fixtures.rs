//! # Deployment Fixtures
//!
//! A `Deployment` is what an operator of the directory would put on disk:
//! CA certificates, a configuration pointing at them, and the shared log.

use anyhow::{Context, Result};
use sd_02_record_directory::test_utils::{TestOperator, TestPki};
use sd_02_record_directory::{DirectoryConfig, RecordDirectory};
use std::path::PathBuf;
use std::sync::Once;
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();

/// Install a test subscriber honouring `RUST_LOG`, once per process.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    });
}

/// Throwaway CA and directory files under a temporary directory.
pub struct Deployment {
    pub pki: TestPki,
    pub config: DirectoryConfig,
    dir: TempDir,
}

impl Deployment {
    /// Root and intermediate CA on disk, log not created yet.
    pub fn new() -> Result<Self> {
        init_tracing();
        let dir = TempDir::new().context("temp dir")?;
        let pki = TestPki::new();

        let root = dir.path().join("ca/root.crt");
        let intermediate = dir.path().join("ca/intermediate.crt");
        std::fs::create_dir_all(dir.path().join("ca"))?;
        std::fs::write(&root, pki.root_pem())?;
        std::fs::write(&intermediate, pki.intermediate_pem())?;

        let config = DirectoryConfig {
            database_file: dir.path().join("db/records.sd"),
            ca_certificate_files: vec![root],
            ca_intermediate_certificate_files: vec![intermediate],
            ..DirectoryConfig::default()
        };
        Ok(Self { pki, config, dir })
    }

    /// A directory process over the deployment's log.
    pub fn open(&self) -> Result<RecordDirectory> {
        RecordDirectory::open(&self.config).context("open directory")
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    /// Write `operator`'s key and certificate next to the CA files.
    pub fn write_credentials(&self, operator: &TestOperator) -> Result<(PathBuf, PathBuf)> {
        let key = self.path(&format!("{}.key", operator.name));
        let certificate = self.path(&format!("{}.crt", operator.name));
        std::fs::write(&key, &operator.key_pem)?;
        std::fs::write(&certificate, &operator.certificate_pem)?;
        Ok((key, certificate))
    }
}
