//! # File-Backed Directory Flows
//!
//! Directories opened through `RecordDirectory::open`, with trust anchors and
//! the log on disk, restarted between steps.

#[cfg(test)]
mod tests {
    use crate::fixtures::Deployment;
    use sd_02_record_directory::test_utils::{channels_record, signer};
    use sd_02_record_directory::{
        DirectoryConfig, DirectoryError, RecordDirectory, RecordSigner, ServiceDirectoryApi,
    };
    use serde_json::json;
    use shared_types::DirectoryQuery;
    use std::path::PathBuf;

    // =============================================================================
    // Restart
    // =============================================================================

    #[test]
    fn test_alice_flow_survives_restart() -> anyhow::Result<()> {
        let deployment = Deployment::new()?;
        let alice = deployment.pki.operator("alice", &[]);
        let (key, certificate) = deployment.write_credentials(&alice)?;
        let alice_signer = RecordSigner::from_pem_files(&key, &certificate)?;

        let first = {
            let directory = deployment.open()?;
            let records = alice_signer.sign_chain(vec![channels_record("alice", "a")], None)?;
            directory.append(records.clone())?;
            assert_eq!(directory.tip().map(|tip| tip.hash), Some(records[0].hash.clone()));
            records[0].clone()
        };

        // A restarted process rebuilds the same state from the log
        let directory = deployment.open()?;
        assert_eq!(directory.tip(), Some(first.clone()));

        let second = alice_signer.sign(channels_record("alice", "b"), &first.hash)?;
        directory.append(vec![second.clone()])?;

        let reopened = deployment.open()?;
        let entry = reopened.entry("alice").expect("alice entry");
        assert_eq!(entry.channels, vec![json!({"endpoint": "b"})]);
        assert_eq!(entry.records, vec![first, second]);
        Ok(())
    }

    #[test]
    fn test_intermediate_signed_operator() -> anyhow::Result<()> {
        let deployment = Deployment::new()?;
        let carol = deployment.pki.intermediate_operator("carol", &[]);
        let directory = deployment.open()?;

        let record = signer(&carol).sign(
            shared_types::ChangeRecord::new(
                "carol",
                "channels",
                json!([{"type": "grpc_server", "settings": {"address": "carol:5555"}}]),
            ),
            "",
        )?;
        directory.append(vec![record])?;

        let found = directory.entries(
            &DirectoryQuery::default().with_channels(vec!["grpc_server".to_string()]),
        );
        assert_eq!(found.len(), 1);
        assert_eq!(
            found[0].channel("grpc_server").expect("grpc channel")["settings"]["address"],
            "carol:5555"
        );
        Ok(())
    }

    #[test]
    fn test_without_intermediate_file_chain_is_untrusted() -> anyhow::Result<()> {
        let mut deployment = Deployment::new()?;
        deployment.config.ca_intermediate_certificate_files.clear();
        let carol = deployment.pki.intermediate_operator("carol", &[]);
        let directory = deployment.open()?;

        let record = signer(&carol).sign(channels_record("carol", "c"), "")?;
        assert!(matches!(
            directory.append(vec![record]),
            Err(DirectoryError::Crypto(_))
        ));
        Ok(())
    }

    // =============================================================================
    // Configuration
    // =============================================================================

    #[test]
    fn test_config_file_with_overrides() -> anyhow::Result<()> {
        let deployment = Deployment::new()?;
        let config_file = deployment.path("sd.json");
        std::fs::write(
            &config_file,
            serde_json::to_string(&json!({
                "database_file": "/nonexistent/records.sd",
                "chunk_store": {"buffer_size": 512}
            }))?,
        )?;

        let mut config = DirectoryConfig::from_json_file(&config_file)?;
        let database = deployment.path("override/records.sd");
        let root = deployment.config.ca_certificate_files[0].clone();
        config.apply_overrides_from(|key| match key {
            "SD_DATABASE_FILE" => Some(database.display().to_string()),
            "SD_CA_CERTIFICATE_FILES" => Some(root.display().to_string()),
            _ => None,
        });

        let directory = RecordDirectory::open(&config)?;
        let alice = deployment.pki.operator("alice", &[]);
        directory.append(vec![signer(&alice).sign(channels_record("alice", "a"), "")?])?;

        assert!(database.exists());
        assert_eq!(config.chunk_store.buffer_size, 512);
        Ok(())
    }

    #[test]
    fn test_open_requires_trust_anchors() -> anyhow::Result<()> {
        let mut deployment = Deployment::new()?;
        deployment.config.ca_certificate_files.clear();
        assert!(matches!(
            RecordDirectory::open(&deployment.config),
            Err(DirectoryError::Config(_))
        ));

        deployment.config.ca_certificate_files = vec![PathBuf::from("/nonexistent/root.crt")];
        assert!(matches!(
            RecordDirectory::open(&deployment.config),
            Err(DirectoryError::Config(_))
        ));
        Ok(())
    }
}
