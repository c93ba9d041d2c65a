//! # Concurrent Directory Writers
//!
//! Within one process the directory lock serializes appends, so retrying on
//! conflict always converges. Across processes the stale-parent check races
//! and siblings are settled by fork choice; every process must still end up
//! on the same chain.

use sd_02_record_directory::test_utils::{channels_record, signer, TestOperator};
use sd_02_record_directory::{DirectoryError, RecordDirectory, ServiceDirectoryApi};
use std::time::Duration;

/// Append one record for `operator` on top of the directory's tip, retrying
/// on conflicts and lost sibling races.
pub fn append_with_retry(
    directory: &RecordDirectory,
    operator: &TestOperator,
    endpoint: &str,
) -> Result<(), DirectoryError> {
    let record_signer = signer(operator);
    loop {
        directory.update()?;
        let tip = directory.tip().map(|tip| tip.hash).unwrap_or_default();
        let record = record_signer
            .sign(channels_record(&operator.name, endpoint), &tip)
            .map_err(DirectoryError::from)?;
        match directory.append(vec![record]) {
            Err(e) if e.is_conflict() || matches!(e, DirectoryError::Consistency(_)) => {
                tracing::debug!("retrying append for {}: {e}", operator.name);
                std::thread::sleep(Duration::from_millis(1));
            }
            other => return other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::Deployment;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    const APPENDS_PER_OPERATOR: usize = 5;

    #[test]
    fn test_threads_share_one_directory() -> anyhow::Result<()> {
        let deployment = Deployment::new()?;
        let directory = Arc::new(deployment.open()?);
        let operators: Vec<TestOperator> = ["alice", "bob", "carol"]
            .iter()
            .map(|name| deployment.pki.operator(name, &[]))
            .collect();

        let handles: Vec<_> = operators
            .into_iter()
            .map(|operator| {
                let directory = Arc::clone(&directory);
                thread::spawn(move || {
                    for i in 0..APPENDS_PER_OPERATOR {
                        append_with_retry(&directory, &operator, &format!("{}-{i}", operator.name))
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("writer thread");
        }

        let chain = directory.records("");
        assert_eq!(chain.len(), 3 * APPENDS_PER_OPERATOR);
        assert_eq!(directory.all_entries().len(), 3);
        for entry in directory.all_entries() {
            assert_eq!(entry.records.len(), APPENDS_PER_OPERATOR);
            assert_eq!(
                entry.channels,
                vec![serde_json::json!({ "endpoint": format!("{}-{}", entry.name, APPENDS_PER_OPERATOR - 1) })]
            );
        }
        Ok(())
    }

    #[test]
    fn test_processes_converge_on_one_chain() -> anyhow::Result<()> {
        let deployment = Deployment::new()?;
        // Genesis first, so racing writers only ever extend a tip
        let first = deployment.open()?;
        let alice = deployment.pki.operator("alice", &[]);
        append_with_retry(&first, &alice, "genesis")?;

        let handles: Vec<_> = ["bob", "carol"]
            .iter()
            .map(|name| {
                // Separate directory and file handle per writer
                let directory = deployment.open().expect("directory");
                let operator = deployment.pki.operator(name, &[]);
                thread::spawn(move || {
                    for i in 0..APPENDS_PER_OPERATOR {
                        append_with_retry(&directory, &operator, &format!("{i}")).unwrap();
                    }
                    directory
                })
            })
            .collect();
        let writers: Vec<RecordDirectory> = handles
            .into_iter()
            .map(|handle| handle.join().expect("writer thread"))
            .collect();

        first.update()?;
        let tip = first.tip().expect("tip");
        for writer in &writers {
            writer.update()?;
            assert_eq!(writer.tip(), Some(tip.clone()));
            assert_eq!(writer.records(""), first.records(""));
        }

        let chain = first.records("");
        let hashes: HashSet<_> = chain.iter().map(|record| record.hash.as_str()).collect();
        assert_eq!(hashes.len(), chain.len());
        assert_eq!(chain[0].record.name, "alice");
        assert!(chain.len() > 1);
        Ok(())
    }
}
