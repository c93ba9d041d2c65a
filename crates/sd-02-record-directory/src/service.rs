//! # Record Directory Service
//!
//! Owns the record graph and projection for one directory instance and
//! implements `ServiceDirectoryApi` over a `DataStore`.
//!
//! ## Update
//!
//! ```text
//! store.read() ──→ decode ──→ graph.insert ──→ graph.chains()
//!                                                  │
//!        projection ←── select_chain ←── verify each chain
//! ```
//!
//! A chain containing one failing record is dropped as a whole. Records that
//! verified are remembered and not re-authorized by later updates.
//!
//! ## Concurrency
//!
//! One mutex serializes every operation of an instance. Several processes
//! appending to one log only coordinate through the stale-parent check, which
//! races; sibling records are resolved by fork choice on the next update.

use crate::domain::{
    is_admin, project, select_chain, ConflictError, DirectoryConfig, DirectoryError, Projection,
    RecordGraph, RecordIndex, RecordVerifier,
};
use crate::ports::inbound::ServiceDirectoryApi;
use crate::ports::outbound::DataStore;
use parking_lot::Mutex;
use sd_01_chunk_store::{DataEntry, FileDataStore};
use shared_crypto::TrustStore;
use shared_types::{DirectoryEntry, DirectoryQuery, SignedChangeRecord};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

/// Entry type of a JSON-encoded `SignedChangeRecord`.
pub const SIGNED_CHANGE_RECORD_ENTRY: u8 = 1;

struct DirectoryState {
    store: Box<dyn DataStore>,
    /// Entries read from the store but not yet merged into the graph.
    backlog: Vec<DataEntry>,
    graph: RecordGraph,
    /// Hashes of records that passed verification in an earlier update.
    verified: HashSet<String>,
    /// Winning chain, root first.
    ordered: Vec<SignedChangeRecord>,
    entries: Projection,
}

/// Service directory over a shared record log.
pub struct RecordDirectory {
    verifier: RecordVerifier,
    state: Mutex<DirectoryState>,
}

impl RecordDirectory {
    /// Initialise `store` and load every record already in it.
    pub fn new<S: DataStore + 'static>(mut store: S, trust: TrustStore) -> Result<Self, DirectoryError> {
        store.init()?;
        let directory = Self {
            verifier: RecordVerifier::new(trust),
            state: Mutex::new(DirectoryState {
                store: Box::new(store),
                backlog: Vec::new(),
                graph: RecordGraph::new(),
                verified: HashSet::new(),
                ordered: Vec::new(),
                entries: Projection::new(),
            }),
        };
        directory.update()?;
        Ok(directory)
    }

    /// Open the file-backed directory described by `config`.
    pub fn open(config: &DirectoryConfig) -> Result<Self, DirectoryError> {
        config.validate()?;
        let trust = TrustStore::from_pem_files(
            &config.ca_certificate_files,
            &config.ca_intermediate_certificate_files,
        )
        .map_err(|e| DirectoryError::Config(format!("loading CA certificates: {e}")))?;
        info!(
            "[sd-02] 📁 Opening directory at {} ({} root CAs)",
            config.database_file.display(),
            trust.root_count()
        );
        Self::new(
            FileDataStore::new(&config.database_file, config.chunk_store),
            trust,
        )
    }

    /// Number of records known, on any chain.
    pub fn known_records(&self) -> usize {
        self.state.lock().graph.len()
    }
}

impl DirectoryState {
    fn update(&mut self, verifier: &RecordVerifier) -> Result<(), DirectoryError> {
        let fresh = self.store.read()?;
        self.backlog.extend(fresh);

        // A bad entry stays in the backlog so every later update fails too
        let records = self
            .backlog
            .iter()
            .map(decode_entry)
            .collect::<Result<Vec<_>, _>>()?;
        self.backlog.clear();
        for record in records {
            self.graph.insert(record);
        }

        let chains = self.graph.chains()?;
        let mut outcomes: HashMap<RecordIndex, bool> = HashMap::new();
        let valid: Vec<_> = chains
            .into_iter()
            .filter(|chain| self.verify_chain(verifier, chain, &mut outcomes))
            .collect();

        for (index, ok) in outcomes {
            if ok {
                if let Some(record) = self.graph.get(index) {
                    self.verified.insert(record.hash.clone());
                }
            }
        }

        let previous_tip = self.ordered.last().map(|record| record.hash.clone());
        self.ordered = select_chain(&self.graph, &valid)
            .map(|winner| {
                valid[winner]
                    .iter()
                    .filter_map(|&index| self.graph.get(index).cloned())
                    .collect()
            })
            .unwrap_or_default();
        self.entries = project(&self.ordered);

        let tip = self.ordered.last().map(|record| record.hash.clone());
        if tip != previous_tip {
            info!(
                "[sd-02] Selected chain of {} records out of {} verified chains, tip {}",
                self.ordered.len(),
                valid.len(),
                tip.as_deref().unwrap_or("<none>")
            );
        }
        Ok(())
    }

    /// Verify every record of `chain`, each against the records before it.
    /// `outcomes` caches per-record results within one update; a record's
    /// prefix is the same on every chain through it.
    fn verify_chain(
        &self,
        verifier: &RecordVerifier,
        chain: &[RecordIndex],
        outcomes: &mut HashMap<RecordIndex, bool>,
    ) -> bool {
        let mut prefix = Vec::with_capacity(chain.len());
        for &index in chain {
            let Some(record) = self.graph.get(index) else {
                return false;
            };
            let ok = *outcomes.entry(index).or_insert_with(|| {
                let known_good = self.verified.contains(&record.hash);
                match verifier.verify(record, &prefix, known_good) {
                    Ok(_) => true,
                    Err(e) => {
                        warn!("[sd-02] Dropping chain at record {}: {e}", record.hash);
                        false
                    }
                }
            });
            if !ok {
                return false;
            }
            prefix.push(record);
        }
        true
    }

    fn append_one(
        &mut self,
        verifier: &RecordVerifier,
        record: SignedChangeRecord,
    ) -> Result<(), DirectoryError> {
        let tip = self.ordered.last().map(|tip| tip.hash.clone());
        if !record.is_root() && tip.as_deref() != Some(record.parent_hash.as_str()) {
            return Err(ConflictError::StaleParent {
                expected: tip,
                provided: record.parent_hash.clone(),
            }
            .into());
        }
        if self.graph.contains(&record.hash) {
            return Err(ConflictError::DuplicateRecord(record.hash.clone()).into());
        }

        let prefix: Vec<&SignedChangeRecord> = if record.is_root() {
            Vec::new()
        } else {
            self.ordered.iter().collect()
        };
        let signer = verifier.verify(&record, &prefix, false)?;

        if record.is_root() {
            if let Some(root) = self.ordered.first() {
                if !is_admin(&signer) {
                    return Err(ConflictError::RootRequiresAdmin {
                        signer: signer.name,
                    }
                    .into());
                }
                if record.created_at() <= root.created_at() {
                    return Err(ConflictError::StaleRoot {
                        current: root.created_at(),
                        provided: record.created_at(),
                    }
                    .into());
                }
            }
        }

        let data = serde_json::to_vec(&record)?;
        self.store
            .write(&DataEntry::new(SIGNED_CHANGE_RECORD_ENTRY, data))?;
        self.update(verifier)?;

        if !self.ordered.iter().any(|accepted| accepted.hash == record.hash) {
            return Err(DirectoryError::Consistency(format!(
                "record {} was written but is not on the selected chain",
                record.hash
            )));
        }
        info!(
            "[sd-02] 💾 Appended record {} ({} / {}) signed by {}",
            record.hash, record.record.name, record.record.section, signer.name
        );
        Ok(())
    }
}

fn decode_entry(entry: &DataEntry) -> Result<SignedChangeRecord, DirectoryError> {
    if entry.entry_type != SIGNED_CHANGE_RECORD_ENTRY {
        return Err(DirectoryError::Decode(format!(
            "unknown entry type {}",
            entry.entry_type
        )));
    }
    let record = serde_json::from_slice(&entry.data)?;
    debug!("[sd-02] Decoded record entry ({} bytes)", entry.data.len());
    Ok(record)
}

impl ServiceDirectoryApi for RecordDirectory {
    fn append(&self, records: Vec<SignedChangeRecord>) -> Result<(), DirectoryError> {
        let mut state = self.state.lock();
        state.update(&self.verifier)?;
        for record in records {
            state.append_one(&self.verifier, record)?;
        }
        Ok(())
    }

    fn update(&self) -> Result<(), DirectoryError> {
        self.state.lock().update(&self.verifier)
    }

    fn entry(&self, name: &str) -> Option<DirectoryEntry> {
        self.state.lock().entries.get(name).cloned()
    }

    fn all_entries(&self) -> Vec<DirectoryEntry> {
        self.state.lock().entries.values().cloned().collect()
    }

    fn entries(&self, query: &DirectoryQuery) -> Vec<DirectoryEntry> {
        self.state
            .lock()
            .entries
            .values()
            .filter(|entry| query.matches(entry))
            .cloned()
            .collect()
    }

    fn records(&self, after: &str) -> Vec<SignedChangeRecord> {
        let state = self.state.lock();
        match state.ordered.iter().position(|record| record.hash == after) {
            Some(position) => state.ordered[position + 1..].to_vec(),
            None => state.ordered.clone(),
        }
    }

    fn tip(&self) -> Option<SignedChangeRecord> {
        self.state.lock().ordered.last().cloned()
    }
}
