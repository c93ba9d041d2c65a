//! # Record Graph
//!
//! Arena of every record read from the log, keyed by declared hash. Parent
//! links are resolved on each enumeration rather than stored, so the graph
//! never carries stale adjacency between updates.
//!
//! ```text
//!   root(T1) ── a ── b          chains: [root(T1), a, b]
//!                 └─ c                  [root(T1), a, c]
//!   root(T2) ── d                       [root(T2), d]
//! ```
//!
//! A record whose `parent_hash` is empty or unknown is a root. Records that
//! no root reaches sit on a parent cycle, which fails enumeration.

use super::errors::DirectoryError;
use shared_types::SignedChangeRecord;
use std::collections::HashMap;
use tracing::debug;

/// Position of a record in the arena.
pub type RecordIndex = usize;

/// Root-to-leaf path of arena indices.
pub type Chain = Vec<RecordIndex>;

#[derive(Debug, Clone, Default)]
pub struct RecordGraph {
    records: Vec<SignedChangeRecord>,
    index: HashMap<String, RecordIndex>,
}

impl RecordGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, hash: &str) -> bool {
        self.index.contains_key(hash)
    }

    pub fn index_of(&self, hash: &str) -> Option<RecordIndex> {
        self.index.get(hash).copied()
    }

    pub fn get(&self, index: RecordIndex) -> Option<&SignedChangeRecord> {
        self.records.get(index)
    }

    /// Add a record. Returns `false` if its hash is already known, in which
    /// case the first copy is kept.
    pub fn insert(&mut self, record: SignedChangeRecord) -> bool {
        if self.index.contains_key(&record.hash) {
            debug!("[sd-02] Ignoring repeated record {}", record.hash);
            return false;
        }
        self.index.insert(record.hash.clone(), self.records.len());
        self.records.push(record);
        true
    }

    /// Every root-to-leaf chain, depth-first, roots and children in log order.
    pub fn chains(&self) -> Result<Vec<Chain>, DirectoryError> {
        let mut roots = Vec::new();
        let mut children: Vec<Vec<RecordIndex>> = vec![Vec::new(); self.records.len()];
        for (index, record) in self.records.iter().enumerate() {
            match self.resolve_parent(record) {
                Some(parent) => children[parent].push(index),
                None => roots.push(index),
            }
        }

        let mut visited = vec![false; self.records.len()];
        let mut on_path = vec![false; self.records.len()];
        let mut chains = Vec::new();

        for root in roots {
            let mut path = vec![root];
            let mut stack: Vec<(RecordIndex, usize)> = vec![(root, 0)];
            visited[root] = true;
            on_path[root] = true;
            if children[root].is_empty() {
                chains.push(path.clone());
            }

            while let Some(&(node, next)) = stack.last() {
                let Some(&child) = children[node].get(next) else {
                    on_path[node] = false;
                    path.pop();
                    stack.pop();
                    continue;
                };
                if let Some(top) = stack.last_mut() {
                    top.1 += 1;
                }
                if on_path[child] {
                    return Err(self.cycle_error(child));
                }

                visited[child] = true;
                on_path[child] = true;
                path.push(child);
                if children[child].is_empty() {
                    chains.push(path.clone());
                }
                stack.push((child, 0));
            }
        }

        if let Some(unreached) = visited.iter().position(|seen| !seen) {
            return Err(self.cycle_error(unreached));
        }

        debug!(
            "[sd-02] Enumerated {} chains over {} records",
            chains.len(),
            self.records.len()
        );
        Ok(chains)
    }

    fn resolve_parent(&self, record: &SignedChangeRecord) -> Option<RecordIndex> {
        if record.parent_hash.is_empty() {
            None
        } else {
            self.index_of(&record.parent_hash)
        }
    }

    fn cycle_error(&self, index: RecordIndex) -> DirectoryError {
        let record = &self.records[index];
        debug!(
            "[sd-02] Record {} (parent {}) is on a parent cycle",
            record.hash, record.parent_hash
        );
        DirectoryError::Consistency(format!(
            "parent cycle through record {}",
            record.hash
        ))
    }
}
