//! # Directory Projection
//!
//! Folds the winning chain into one `DirectoryEntry` per operator. The
//! projection is rebuilt from scratch on every update.

use serde_json::Value;
use shared_types::{DirectoryEntry, SignedChangeRecord, SECTION_CHANNELS, SECTION_PREFERENCES};
use std::collections::BTreeMap;

/// Entries keyed by operator name.
pub type Projection = BTreeMap<String, DirectoryEntry>;

pub fn project<'a>(chain: impl IntoIterator<Item = &'a SignedChangeRecord>) -> Projection {
    let mut entries = Projection::new();
    for signed in chain {
        let record = &signed.record;
        let entry = entries
            .entry(record.name.clone())
            .or_insert_with(|| DirectoryEntry::new(record.name.clone()));
        fold(entry, &record.section, &record.data);
        entry.records.push(signed.clone());
    }
    entries
}

fn fold(entry: &mut DirectoryEntry, section: &str, data: &Value) {
    match section {
        SECTION_CHANNELS => {
            entry.channels = match data {
                Value::Array(channels) => channels.clone(),
                Value::Null => Vec::new(),
                other => vec![other.clone()],
            }
        }
        SECTION_PREFERENCES => entry.preferences = Some(data.clone()),
        other => {
            entry.sections.insert(other.to_string(), data.clone());
        }
    }
}
