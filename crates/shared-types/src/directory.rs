//! # Directory Entries
//!
//! Per-operator view projected from the winning record chain.

use crate::entities::SignedChangeRecord;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Projected state of one operator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub name: String,
    /// Channels from the most recent `channels` record.
    #[serde(default)]
    pub channels: Vec<Value>,
    /// Value of the most recent `preferences` record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<Value>,
    /// Latest value of every other section, keyed by section name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub sections: BTreeMap<String, Value>,
    /// Audit trail: every record folded into this entry, in chain order.
    #[serde(default)]
    pub records: Vec<SignedChangeRecord>,
}

impl DirectoryEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Find a channel by its `type` field.
    pub fn channel(&self, channel_type: &str) -> Option<&Value> {
        self.channels
            .iter()
            .find(|channel| channel.get("type").and_then(Value::as_str) == Some(channel_type))
    }

    /// Whether any channel has one of the given types.
    pub fn has_any_channel(&self, channel_types: &[String]) -> bool {
        channel_types
            .iter()
            .any(|channel_type| self.channel(channel_type).is_some())
    }
}

/// Filter for directory lookups.
///
/// Unset fields match every entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryQuery {
    /// Only the entry of this operator.
    pub operator: Option<String>,
    /// Only entries offering at least one of these channel types.
    pub channels: Option<Vec<String>>,
}

impl DirectoryQuery {
    pub fn operator(name: impl Into<String>) -> Self {
        Self {
            operator: Some(name.into()),
            channels: None,
        }
    }

    pub fn with_channels(mut self, channel_types: Vec<String>) -> Self {
        self.channels = Some(channel_types);
        self
    }

    pub fn matches(&self, entry: &DirectoryEntry) -> bool {
        if let Some(operator) = &self.operator {
            if &entry.name != operator {
                return false;
            }
        }
        match &self.channels {
            Some(channel_types) => entry.has_any_channel(channel_types),
            None => true,
        }
    }
}
