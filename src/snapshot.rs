// 📦 Snapshot Loader
// Reads data.json once, stamps load order, and hands out an immutable
// collection. A reload builds a new Snapshot; entries are never patched.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::entry::Entry;

/// Raw file layout: `{ "entries": [ ... ] }`
#[derive(Debug, Deserialize)]
struct RawSnapshot {
    #[serde(default)]
    entries: Option<Vec<Value>>,
}

#[derive(Debug, Clone)]
pub struct Snapshot {
    entries: Vec<Entry>,
    /// Where the data came from (file path, or a label for in-memory data)
    pub source: String,
    pub loaded_at: DateTime<Utc>,
}

impl Snapshot {
    /// No data: every query answers with an empty result
    pub fn empty() -> Self {
        Snapshot {
            entries: Vec::new(),
            source: String::new(),
            loaded_at: Utc::now(),
        }
    }

    /// Build from already parsed rows, stamping `original_index`
    pub fn from_values(values: Vec<Value>, source: impl Into<String>) -> Self {
        let entries: Vec<Entry> = values
            .into_iter()
            .enumerate()
            .map(|(i, value)| Entry::from_value(value, i))
            .collect();

        let source = source.into();
        info!(source = %source, entries = entries.len(), "snapshot loaded");

        Snapshot {
            entries,
            source,
            loaded_at: Utc::now(),
        }
    }

    pub fn from_json_str(text: &str, source: impl Into<String>) -> Result<Self> {
        let raw: RawSnapshot =
            serde_json::from_str(text).context("Failed to parse snapshot JSON")?;

        let values = raw.entries.unwrap_or_default();
        debug!(rows = values.len(), "snapshot rows read");
        Ok(Snapshot::from_values(values, source))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read data file: {:?}", path))?;

        Snapshot::from_json_str(&text, path.display().to_string())
            .with_context(|| format!("Invalid data file: {:?}", path))
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
