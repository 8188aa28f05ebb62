//! Per-song usage history.
//!
//! Maps the `Album_Track` composite key to the calendar date the song was
//! last used. Records are overwritten on reuse, never deleted.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::error::{BotError, Result};

/// File-backed map from composite song key to last-used date.
#[derive(Debug)]
pub struct UsageHistory {
    path: PathBuf,
    entries: HashMap<String, NaiveDate>,
    dirty: bool,
}

impl UsageHistory {
    /// Open the history file. A missing file means an empty history.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let content = fs::read_to_string(&path)
                .map_err(|e| BotError::State(format!("cannot read {}: {}", path.display(), e)))?;
            serde_json::from_str(&content)
                .map_err(|e| BotError::State(format!("cannot parse {}: {}", path.display(), e)))?
        } else {
            HashMap::new()
        };
        Ok(Self {
            path,
            entries,
            dirty: false,
        })
    }

    /// The date this key was last used, if ever.
    pub fn last_used(&self, key: &str) -> Option<NaiveDate> {
        self.entries.get(key).copied()
    }

    /// Record the key as used on the given date.
    pub fn record_used(&mut self, key: &str, date: NaiveDate) {
        self.entries.insert(key.to_string(), date);
        self.dirty = true;
    }

    /// Number of songs ever used.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no song has ever been used.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write the history file if anything changed since load.
    pub fn flush(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, json)
            .map_err(|e| BotError::State(format!("cannot write {}: {}", self.path.display(), e)))?;
        self.dirty = false;
        Ok(())
    }
}
