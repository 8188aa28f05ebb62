//! Append-only event journal.
//!
//! One JSON line per event, written to a file whose name is expanded from a
//! chrono format pattern against the current date, so a pattern like
//! `%Y-%m.jsonl` rolls the journal monthly without any cleanup job.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::cadence::now_secs;
use crate::error::{BotError, Result};

/// Default journal filename pattern.
pub const DEFAULT_FILE_PATTERN: &str = "%Y-%m.jsonl";

/// Everything the bot records about its own activity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// A lyric excerpt was posted.
    Post {
        album: String,
        track: String,
        lines: usize,
        chars: usize,
    },
    /// A mention was answered with a lyric reply.
    Reply { author: String },
    /// A mention was seen and favorited.
    Mention { author: String },
    /// No usable excerpt was found this cycle.
    NoExcerpt,
    /// A transport call failed and was skipped.
    TransportError { context: String, error: String },
}

/// One journal line: timestamp plus event payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    /// Seconds since the Unix epoch.
    pub ts: i64,
    #[serde(flatten)]
    pub event: Event,
}

/// JSONL journal writer.
#[derive(Debug, Clone)]
pub struct Journal {
    dir: PathBuf,
    file_pattern: String,
}

impl Journal {
    /// Create a journal writing into `dir` with the given filename pattern.
    pub fn new(dir: impl AsRef<Path>, file_pattern: impl Into<String>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            file_pattern: file_pattern.into(),
        }
    }

    /// The file the next append lands in.
    pub fn current_path(&self) -> PathBuf {
        let name = Local::now().format(&self.file_pattern).to_string();
        self.dir.join(name)
    }

    /// Append one event, stamped with the current time.
    ///
    /// Journal writes are persistence; failures are not swallowed.
    pub fn append(&self, event: Event) -> Result<()> {
        let record = Record {
            ts: now_secs(),
            event,
        };
        let path = self.current_path();
        fs::create_dir_all(&self.dir)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| BotError::State(format!("cannot open journal {}: {}", path.display(), e)))?;
        writeln!(file, "{}", serde_json::to_string(&record)?)?;
        Ok(())
    }
}
