//! Persisted favorite task queue.
//!
//! Streaming mode appends one JSONL record per quote event; the next run
//! cycle drains the queue and favorites each post. This replaces ad hoc
//! marker files with an explicit handoff between the two process modes.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One queued favorite task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueuedFavorite {
    /// Id of the post to favorite.
    pub post_id: String,
}

/// Append/drain queue backed by a JSONL file.
#[derive(Debug, Clone)]
pub struct FavoriteQueue {
    path: PathBuf,
}

impl FavoriteQueue {
    /// Create a queue at the given path. The file is created on first push.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Append one task to the queue.
    pub fn push(&self, post_id: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let record = QueuedFavorite {
            post_id: post_id.to_string(),
        };
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        writeln!(file, "{}", serde_json::to_string(&record)?)?;
        Ok(())
    }

    /// Take every queued task, leaving the queue empty.
    ///
    /// Unparseable lines are logged and dropped rather than wedging the
    /// queue forever.
    pub fn drain(&self) -> Result<Vec<QueuedFavorite>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path)?;
        let mut tasks = Vec::new();
        for line in content.lines() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<QueuedFavorite>(line) {
                Ok(task) => tasks.push(task),
                Err(e) => log::warn!("Dropping unparseable favorite task {:?}: {}", line, e),
            }
        }

        fs::remove_file(&self.path)?;
        Ok(tasks)
    }
}
