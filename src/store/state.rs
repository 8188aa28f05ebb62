//! Scheduler state persisted between run cycles.
//!
//! The state file is a flat JSON object with optional fields. Defaults are
//! applied once at load time and written back on the next flush, so a fresh
//! install ends up with a fully populated file after its first cycle.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BotError, Result};

/// Default minimum gap between posts, in seconds (1 hour).
pub const DEFAULT_MINIMUM_SPACING_SECS: i64 = 60 * 60;

/// Default ceiling on silence, in seconds (4 hours).
pub const DEFAULT_MAXIMUM_SPACING_SECS: i64 = 4 * 60 * 60;

/// Default per-tick posting probability (24 posts/day at one tick a minute).
pub const DEFAULT_POST_PROBABILITY: f64 = 24.0 / 1440.0;

/// Default per-song cooldown, in days.
pub const DEFAULT_MINIMUM_DAY_SPACING: i64 = 30;

/// Everything the bot persists between cycles besides usage history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BotState {
    /// Seconds since epoch of the last successful post.
    pub last_post_ts: Option<i64>,

    /// Minimum gap between probability-triggered posts, in seconds.
    pub minimum_spacing_secs: Option<i64>,

    /// Never stay silent longer than this, in seconds.
    pub maximum_spacing_secs: Option<i64>,

    /// Chance of posting on any given tick, in [0,1).
    pub post_probability: Option<f64>,

    /// Days a song stays ineligible after being used.
    pub minimum_day_spacing: Option<i64>,

    /// Id of the newest mention already handled.
    pub last_mention_id: Option<String>,

    /// Human-readable timestamp of the last completed cycle.
    pub last_executed: Option<String>,
}

impl BotState {
    /// Fill in defaults for any unset scheduling field.
    ///
    /// Returns true if anything changed.
    fn apply_defaults(&mut self) -> bool {
        let mut changed = false;
        if self.minimum_spacing_secs.is_none() {
            self.minimum_spacing_secs = Some(DEFAULT_MINIMUM_SPACING_SECS);
            changed = true;
        }
        if self.maximum_spacing_secs.is_none() {
            self.maximum_spacing_secs = Some(DEFAULT_MAXIMUM_SPACING_SECS);
            changed = true;
        }
        if self.post_probability.is_none() {
            self.post_probability = Some(DEFAULT_POST_PROBABILITY);
            changed = true;
        }
        if self.minimum_day_spacing.is_none() {
            self.minimum_day_spacing = Some(DEFAULT_MINIMUM_DAY_SPACING);
            changed = true;
        }
        changed
    }

    /// The resolved scheduling view of this state.
    pub fn cadence(&self) -> Cadence {
        Cadence {
            last_post_ts: self.last_post_ts.unwrap_or(0),
            minimum_spacing_secs: self
                .minimum_spacing_secs
                .unwrap_or(DEFAULT_MINIMUM_SPACING_SECS),
            maximum_spacing_secs: self
                .maximum_spacing_secs
                .unwrap_or(DEFAULT_MAXIMUM_SPACING_SECS),
            post_probability: self.post_probability.unwrap_or(DEFAULT_POST_PROBABILITY),
        }
    }

    /// Per-song cooldown with the default applied.
    pub fn minimum_day_spacing(&self) -> i64 {
        self.minimum_day_spacing.unwrap_or(DEFAULT_MINIMUM_DAY_SPACING)
    }
}

/// Resolved posting-cadence parameters, input to the scheduler decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cadence {
    pub last_post_ts: i64,
    pub minimum_spacing_secs: i64,
    pub maximum_spacing_secs: i64,
    pub post_probability: f64,
}

/// File-backed store for [`BotState`] with dirty tracking.
#[derive(Debug)]
pub struct StateStore {
    path: PathBuf,
    state: BotState,
    dirty: bool,
}

impl StateStore {
    /// Open the state file, creating default state if it does not exist.
    ///
    /// A missing file is not an error; an unreadable or unparseable file is,
    /// since silently discarding settings is unacceptable.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut state = if path.exists() {
            let content = fs::read_to_string(&path)
                .map_err(|e| BotError::State(format!("cannot read {}: {}", path.display(), e)))?;
            serde_json::from_str(&content)
                .map_err(|e| BotError::State(format!("cannot parse {}: {}", path.display(), e)))?
        } else {
            log::info!("No state file at {}, starting fresh", path.display());
            BotState::default()
        };

        let dirty = state.apply_defaults();
        Ok(Self { path, state, dirty })
    }

    /// Read access to the state.
    pub fn state(&self) -> &BotState {
        &self.state
    }

    /// Mutate the state and mark it for the next flush.
    pub fn update(&mut self, f: impl FnOnce(&mut BotState)) {
        f(&mut self.state);
        self.dirty = true;
    }

    /// Write the state file if anything changed since load.
    pub fn flush(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.state)?;
        fs::write(&self.path, json)
            .map_err(|e| BotError::State(format!("cannot write {}: {}", self.path.display(), e)))?;
        self.dirty = false;
        Ok(())
    }
}
