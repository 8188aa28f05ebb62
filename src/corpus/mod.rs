//! Lyric corpus access.
//!
//! A corpus is a collection of named lyric items. The on-disk convention
//! packs the two-part name into one filename: `Album-Title_Track-Title.lyric`,
//! with `_` separating album from track (neither name may contain it).

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use crate::error::Result;

pub use self::files::FileCorpus;

mod files;

/// Two-part name identifying a song: (album, track).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SongId {
    pub album: String,
    pub track: String,
}

impl SongId {
    /// Create a new song id.
    pub fn new(album: impl Into<String>, track: impl Into<String>) -> Self {
        Self {
            album: album.into(),
            track: track.into(),
        }
    }

    /// Composite key used by the usage history: `Album_Track`.
    pub fn history_key(&self) -> String {
        format!("{}_{}", self.album, self.track)
    }

    /// Parse a song id from a corpus file path.
    ///
    /// Returns None when the file stem does not follow the
    /// `Album_Track` convention.
    pub fn from_path(path: &Path) -> Option<Self> {
        let stem = path.file_stem()?.to_str()?;
        let (album, track) = stem.split_once('_')?;
        if album.is_empty() || track.is_empty() {
            return None;
        }
        Some(Self::new(album, track))
    }
}

impl fmt::Display for SongId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.album, self.track)
    }
}

/// Read access to a lyric corpus.
pub trait Corpus {
    /// List every song available for selection.
    fn songs(&self) -> Result<Vec<SongId>>;

    /// Read the raw text body of one song.
    fn body(&self, song: &SongId) -> Result<String>;
}

/// In-memory corpus for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemCorpus {
    bodies: HashMap<SongId, String>,
    order: Vec<SongId>,
}

impl MemCorpus {
    /// Create an empty corpus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a song with the given body text.
    pub fn add(&mut self, song: SongId, body: impl Into<String>) {
        if !self.bodies.contains_key(&song) {
            self.order.push(song.clone());
        }
        self.bodies.insert(song, body.into());
    }
}

impl Corpus for MemCorpus {
    fn songs(&self) -> Result<Vec<SongId>> {
        Ok(self.order.clone())
    }

    fn body(&self, song: &SongId) -> Result<String> {
        Ok(self.bodies.get(song).cloned().unwrap_or_default())
    }
}
