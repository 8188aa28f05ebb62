//! Glob-backed corpus of lyric files on disk.

use std::fs;
use std::path::{Path, PathBuf};

use glob::glob;

use super::{Corpus, SongId};
use crate::error::{BotError, Result};

/// A corpus of `Album_Track.lyric` files matched by a glob pattern.
///
/// The pattern is re-evaluated on every listing, so files dropped into the
/// directory between run cycles are picked up without a restart.
#[derive(Debug, Clone)]
pub struct FileCorpus {
    pattern: String,
    dir: PathBuf,
    extension: String,
}

impl FileCorpus {
    /// Create a corpus from a glob pattern such as `data/*.lyric`.
    pub fn new(pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        let as_path = Path::new(&pattern);
        let dir = as_path.parent().unwrap_or(Path::new(".")).to_path_buf();
        let extension = as_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("lyric")
            .to_string();
        Self {
            pattern,
            dir,
            extension,
        }
    }

    /// The glob pattern this corpus matches.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Path a song's file is expected at, per the naming convention.
    fn song_path(&self, song: &SongId) -> PathBuf {
        self.dir
            .join(format!("{}.{}", song.history_key(), self.extension))
    }
}

impl Corpus for FileCorpus {
    fn songs(&self) -> Result<Vec<SongId>> {
        let paths =
            glob(&self.pattern).map_err(|e| BotError::State(format!("bad corpus glob: {}", e)))?;

        let mut songs = Vec::new();
        for entry in paths {
            let path = entry.map_err(|e| BotError::Io(e.into_error()))?;
            match SongId::from_path(&path) {
                Some(song) => songs.push(song),
                None => {
                    log::warn!("Skipping corpus file with unparseable name: {}", path.display());
                }
            }
        }
        songs.sort_by_key(|s| s.history_key());
        Ok(songs)
    }

    fn body(&self, song: &SongId) -> Result<String> {
        let path = self.song_path(song);
        Ok(fs::read_to_string(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_lyric(dir: &Path, name: &str, body: &str) {
        let mut file = File::create(dir.join(name)).unwrap();
        file.write_all(body.as_bytes()).unwrap();
    }

    #[test]
    fn test_songs_lists_matching_files() {
        let temp = TempDir::new().unwrap();
        write_lyric(temp.path(), "Flood_Particle-Man.lyric", "doing the things");
        write_lyric(temp.path(), "Lincoln_Ana-Ng.lyric", "make a hole");

        let corpus = FileCorpus::new(format!("{}/*.lyric", temp.path().display()));
        let songs = corpus.songs().unwrap();

        assert_eq!(songs.len(), 2);
        assert_eq!(songs[0], SongId::new("Flood", "Particle-Man"));
        assert_eq!(songs[1], SongId::new("Lincoln", "Ana-Ng"));
    }

    #[test]
    fn test_songs_skips_files_without_separator() {
        let temp = TempDir::new().unwrap();
        write_lyric(temp.path(), "notes.lyric", "not a song");
        write_lyric(temp.path(), "Flood_Dead.lyric", "I returned a bag of groceries");

        let corpus = FileCorpus::new(format!("{}/*.lyric", temp.path().display()));
        let songs = corpus.songs().unwrap();

        assert_eq!(songs, vec![SongId::new("Flood", "Dead")]);
    }

    #[test]
    fn test_songs_ignores_other_extensions() {
        let temp = TempDir::new().unwrap();
        write_lyric(temp.path(), "Flood_Dead.lyric", "text");
        write_lyric(temp.path(), "Flood_Dead.txt", "other");

        let corpus = FileCorpus::new(format!("{}/*.lyric", temp.path().display()));
        assert_eq!(corpus.songs().unwrap().len(), 1);
    }

    #[test]
    fn test_body_reads_file_contents() {
        let temp = TempDir::new().unwrap();
        write_lyric(temp.path(), "Flood_Dead.lyric", "line one\nline two");

        let corpus = FileCorpus::new(format!("{}/*.lyric", temp.path().display()));
        let body = corpus.body(&SongId::new("Flood", "Dead")).unwrap();
        assert_eq!(body, "line one\nline two");
    }

    #[test]
    fn test_empty_dir_lists_no_songs() {
        let temp = TempDir::new().unwrap();
        let corpus = FileCorpus::new(format!("{}/*.lyric", temp.path().display()));
        assert!(corpus.songs().unwrap().is_empty());
    }
}
