//! Configuration for stanzabot.
//!
//! Static settings only; everything the bot mutates at runtime lives in the
//! state store instead. Loaded from `.stanzabot.yml` in the current
//! directory or `~/.config/stanzabot/stanzabot.yml`, with defaults for
//! everything.

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use stanzabot::fetch::{DEFAULT_BASE_URL, DEFAULT_PAGES};
use stanzabot::journal::DEFAULT_FILE_PATTERN;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Posting API settings.
    pub api: ApiConfig,

    /// Lyric corpus location.
    pub corpus: CorpusConfig,

    /// State/history/queue storage.
    pub storage: StorageConfig,

    /// Event journal settings.
    pub journal: JournalConfig,

    /// Lyric fetcher settings.
    pub fetch: FetchConfig,
}

impl Config {
    /// Load configuration with fallback chain.
    ///
    /// Search order:
    /// 1. Explicit path if provided
    /// 2. .stanzabot.yml in current directory
    /// 3. ~/.config/stanzabot/stanzabot.yml
    /// 4. Defaults
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // Explicit path takes precedence
        if let Some(path) = config_path {
            return Self::load_from_file(path)
                .context(format!("Failed to load config from {}", path.display()));
        }

        // Try project config
        let project_config = PathBuf::from(".stanzabot.yml");
        if project_config.exists() {
            match Self::load_from_file(&project_config) {
                Ok(config) => {
                    log::info!("Loaded config from .stanzabot.yml");
                    return Ok(config);
                }
                Err(e) => {
                    log::warn!("Failed to load .stanzabot.yml: {}", e);
                }
            }
        }

        // Try user config
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("stanzabot").join("stanzabot.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => {
                        log::info!("Loaded config from {}", user_config.display());
                        return Ok(config);
                    }
                    Err(e) => {
                        log::warn!("Failed to load {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // Use defaults
        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.corpus.glob.is_empty() {
            eyre::bail!("corpus.glob must not be empty");
        }
        if self.journal.file_pattern.is_empty() {
            eyre::bail!("journal.file-pattern must not be empty");
        }
        if self.fetch.pages.is_empty() {
            eyre::bail!("fetch.pages must not be empty");
        }
        Ok(())
    }
}

/// Posting API settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the posting API.
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Environment variable holding the bearer token.
    #[serde(rename = "token-env")]
    pub token_env: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            token_env: "STANZABOT_TOKEN".to_string(),
        }
    }
}

/// Lyric corpus location.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorpusConfig {
    /// Glob pattern matching the lyric files.
    pub glob: String,
}

impl CorpusConfig {
    /// Directory the corpus files live in, for the fetcher to write into.
    pub fn dir(&self) -> PathBuf {
        Path::new(&self.glob)
            .parent()
            .unwrap_or(Path::new("."))
            .to_path_buf()
    }
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            glob: "data/*.lyric".to_string(),
        }
    }
}

/// State/history/queue storage.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory for the state file, usage history, and favorite queue.
    #[serde(rename = "data-dir")]
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn state_path(&self) -> PathBuf {
        self.data_dir.join("state.json")
    }

    pub fn history_path(&self) -> PathBuf {
        self.data_dir.join("history.json")
    }

    pub fn queue_path(&self) -> PathBuf {
        self.data_dir.join("favorites.jsonl")
    }

    pub fn journal_dir(&self) -> PathBuf {
        self.data_dir.join("journal")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let default_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("stanzabot");

        Self {
            data_dir: default_dir,
        }
    }
}

/// Event journal settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct JournalConfig {
    /// chrono format pattern for the journal filename.
    #[serde(rename = "file-pattern")]
    pub file_pattern: String,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            file_pattern: DEFAULT_FILE_PATTERN.to_string(),
        }
    }
}

/// Lyric fetcher settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Wiki base URL.
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Discography pages to walk.
    pub pages: Vec<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            pages: DEFAULT_PAGES.iter().map(|p| p.to_string()).collect(),
        }
    }
}
