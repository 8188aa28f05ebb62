//! Error types for stanzabot
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in stanzabot
#[derive(Debug, Error)]
pub enum BotError {
    /// No lyric files are available at all
    #[error("Lyric corpus is empty: {0}")]
    EmptyCorpus(String),

    /// No usable excerpt found within the attempt budget
    #[error("No excerpt found within {0} attempts")]
    NoExcerpt(u32),

    /// State/history persistence error
    #[error("State error: {0}")]
    State(String),

    /// Network transport error
    #[error("Transport error: {0}")]
    Transport(String),

    /// Lyric fetcher error
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for stanzabot operations
pub type Result<T> = std::result::Result<T, BotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_corpus_error() {
        let err = BotError::EmptyCorpus("data/*.lyric".to_string());
        assert_eq!(err.to_string(), "Lyric corpus is empty: data/*.lyric");
    }

    #[test]
    fn test_no_excerpt_error() {
        let err = BotError::NoExcerpt(10);
        assert_eq!(err.to_string(), "No excerpt found within 10 attempts");
    }

    #[test]
    fn test_state_error() {
        let err = BotError::State("history file locked".to_string());
        assert_eq!(err.to_string(), "State error: history file locked");
    }

    #[test]
    fn test_transport_error() {
        let err = BotError::Transport("503 from API".to_string());
        assert_eq!(err.to_string(), "Transport error: 503 from API");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: BotError = io_err.into();
        assert!(matches!(err, BotError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err: BotError = json_err.into();
        assert!(matches!(err, BotError::Json(_)));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_ok() -> Result<i32> {
            Ok(42)
        }

        fn returns_err() -> Result<i32> {
            Err(BotError::NoExcerpt(3))
        }

        assert!(returns_ok().is_ok());
        assert!(returns_err().is_err());
    }
}
