//! Excerpt selection: picking a random stanza and trimming it to length.

use crate::corpus::SongId;

pub use self::selector::{Selector, DEFAULT_MAX_ATTEMPTS};
pub use self::trim::{rendered_len, trim_to_fit};

mod selector;
mod trim;

/// A trimmed stanza ready to post, tagged with its source song.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Excerpt {
    /// Which song the lines came from.
    pub song: SongId,
    /// The surviving lines, in source order.
    pub lines: Vec<String>,
}

impl Excerpt {
    /// The post body: lines joined by newlines.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Rendered length in characters, separators included.
    pub fn rendered_len(&self) -> usize {
        trim::rendered_len(&self.lines)
    }

    /// Just the opening line, used for replies.
    pub fn first_line(&self) -> &str {
        self.lines.first().map(String::as_str).unwrap_or("")
    }
}

/// Split a lyric body into stanzas: blank-line-separated groups of lines.
///
/// Blank stanzas (runs of empty lines) are dropped.
pub fn split_stanzas(body: &str) -> Vec<&str> {
    body.split("\n\n")
        .filter(|stanza| !stanza.trim().is_empty())
        .collect()
}

/// Break a stanza into lines, stripping leading/trailing blank lines.
pub fn stanza_lines(stanza: &str) -> Vec<String> {
    stanza.trim().lines().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_stanzas_on_blank_lines() {
        let body = "one\ntwo\n\nthree\nfour";
        let stanzas = split_stanzas(body);
        assert_eq!(stanzas, vec!["one\ntwo", "three\nfour"]);
    }

    #[test]
    fn test_split_stanzas_drops_blank_groups() {
        let body = "one\n\n\n\ntwo";
        let stanzas = split_stanzas(body);
        assert_eq!(stanzas, vec!["one", "two"]);
    }

    #[test]
    fn test_split_stanzas_empty_body() {
        assert!(split_stanzas("").is_empty());
        assert!(split_stanzas("\n\n\n").is_empty());
    }

    #[test]
    fn test_stanza_lines_strips_edges() {
        let lines = stanza_lines("\nfirst\nsecond\n");
        assert_eq!(lines, vec!["first", "second"]);
    }

    #[test]
    fn test_excerpt_text_joins_with_newlines() {
        let excerpt = Excerpt {
            song: SongId::new("Flood", "Dead"),
            lines: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(excerpt.text(), "a\nb");
        assert_eq!(excerpt.rendered_len(), 3);
    }

    #[test]
    fn test_excerpt_first_line() {
        let excerpt = Excerpt {
            song: SongId::new("Flood", "Dead"),
            lines: vec!["opening".to_string(), "rest".to_string()],
        };
        assert_eq!(excerpt.first_line(), "opening");
    }
}
