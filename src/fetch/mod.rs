//! Lyric fetcher: populates the corpus from a wiki.
//!
//! Walks a discography page to album pages to lyric pages and writes one
//! `Album_Track.lyric` file per track. Extraction is regex-based and
//! best-effort; pages that do not match are logged and skipped. We are
//! scraping wiki HTML and should not be surprised when some of it is odd.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use regex::Regex;
use reqwest::Client;

use crate::error::{BotError, Result};

/// Wiki pages holding the discography tables, fetched by default.
pub const DEFAULT_PAGES: &[&str] = &[
    "wiki/Discography/Studio_Albums",
    "wiki/Discography/John_Linnell",
    "wiki/Discography/John_Flansburgh",
];

/// Default wiki base URL.
pub const DEFAULT_BASE_URL: &str = "http://tmbw.net";

/// Collection name used for one-off single-track fetches.
const SINGLES_ALBUM: &str = "Dial-a-Song";

/// Turn a display name into a filename-safe, space-less name.
fn scrub(name: &str) -> String {
    const ILLEGAL: &str = "!@#$%^&*()/\\{}[];:,?~`|'\"";
    name.trim()
        .chars()
        .filter(|c| !ILLEGAL.contains(*c))
        .map(|c| if c == ' ' { '-' } else { c })
        .collect()
}

/// Corpus filename for an album/track pair.
fn make_filename(album: &str, track: &str) -> String {
    format!("{}_{}.lyric", scrub(album), scrub(track))
}

/// All `(text, href)` anchor pairs in an HTML fragment.
fn anchors(html: &str) -> Vec<(String, String)> {
    let re = Regex::new(r#"<a\s[^>]*href="([^"]*)"[^>]*>([^<]*)</a>"#).expect("static regex");
    re.captures_iter(html)
        .map(|c| (c[2].trim().to_string(), c[1].to_string()))
        .filter(|(text, href)| !text.is_empty() && !href.is_empty())
        .collect()
}

/// The slice of `html` from `marker` up to and including `end`.
fn section<'a>(html: &'a str, marker: &str, end: &str) -> Option<&'a str> {
    let start = html.find(marker)?;
    let rest = &html[start..];
    let stop = rest.find(end).map(|i| i + end.len()).unwrap_or(rest.len());
    Some(&rest[..stop])
}

/// Album `(name, href)` pairs from a discography page.
fn discography_albums(html: &str) -> Vec<(String, String)> {
    match section(html, "id=\"discog\"", "</table>") {
        Some(table) => anchors(table),
        None => Vec::new(),
    }
}

/// Track `(name, lyric_href)` pairs from an album page.
///
/// Track tables carry the class `ebena`; rows link the track name and,
/// separately, its lyrics page. Rows without a lyrics link (purchase
/// tables and the like) are ignored.
fn album_tracks(html: &str) -> Vec<(String, String)> {
    let mut tracks = Vec::new();
    let mut rest = html;
    while let Some(table) = section(rest, "class=\"ebena\"", "</table>") {
        for row in table.split("<tr").skip(1) {
            let links = anchors(row);
            let Some((_, lyric_href)) = links.iter().find(|(_, href)| href.contains("Lyrics")) else {
                continue;
            };
            let Some((name, _)) = links.iter().find(|(_, href)| !href.contains("Lyrics")) else {
                continue;
            };
            tracks.push((name.clone(), lyric_href.clone()));
        }
        let consumed = rest.find("class=\"ebena\"").unwrap_or(0) + table.len();
        rest = &rest[consumed..];
    }
    tracks
}

/// Decode the handful of HTML entities the wiki actually emits.
fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

/// Lyric stanzas from a lyrics page, joined by blank lines.
fn extract_stanzas(html: &str) -> String {
    let Some(block) = section(html, "class=\"lyrics-table\"", "</div>") else {
        return String::new();
    };

    let para = Regex::new(r"(?s)<p[^>]*>(.*?)</p>").expect("static regex");
    let breaks = Regex::new(r"(?i)<br\s*/?>").expect("static regex");
    let tags = Regex::new(r"<[^>]*>").expect("static regex");

    let mut stanzas = Vec::new();
    for cap in para.captures_iter(block) {
        let text = breaks.replace_all(&cap[1], "\n");
        let text = tags.replace_all(&text, "");
        let text = decode_entities(&text);
        let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        if !lines.is_empty() {
            stanzas.push(lines.join("\n"));
        }
    }
    stanzas.join("\n\n")
}

/// Fetches lyric pages and writes corpus files.
pub struct Fetcher {
    client: Client,
    base_url: String,
    out_dir: PathBuf,
}

impl Fetcher {
    /// Create a fetcher writing `.lyric` files into `out_dir`.
    pub fn new(base_url: &str, out_dir: impl AsRef<Path>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| BotError::Fetch(format!("cannot build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            out_dir: out_dir.as_ref().to_path_buf(),
        })
    }

    async fn get(&self, href: &str) -> Result<String> {
        let url = if href.starts_with("http://") || href.starts_with("https://") {
            href.to_string()
        } else {
            format!("{}/{}", self.base_url, href.trim_start_matches('/'))
        };
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| BotError::Fetch(format!("GET {}: {}", url, e)))?;
        if !response.status().is_success() {
            return Err(BotError::Fetch(format!("GET {}: {}", url, response.status())));
        }
        response
            .text()
            .await
            .map_err(|e| BotError::Fetch(format!("GET {}: {}", url, e)))
    }

    /// Fetch every album on a discography page. Returns tracks written.
    pub async fn fetch_discography(&self, fragment: &str) -> Result<usize> {
        let html = self.get(fragment).await?;
        let albums = discography_albums(&html);
        if albums.is_empty() {
            return Err(BotError::Fetch(format!(
                "no discography table found at {}",
                fragment
            )));
        }

        let mut written = 0;
        for (album, href) in albums {
            log::info!("Handling album '{}'", album);
            match self.fetch_album(&album, &href).await {
                Ok(count) => written += count,
                Err(e) => log::warn!("Skipping album '{}': {}", album, e),
            }
        }
        Ok(written)
    }

    /// Fetch every track on one album page. Returns tracks written.
    async fn fetch_album(&self, album: &str, href: &str) -> Result<usize> {
        let html = self.get(href).await?;
        let mut written = 0;
        for (track, lyric_href) in album_tracks(&html) {
            match self.fetch_track(album, &track, &lyric_href).await {
                Ok(()) => written += 1,
                Err(e) => log::warn!("Skipping track '{}': {}", track, e),
            }
        }
        Ok(written)
    }

    /// Fetch one lyrics page and write its corpus file.
    async fn fetch_track(&self, album: &str, track: &str, href: &str) -> Result<()> {
        let html = self.get(href).await?;
        let lyrics = extract_stanzas(&html);
        if lyrics.is_empty() {
            return Err(BotError::Fetch(format!("no lyrics found at {}", href)));
        }

        fs::create_dir_all(&self.out_dir)?;
        let path = self.out_dir.join(make_filename(album, track));
        log::info!("  {}", path.display());
        fs::write(path, lyrics)?;
        Ok(())
    }

    /// Fetch one track by title from its `wiki/Lyrics:` page, for songs
    /// released outside any collected album.
    pub async fn fetch_single(&self, title: &str) -> Result<()> {
        let href = format!("wiki/Lyrics:{}", title.trim().replace(' ', "_"));
        self.fetch_track(SINGLES_ALBUM, title, &href).await
    }
}
