//! In-memory transport for tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use super::{Mention, QuoteEvent, Transport};
use crate::error::{BotError, Result};

/// A post captured by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentPost {
    pub text: String,
    pub reply_to: Option<String>,
}

/// Records every call and replays configured mentions and quote events.
#[derive(Debug, Default)]
pub struct MockTransport {
    posts: Mutex<Vec<SentPost>>,
    favorites: Mutex<Vec<String>>,
    mentions: Mutex<Vec<Mention>>,
    quotes: Mutex<VecDeque<QuoteEvent>>,
    fail_calls: AtomicBool,
}

impl MockTransport {
    /// Create an empty mock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a mention to be returned by the next listing (newest first,
    /// so add the newest one first).
    pub fn add_mention(&self, id: &str, author: &str, text: &str) {
        self.mentions.lock().unwrap().push(Mention {
            id: id.to_string(),
            author: author.to_string(),
            text: text.to_string(),
        });
    }

    /// Queue a quote event for the stream.
    pub fn push_quote(&self, post_id: &str) {
        self.quotes.lock().unwrap().push_back(QuoteEvent {
            post_id: post_id.to_string(),
        });
    }

    /// Make every subsequent call fail with a transport error.
    pub fn fail_calls(&self, fail: bool) {
        self.fail_calls.store(fail, Ordering::SeqCst);
    }

    /// Posts sent so far.
    pub fn sent_posts(&self) -> Vec<SentPost> {
        self.posts.lock().unwrap().clone()
    }

    /// Ids favorited so far.
    pub fn favorited(&self) -> Vec<String> {
        self.favorites.lock().unwrap().clone()
    }

    fn maybe_fail(&self, context: &str) -> Result<()> {
        if self.fail_calls.load(Ordering::SeqCst) {
            Err(BotError::Transport(format!("{}: simulated failure", context)))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn post(&self, text: &str, reply_to: Option<&str>) -> Result<String> {
        self.maybe_fail("post")?;
        let mut posts = self.posts.lock().unwrap();
        posts.push(SentPost {
            text: text.to_string(),
            reply_to: reply_to.map(str::to_string),
        });
        Ok(format!("post-{}", posts.len()))
    }

    async fn favorite(&self, post_id: &str) -> Result<()> {
        self.maybe_fail("favorite")?;
        self.favorites.lock().unwrap().push(post_id.to_string());
        Ok(())
    }

    async fn mentions_since(&self, since_id: Option<&str>) -> Result<Vec<Mention>> {
        self.maybe_fail("mentions")?;
        let mentions = self.mentions.lock().unwrap();
        let newer = |m: &&Mention| match since_id {
            Some(id) => m.id.as_str() > id,
            None => true,
        };
        Ok(mentions.iter().filter(newer).cloned().collect())
    }

    async fn next_quote(&self) -> Result<Option<QuoteEvent>> {
        self.maybe_fail("quote stream")?;
        Ok(self.quotes.lock().unwrap().pop_front())
    }

    async fn disconnect(&self) -> Result<()> {
        Ok(())
    }
}
