//! Posting transport: the seam between the bot and the social network.
//!
//! All network calls may fail transiently; callers absorb failures with
//! log-and-continue, so implementations just report errors honestly.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use self::console::ConsoleTransport;
pub use self::http::HttpTransport;
pub use self::mock::{MockTransport, SentPost};

mod console;
mod http;
mod mock;

/// One inbound mention of the bot's account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Mention {
    /// Id of the mentioning post.
    pub id: String,
    /// Handle of the author, without the leading `@`.
    pub author: String,
    /// Full text of the mentioning post.
    pub text: String,
}

/// An inbound notification that someone quoted one of the bot's posts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuoteEvent {
    /// Id of the quoting post.
    pub post_id: String,
}

/// Network operations the bot performs.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Publish a post, optionally as a reply. Returns the new post's id.
    async fn post(&self, text: &str, reply_to: Option<&str>) -> Result<String>;

    /// Favorite a post by id.
    async fn favorite(&self, post_id: &str) -> Result<()>;

    /// List mentions newer than the given id, newest first.
    async fn mentions_since(&self, since_id: Option<&str>) -> Result<Vec<Mention>>;

    /// Block until the next quote event arrives.
    ///
    /// Returns None when the event source has ended.
    async fn next_quote(&self) -> Result<Option<QuoteEvent>>;

    /// Cleanly detach from the event source.
    async fn disconnect(&self) -> Result<()>;
}
