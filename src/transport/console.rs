//! Console transport for debug runs: print instead of posting.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use colored::*;

use super::{Mention, QuoteEvent, Transport};
use crate::error::Result;

/// Prints every would-be network call to stdout and fabricates ids.
#[derive(Debug, Default)]
pub struct ConsoleTransport {
    counter: AtomicU64,
}

impl ConsoleTransport {
    /// Create a console transport.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Transport for ConsoleTransport {
    async fn post(&self, text: &str, reply_to: Option<&str>) -> Result<String> {
        match reply_to {
            Some(id) => println!("{} (reply to {})\n{}", "Would post:".cyan(), id, text),
            None => println!("{}\n{}", "Would post:".cyan(), text),
        }
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        Ok(format!("debug-{}", n))
    }

    async fn favorite(&self, post_id: &str) -> Result<()> {
        println!("{} {}", "Would favorite:".cyan(), post_id);
        Ok(())
    }

    async fn mentions_since(&self, _since_id: Option<&str>) -> Result<Vec<Mention>> {
        println!("{}", "Would list mentions (none in debug mode)".yellow());
        Ok(Vec::new())
    }

    async fn next_quote(&self) -> Result<Option<QuoteEvent>> {
        println!("{}", "No quote events in debug mode".yellow());
        Ok(None)
    }

    async fn disconnect(&self) -> Result<()> {
        Ok(())
    }
}
