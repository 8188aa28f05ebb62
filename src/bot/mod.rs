//! The bot orchestrator: one full run cycle.
//!
//! A cycle asks the scheduler whether to post, selects and queues an
//! excerpt, processes inbound interactions, sends everything queued, and
//! persists mutated state. Transient failures (no excerpt, transport
//! errors) are absorbed; persistence failures are not.

use chrono::Local;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::cadence::{self, now_secs};
use crate::corpus::Corpus;
use crate::error::{BotError, Result};
use crate::excerpt::{DEFAULT_MAX_ATTEMPTS, Selector};
use crate::journal::{Event, Journal};
use crate::store::{FavoriteQueue, StateStore, UsageHistory};
use crate::transport::Transport;

/// Base reply length before subtracting the recipient's handle.
const REPLY_BUDGET: usize = 120;

/// A post accumulated during the cycle, sent in one pass at the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPost {
    pub text: String,
    pub reply_to: Option<String>,
}

/// The bot itself, owning its collaborators for one run.
pub struct Bot<C: Corpus, T: Transport> {
    corpus: C,
    transport: T,
    state: StateStore,
    history: UsageHistory,
    queue: FavoriteQueue,
    journal: Journal,
    pending: Vec<PendingPost>,
    rng: StdRng,
}

impl<C: Corpus, T: Transport> Bot<C, T> {
    /// Create a bot with an OS-seeded RNG.
    pub fn new(
        corpus: C,
        transport: T,
        state: StateStore,
        history: UsageHistory,
        queue: FavoriteQueue,
        journal: Journal,
    ) -> Self {
        Self::with_rng(
            corpus,
            transport,
            state,
            history,
            queue,
            journal,
            StdRng::from_os_rng(),
        )
    }

    /// Create a bot with an explicit RNG, for deterministic tests.
    #[allow(clippy::too_many_arguments)]
    pub fn with_rng(
        corpus: C,
        transport: T,
        state: StateStore,
        history: UsageHistory,
        queue: FavoriteQueue,
        journal: Journal,
        rng: StdRng,
    ) -> Self {
        Self {
            corpus,
            transport,
            state,
            history,
            queue,
            journal,
            pending: Vec::new(),
            rng,
        }
    }

    /// The transport this bot posts through.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Execute one full run cycle.
    pub async fn run_cycle(&mut self, force: bool) -> Result<()> {
        self.create_update(force)?;
        self.handle_mentions().await?;
        self.handle_quotes().await?;
        self.send_pending().await?;
        self.finish()
    }

    /// Maybe select an excerpt and queue it for posting.
    fn create_update(&mut self, force: bool) -> Result<()> {
        let now = now_secs();
        let current = self.state.state().cadence();
        if !cadence::should_post_now(now, &current, force, &mut self.rng) {
            log::debug!("Not posting this cycle");
            return Ok(());
        }

        let max_len = cadence::pick_length_budget(&mut self.rng);
        let today = Local::now().date_naive();
        let day_spacing = self.state.state().minimum_day_spacing();
        let mut selector = Selector::new(&self.corpus, &mut self.history, day_spacing);

        match selector.select(max_len, DEFAULT_MAX_ATTEMPTS, today, &mut self.rng) {
            Ok(excerpt) => {
                log::info!(
                    "Posting {} ({} lines, {} chars)",
                    excerpt.song,
                    excerpt.lines.len(),
                    excerpt.rendered_len()
                );
                self.journal.append(Event::Post {
                    album: excerpt.song.album.clone(),
                    track: excerpt.song.track.clone(),
                    lines: excerpt.lines.len(),
                    chars: excerpt.rendered_len(),
                })?;
                self.pending.push(PendingPost {
                    text: excerpt.text(),
                    reply_to: None,
                });
                self.state.update(|s| s.last_post_ts = Some(now));
            }
            Err(BotError::NoExcerpt(attempts)) => {
                log::info!("No excerpt found in {} attempts, trying next cycle", attempts);
                self.journal.append(Event::NoExcerpt)?;
            }
            Err(BotError::EmptyCorpus(_)) => {
                log::error!(
                    "Lyric corpus is empty; run `stanzabot fetch` to populate it"
                );
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Favorite every new mention; answer questions with a one-line reply.
    async fn handle_mentions(&mut self) -> Result<()> {
        let since = self.state.state().last_mention_id.clone();
        let mentions = match self.transport.mentions_since(since.as_deref()).await {
            Ok(mentions) => mentions,
            Err(e) => {
                log::warn!("Cannot list mentions: {}", e);
                self.journal.append(Event::TransportError {
                    context: "list mentions".to_string(),
                    error: e.to_string(),
                })?;
                return Ok(());
            }
        };

        let Some(newest) = mentions.first() else {
            return Ok(());
        };
        let newest_id = newest.id.clone();
        self.state.update(|s| s.last_mention_id = Some(newest_id));

        for mention in &mentions {
            if let Err(e) = self.transport.favorite(&mention.id).await {
                log::warn!("Cannot favorite mention {}: {}", mention.id, e);
                self.journal.append(Event::TransportError {
                    context: format!("favorite {}", mention.id),
                    error: e.to_string(),
                })?;
            }

            let mut replied = false;
            if mention.text.contains('?') {
                let budget = REPLY_BUDGET.saturating_sub(mention.author.chars().count());
                let today = Local::now().date_naive();
                let day_spacing = self.state.state().minimum_day_spacing();
                let mut selector = Selector::new(&self.corpus, &mut self.history, day_spacing);
                match selector.select(budget, DEFAULT_MAX_ATTEMPTS, today, &mut self.rng) {
                    Ok(excerpt) => {
                        // Replies carry just the opening line, addressed back.
                        self.pending.push(PendingPost {
                            text: format!("@{} {}", mention.author, excerpt.first_line()),
                            reply_to: Some(mention.id.clone()),
                        });
                        self.journal.append(Event::Reply {
                            author: mention.author.clone(),
                        })?;
                        replied = true;
                    }
                    Err(e) => {
                        log::warn!("No reply excerpt for @{}: {}", mention.author, e);
                    }
                }
            }

            if !replied {
                self.journal.append(Event::Mention {
                    author: mention.author.clone(),
                })?;
            }
        }
        Ok(())
    }

    /// Favorite every post queued by streaming mode.
    async fn handle_quotes(&mut self) -> Result<()> {
        for task in self.queue.drain()? {
            log::info!("Favoriting quoting post {}", task.post_id);
            if let Err(e) = self.transport.favorite(&task.post_id).await {
                log::warn!("Cannot favorite quoting post {}: {}", task.post_id, e);
                self.journal.append(Event::TransportError {
                    context: format!("favorite quote {}", task.post_id),
                    error: e.to_string(),
                })?;
            }
        }
        Ok(())
    }

    /// Send every post queued during the cycle.
    async fn send_pending(&mut self) -> Result<()> {
        for post in std::mem::take(&mut self.pending) {
            if let Err(e) = self
                .transport
                .post(&post.text, post.reply_to.as_deref())
                .await
            {
                log::warn!("Cannot send post: {}", e);
                self.journal.append(Event::TransportError {
                    context: format!("post {:?}", post.text),
                    error: e.to_string(),
                })?;
            }
        }
        Ok(())
    }

    /// Stamp the cycle and flush everything mutated.
    fn finish(&mut self) -> Result<()> {
        let stamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        self.state.update(|s| s.last_executed = Some(stamp));
        self.state.flush()?;
        self.history.flush()
    }
}
