//! Long-lived streaming mode.
//!
//! Blocks on the transport's quote-event source and hands each event to the
//! persisted favorite queue for the next run cycle to act on. Events are
//! handled strictly one at a time. Ctrl-C disconnects cleanly.

use std::time::Duration;

use crate::error::Result;
use crate::store::FavoriteQueue;
use crate::transport::Transport;

/// Pause after a stream error before retrying.
const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Run the event loop until the source ends or Ctrl-C arrives.
pub async fn run<T: Transport>(transport: &T, queue: &FavoriteQueue) -> Result<()> {
    log::info!("Streaming quote events; Ctrl-C to disconnect");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                log::info!("Interrupt received, disconnecting");
                transport.disconnect().await?;
                return Ok(());
            }
            event = transport.next_quote() => match event {
                Ok(Some(quote)) => {
                    log::info!("Queuing favorite for quoting post {}", quote.post_id);
                    queue.push(&quote.post_id)?;
                }
                Ok(None) => {
                    log::info!("Quote event source ended");
                    transport.disconnect().await?;
                    return Ok(());
                }
                Err(e) => {
                    log::warn!("Quote stream error, retrying: {}", e);
                    tokio::time::sleep(RETRY_DELAY).await;
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockTransport;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_quotes_are_queued_until_source_ends() {
        let temp = TempDir::new().unwrap();
        let queue = FavoriteQueue::new(temp.path().join("favorites.jsonl"));
        let transport = MockTransport::new();
        transport.push_quote("111");
        transport.push_quote("222");

        run(&transport, &queue).await.unwrap();

        let tasks = queue.drain().unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].post_id, "111");
        assert_eq!(tasks[1].post_id, "222");
    }

    #[tokio::test]
    async fn test_empty_source_exits_immediately() {
        let temp = TempDir::new().unwrap();
        let queue = FavoriteQueue::new(temp.path().join("favorites.jsonl"));
        let transport = MockTransport::new();

        run(&transport, &queue).await.unwrap();
        assert!(queue.drain().unwrap().is_empty());
    }
}
