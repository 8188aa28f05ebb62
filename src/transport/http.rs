//! HTTP transport implementation.
//!
//! A thin JSON client against a configured base URL with bearer-token
//! authentication. The endpoint shapes are deliberately minimal; anything
//! provider-specific belongs behind a gateway, not in the bot.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::{Mention, QuoteEvent, Transport};
use crate::error::{BotError, Result};

/// Request timeout for regular calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Long-poll timeout for the quote event stream.
const STREAM_TIMEOUT: Duration = Duration::from_secs(90);

#[derive(Debug, Deserialize)]
struct PostResponse {
    id: String,
}

/// Transport over a JSON HTTP API.
pub struct HttpTransport {
    client: Client,
    stream_client: Client,
    base_url: String,
    token: String,
}

impl HttpTransport {
    /// Create a transport for `base_url`, reading the bearer token from the
    /// environment variable named by `token_env`.
    pub fn new(base_url: &str, token_env: &str) -> Result<Self> {
        if base_url.is_empty() {
            return Err(BotError::Transport(
                "api base-url is not configured".to_string(),
            ));
        }
        let token = std::env::var(token_env)
            .map_err(|_| BotError::Transport(format!("{} not set", token_env)))?;

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| BotError::Transport(format!("cannot build HTTP client: {}", e)))?;
        let stream_client = Client::builder()
            .timeout(STREAM_TIMEOUT)
            .build()
            .map_err(|e| BotError::Transport(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            stream_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn check(response: reqwest::Response, context: &str) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(BotError::Transport(format!(
            "{} failed with {}: {}",
            context, status, body
        )))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, text: &str, reply_to: Option<&str>) -> Result<String> {
        let mut body = json!({ "text": text });
        if let Some(id) = reply_to {
            body["in_reply_to"] = json!(id);
        }

        let response = self
            .client
            .post(self.url("statuses"))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| BotError::Transport(e.to_string()))?;

        let response = Self::check(response, "post").await?;
        let parsed: PostResponse = response
            .json()
            .await
            .map_err(|e| BotError::Transport(format!("bad post response: {}", e)))?;
        Ok(parsed.id)
    }

    async fn favorite(&self, post_id: &str) -> Result<()> {
        let response = self
            .client
            .post(self.url(&format!("favorites/{}", post_id)))
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| BotError::Transport(e.to_string()))?;

        Self::check(response, "favorite").await?;
        Ok(())
    }

    async fn mentions_since(&self, since_id: Option<&str>) -> Result<Vec<Mention>> {
        let mut request = self
            .client
            .get(self.url("mentions"))
            .bearer_auth(&self.token);
        if let Some(id) = since_id {
            request = request.query(&[("since_id", id)]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| BotError::Transport(e.to_string()))?;

        let response = Self::check(response, "list mentions").await?;
        response
            .json()
            .await
            .map_err(|e| BotError::Transport(format!("bad mentions response: {}", e)))
    }

    async fn next_quote(&self) -> Result<Option<QuoteEvent>> {
        let response = self
            .stream_client
            .get(self.url("events/quotes"))
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| BotError::Transport(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let response = Self::check(response, "quote stream").await?;
        let event: QuoteEvent = response
            .json()
            .await
            .map_err(|e| BotError::Transport(format!("bad quote event: {}", e)))?;
        Ok(Some(event))
    }

    async fn disconnect(&self) -> Result<()> {
        // Plain HTTP long-polling holds no server-side session.
        log::debug!("Disconnecting from {}", self.base_url);
        Ok(())
    }
}
