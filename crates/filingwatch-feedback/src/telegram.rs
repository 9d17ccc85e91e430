//! Telegram Bot API client

use crate::api::{BotApi, Update};
use crate::keyboard::InlineKeyboard;
use async_trait::async_trait;
use filingwatch_core::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

/// Acknowledgement texts longer than this are clipped
const MAX_CALLBACK_TEXT_CHARS: usize = 200;

/// Bot API connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// API root, without the `/bot<token>` suffix
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Long-poll timeout for `getUpdates`
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u64,

    /// Timeout for acknowledgements and messages
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Attempts for `sendMessage` when rate limited
    #[serde(default = "default_send_attempts")]
    pub send_attempts: u32,

    /// Fixed wait between rate-limited attempts when the API gives no hint
    #[serde(default = "default_retry_backoff")]
    pub retry_backoff_secs: u64,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            poll_timeout_secs: default_poll_timeout(),
            request_timeout_secs: default_request_timeout(),
            send_attempts: default_send_attempts(),
            retry_backoff_secs: default_retry_backoff(),
        }
    }
}

fn default_api_base() -> String {
    "https://api.telegram.org".to_string()
}

fn default_poll_timeout() -> u64 {
    5
}

fn default_request_timeout() -> u64 {
    10
}

fn default_send_attempts() -> u32 {
    3
}

fn default_retry_backoff() -> u64 {
    2
}

/// Envelope of every Bot API response
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    parameters: Option<ResponseParameters>,
}

#[derive(Debug, Deserialize)]
struct ResponseParameters {
    #[serde(default)]
    retry_after: Option<u64>,
}

/// HTTP client for one bot
pub struct TelegramClient {
    client: reqwest::Client,
    bot_url: String,
    config: TelegramConfig,
}

impl TelegramClient {
    /// Create a client for the bot identified by `token`
    pub fn new(token: &str, config: TelegramConfig) -> Result<Self> {
        let token = token.trim();
        if token.is_empty() {
            return Err(Error::config("bot token is empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| Error::transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            bot_url: format!("{}/bot{}", config.api_base.trim_end_matches('/'), token),
            config,
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{}", self.bot_url, method)
    }

    fn backoff(&self, retry_after: Option<u64>) -> Duration {
        Duration::from_secs(retry_after.unwrap_or(self.config.retry_backoff_secs))
    }
}

#[async_trait]
impl BotApi for TelegramClient {
    async fn get_updates(&self, offset: i64) -> Result<Vec<Update>> {
        let poll = self.config.poll_timeout_secs;
        let resp = self
            .client
            .get(self.method_url("getUpdates"))
            .query(&[("offset", offset), ("timeout", poll as i64)])
            .timeout(Duration::from_secs(poll + 5))
            .send()
            .await
            .map_err(|e| Error::transport(format!("getUpdates failed: {}", e)))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::transport(format!("getUpdates returned {}: {}", status, body)));
        }

        let envelope: ApiResponse<Vec<Update>> = resp
            .json()
            .await
            .map_err(|e| Error::transport(format!("getUpdates body: {}", e)))?;

        if !envelope.ok {
            warn!(description = ?envelope.description, "getUpdates answered ok=false");
            return Ok(Vec::new());
        }

        let updates = envelope.result.unwrap_or_default();
        debug!(offset, count = updates.len(), "Fetched updates");
        Ok(updates)
    }

    async fn answer_callback(&self, callback_query_id: &str, text: Option<&str>) -> Result<bool> {
        let mut payload = json!({ "callback_query_id": callback_query_id });
        if let Some(text) = text.filter(|t| !t.is_empty()) {
            payload["text"] = json!(clip_chars(text, MAX_CALLBACK_TEXT_CHARS));
        }

        let resp = self
            .client
            .post(self.method_url("answerCallbackQuery"))
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::transport(format!("answerCallbackQuery failed: {}", e)))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(%status, body = %body, callback_query_id, "Callback acknowledgement rejected");
            return Ok(false);
        }
        Ok(true)
    }

    async fn send_message(
        &self,
        chat_id: &str,
        text: &str,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<bool> {
        let mut payload = json!({ "chat_id": chat_id, "text": text });
        if let Some(keyboard) = keyboard {
            payload["reply_markup"] = serde_json::to_value(keyboard)?;
        }

        let attempts = self.config.send_attempts.max(1);
        for attempt in 1..=attempts {
            let resp = self
                .client
                .post(self.method_url("sendMessage"))
                .json(&payload)
                .send()
                .await
                .map_err(|e| Error::transport(format!("sendMessage failed: {}", e)))?;

            let status = resp.status();
            if status.is_success() {
                return Ok(true);
            }

            let envelope: Option<ApiResponse<serde_json::Value>> = resp.json().await.ok();
            if status == reqwest::StatusCode::TOO_MANY_REQUESTS && attempt < attempts {
                let retry_after = envelope
                    .as_ref()
                    .and_then(|e| e.parameters.as_ref())
                    .and_then(|p| p.retry_after);
                let wait = self.backoff(retry_after);
                warn!(attempt, wait_secs = wait.as_secs(), "sendMessage rate limited, retrying");
                tokio::time::sleep(wait).await;
                continue;
            }

            let description = envelope.and_then(|e| e.description).unwrap_or_default();
            warn!(%status, description = %description, chat_id, "sendMessage rejected");
            return Ok(false);
        }

        Ok(false)
    }
}

/// First `max` characters of `text`
fn clip_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
