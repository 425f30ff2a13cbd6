//! Slack delivery over an incoming webhook or the Web API.

use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::config::AuthMode;
use crate::error::NotifyError;
use crate::message::MessagePayload;

/// Base URL for the Slack Web API.
pub const SLACK_API_BASE: &str = "https://slack.com/api";

/// Request timeout for every delivery attempt.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Delivers rendered messages to Slack.
pub struct SlackChannel {
    auth: AuthMode,
    api_base: String,
    client: reqwest::Client,
}

impl SlackChannel {
    /// Create a channel with the default 30 second timeout.
    pub fn new(auth: AuthMode) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            auth,
            api_base: SLACK_API_BASE.to_string(),
            client,
        })
    }

    /// Point bot-token requests at a different Web API base URL.
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Replace the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, NotifyError> {
        self.client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    #[must_use]
    pub const fn auth(&self) -> &AuthMode {
        &self.auth
    }

    /// Send the payload once, reporting the outcome as a boolean.
    ///
    /// Never fails past this point: every error is logged and turned into
    /// `false`.
    pub async fn deliver(&self, payload: &MessagePayload) -> bool {
        match self.send(payload).await {
            Ok(()) => {
                info!(
                    mode = self.auth.as_str(),
                    channel = %payload.channel,
                    "Slack notification sent"
                );
                true
            }
            Err(e) => {
                error!(
                    mode = self.auth.as_str(),
                    error = %e,
                    "Failed to send Slack notification"
                );
                false
            }
        }
    }

    /// Send the payload once.
    pub async fn send(&self, payload: &MessagePayload) -> Result<(), NotifyError> {
        match &self.auth {
            AuthMode::Webhook { url } => self.send_webhook(url, payload).await,
            AuthMode::BotToken { token } => self.send_bot(token, payload).await,
        }
    }

    async fn send_webhook(&self, url: &str, payload: &MessagePayload) -> Result<(), NotifyError> {
        debug!(channel = "slack", mode = "webhook", "Sending notification");

        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::OK {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(NotifyError::Webhook {
            status: status.as_u16(),
            body,
        })
    }

    async fn send_bot(&self, token: &str, payload: &MessagePayload) -> Result<(), NotifyError> {
        let url = format!("{}/chat.postMessage", self.api_base);
        debug!(channel = "slack", mode = "bot", url = %url, "Sending notification");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {token}"))
            .header("Content-Type", "application/json")
            .json(payload)
            .send()
            .await?;

        // chat.postMessage reports failures in the body, not the status.
        let body = response.text().await?;
        let result: PostMessageResponse = serde_json::from_str(&body)?;

        if result.is_ok() {
            Ok(())
        } else {
            Err(NotifyError::Api(result.error_message()))
        }
    }
}

// =============================================================================
// Slack API types
// =============================================================================

#[derive(Debug, Deserialize)]
struct PostMessageResponse {
    #[serde(default)]
    ok: Value,
    #[serde(default)]
    error: Value,
}

impl PostMessageResponse {
    /// `ok` counts when truthy, not only when it is literally `true`.
    fn is_ok(&self) -> bool {
        match &self.ok {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
            Value::String(s) => !s.is_empty(),
            Value::Array(items) => !items.is_empty(),
            Value::Object(fields) => !fields.is_empty(),
        }
    }

    fn error_message(&self) -> String {
        match &self.error {
            Value::Null => "Unknown error".to_string(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}
