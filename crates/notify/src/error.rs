//! Error types for the notifier.

use thiserror::Error;

/// Errors that can occur while loading a summary or delivering a message.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// No credential is configured
    #[error("Channel not configured: {0}")]
    NotConfigured(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Summary file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Webhook answered with something other than 200
    #[error("Slack webhook returned {status}: {body}")]
    Webhook { status: u16, body: String },

    /// Web API answered with `ok: false`
    #[error("Slack API error: {0}")]
    Api(String),
}
