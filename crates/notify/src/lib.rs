//! Slack notifications for CI test results.
//!
//! This crate turns a test summary written by a CI pipeline into a Slack
//! Block Kit message and posts it once, either through an incoming webhook
//! or through the Web API with a bot token.
//!
//! # Usage
//!
//! ```no_run
//! use ci_notify::{NotifierConfig, Notifier, RunContext};
//!
//! # async fn run() -> Result<(), ci_notify::NotifyError> {
//! let config = NotifierConfig::new(
//!     Some("https://hooks.slack.com/services/T000/B000/XXXX".to_string()),
//!     None,
//!     None,
//! )?;
//! let notifier = Notifier::new(config)?;
//!
//! let context = RunContext::new("https://github.com", "acme/app", "1234", "push");
//! let sent = notifier.send_test_results("test-summary.json", &context).await;
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! The `slack-notifier` binary reads its settings from the command line with
//! environment fallback:
//!
//! - `SLACK_WEBHOOK_URL`: incoming webhook URL (preferred when both are set)
//! - `SLACK_BOT_TOKEN`: bot token for `chat.postMessage`
//! - `SLACK_CHANNEL`: target channel, defaults to `#salesforce-ci`
//! - `GITHUB_SERVER_URL`, `GITHUB_REPOSITORY`, `GITHUB_RUN_ID`,
//!   `GITHUB_EVENT_NAME`: run context used for links and the footer

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod context;
pub mod error;
pub mod message;
pub mod render;
pub mod slack;
pub mod summary;

pub use config::{AuthMode, NotifierConfig};
pub use context::RunContext;
pub use error::NotifyError;
pub use message::MessagePayload;
pub use render::{render_payload, CoverageTier, Outcome};
pub use slack::SlackChannel;
pub use summary::{load_summary, TestSummary};

use std::path::Path;

use chrono::Utc;
use tracing::{debug, info};

/// Loads a summary, renders it and posts it to one Slack channel.
pub struct Notifier {
    channel: String,
    slack: SlackChannel,
}

impl Notifier {
    /// Create a notifier talking to Slack directly.
    pub fn new(config: NotifierConfig) -> Result<Self, NotifyError> {
        let slack = SlackChannel::new(config.auth)?;
        Ok(Self::with_channel(slack, config.channel))
    }

    /// Create a notifier around an already configured Slack channel.
    #[must_use]
    pub fn with_channel(slack: SlackChannel, channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            slack,
        }
    }

    /// Target channel for posted messages.
    #[must_use]
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Render a summary as of now.
    #[must_use]
    pub fn render(&self, summary: &TestSummary, context: &RunContext) -> MessagePayload {
        render_payload(summary, context, self.slack.auth(), &self.channel, Utc::now())
    }

    /// Send an already rendered payload.
    pub async fn deliver(&self, payload: &MessagePayload) -> bool {
        self.slack.deliver(payload).await
    }

    /// Load, render and deliver the summary at `summary_path`.
    ///
    /// Returns whether Slack accepted the message. An unreadable summary is
    /// replaced by placeholder values rather than aborting the send.
    pub async fn send_test_results(
        &self,
        summary_path: impl AsRef<Path>,
        context: &RunContext,
    ) -> bool {
        let summary = load_summary(summary_path);
        let outcome = Outcome::of(&summary);

        info!(
            sandbox = %summary.sandbox,
            outcome = outcome.as_str(),
            passed = summary.passed_tests,
            total = summary.total_tests,
            coverage = summary.avg_coverage,
            "Sending test results"
        );

        let payload = self.render(&summary, context);
        debug!(
            blocks = payload.blocks.len(),
            color = outcome.color(),
            coverage_tier = ?CoverageTier::of(summary.avg_coverage),
            "Rendered Slack message"
        );

        self.deliver(&payload).await
    }
}
