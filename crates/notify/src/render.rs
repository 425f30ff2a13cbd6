//! Rendering of a test summary into a Slack message.

use chrono::{DateTime, Utc};

use crate::config::AuthMode;
use crate::context::RunContext;
use crate::message::{Block, Button, MessagePayload, TextObject};
use crate::summary::TestSummary;

/// Coverage at or above this is considered healthy.
pub const COVERAGE_GOOD_THRESHOLD: f64 = 75.0;

/// Coverage below this is considered bad.
pub const COVERAGE_WARNING_THRESHOLD: f64 = 50.0;

/// Display name used for webhook posts.
pub const WEBHOOK_USERNAME: &str = "Salesforce CI Bot";

/// Icon used for webhook posts.
pub const WEBHOOK_ICON_EMOJI: &str = ":salesforce:";

/// Overall result of a test run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failed,
}

impl Outcome {
    /// A run only succeeds if it ran something and nothing failed.
    #[must_use]
    pub const fn of(summary: &TestSummary) -> Self {
        if summary.total_tests > 0 && summary.failed_tests == 0 {
            Self::Success
        } else {
            Self::Failed
        }
    }

    #[must_use]
    pub const fn emoji(self) -> &'static str {
        match self {
            Self::Success => "✅",
            Self::Failed => "❌",
        }
    }

    /// Attachment colour for this outcome.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Success => "#36a64f", // Green
            Self::Failed => "#ff0000",  // Red
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
        }
    }
}

/// Coverage health bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverageTier {
    Good,
    Warning,
    Bad,
}

impl CoverageTier {
    #[must_use]
    pub fn of(coverage: f64) -> Self {
        if coverage >= COVERAGE_GOOD_THRESHOLD {
            Self::Good
        } else if coverage >= COVERAGE_WARNING_THRESHOLD {
            Self::Warning
        } else {
            Self::Bad
        }
    }

    #[must_use]
    pub const fn marker(self) -> &'static str {
        match self {
            Self::Good => "✅",
            Self::Warning => "⚠️",
            Self::Bad => "❌",
        }
    }
}

/// Build the message for a summary.
///
/// Pure: the clock is passed in so output is reproducible.
#[must_use]
pub fn render_payload(
    summary: &TestSummary,
    context: &RunContext,
    auth: &AuthMode,
    channel: &str,
    now: DateTime<Utc>,
) -> MessagePayload {
    let outcome = Outcome::of(summary);
    let coverage = summary.avg_coverage;
    let tier = CoverageTier::of(coverage);
    let sandbox = &summary.sandbox;
    let emoji = outcome.emoji();

    let mut blocks = vec![
        Block::header(format!("{emoji} Salesforce Test Results - {sandbox}")),
        Block::field_section(vec![
            TextObject::mrkdwn(format!("*Environment:*\n{sandbox}")),
            TextObject::mrkdwn(format!("*Status:*\n{emoji} {}", outcome.as_str())),
            TextObject::mrkdwn(format!(
                "*Tests:*\n{}/{} passed",
                summary.passed_tests, summary.total_tests
            )),
            TextObject::mrkdwn(format!("*Coverage:*\n{coverage}% {}", tier.marker())),
        ]),
    ];

    if summary.failed_tests > 0 {
        blocks.push(Block::text_section(format!(
            "⚠️ *{} tests failed* - Immediate attention required",
            summary.failed_tests
        )));
    }

    if coverage < COVERAGE_GOOD_THRESHOLD {
        blocks.push(Block::text_section(format!(
            "📊 *Coverage Alert:* {coverage}% is below the recommended 75% threshold"
        )));
    }

    blocks.push(Block::Actions {
        elements: vec![
            Button::link("View Detailed Report", context.run_url()).primary(),
            Button::link("View Repository", context.repository_url()),
        ],
    });

    blocks.push(Block::Context {
        elements: vec![TextObject::mrkdwn(format!(
            "🤖 Triggered by: {} | 📅 {}",
            context.trigger,
            now.format("%Y-%m-%d %H:%M:%S UTC")
        ))],
    });

    let text = format!(
        "{emoji} Salesforce tests {} for {sandbox} - {}/{} tests passed, {coverage}% coverage",
        outcome.as_str().to_lowercase(),
        summary.passed_tests,
        summary.total_tests
    );

    let (username, icon_emoji) = match auth {
        AuthMode::Webhook { .. } => (
            Some(WEBHOOK_USERNAME.to_string()),
            Some(WEBHOOK_ICON_EMOJI.to_string()),
        ),
        AuthMode::BotToken { .. } => (None, None),
    };

    MessagePayload {
        channel: channel.to_string(),
        username,
        icon_emoji,
        blocks,
        text,
    }
}
