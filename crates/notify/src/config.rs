//! Command-line and environment configuration.
//!
//! All process environment reads happen while parsing [`Args`]; the rest of
//! the crate only sees the resolved [`NotifierConfig`] and [`RunContext`].

use std::path::PathBuf;

use clap::Parser;
use tracing::debug;

use crate::context::{
    RunContext, DEFAULT_REPOSITORY, DEFAULT_RUN_ID, DEFAULT_SERVER_URL, DEFAULT_TRIGGER,
};
use crate::error::NotifyError;

/// Environment variable for the Slack webhook URL.
pub const ENV_SLACK_WEBHOOK_URL: &str = "SLACK_WEBHOOK_URL";

/// Environment variable for the Slack bot token.
pub const ENV_SLACK_BOT_TOKEN: &str = "SLACK_BOT_TOKEN";

/// Channel posted to when none is configured.
pub const DEFAULT_CHANNEL: &str = "#salesforce-ci";

/// How the notifier authenticates with Slack.
#[derive(Clone, PartialEq, Eq)]
pub enum AuthMode {
    /// Incoming webhook; the URL carries both secret and destination.
    Webhook { url: String },
    /// Bot token sent as a bearer credential to the Web API.
    BotToken { token: String },
}

impl AuthMode {
    /// Pick the auth mode from the available credentials.
    ///
    /// Empty values count as missing. If both are present the webhook wins.
    pub fn from_credentials(
        webhook_url: Option<String>,
        bot_token: Option<String>,
    ) -> Result<Self, NotifyError> {
        let webhook_url = webhook_url.filter(|v| !v.trim().is_empty());
        let bot_token = bot_token.filter(|v| !v.trim().is_empty());

        match (webhook_url, bot_token) {
            (Some(url), token) => {
                if token.is_some() {
                    debug!("Both webhook URL and bot token set, using webhook");
                }
                Ok(Self::Webhook { url })
            }
            (None, Some(token)) => Ok(Self::BotToken { token }),
            (None, None) => Err(NotifyError::NotConfigured(format!(
                "either {ENV_SLACK_WEBHOOK_URL} or {ENV_SLACK_BOT_TOKEN} must be set"
            ))),
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Webhook { .. } => "webhook",
            Self::BotToken { .. } => "bot token",
        }
    }
}

// Credentials stay out of logs.
impl std::fmt::Debug for AuthMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthMode")
            .field("mode", &self.as_str())
            .finish_non_exhaustive()
    }
}

/// Resolved notifier settings.
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    pub auth: AuthMode,
    pub channel: String,
}

impl NotifierConfig {
    pub fn new(
        webhook_url: Option<String>,
        bot_token: Option<String>,
        channel: Option<String>,
    ) -> Result<Self, NotifyError> {
        let auth = AuthMode::from_credentials(webhook_url, bot_token)?;
        let channel = channel
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CHANNEL.to_string());

        Ok(Self { auth, channel })
    }
}

/// Post CI test results to Slack.
#[derive(Debug, Parser)]
#[command(name = "slack-notifier")]
#[command(about = "Post a CI test-result summary to Slack")]
#[command(version)]
pub struct Args {
    /// Path to the JSON test summary.
    pub summary_file: PathBuf,

    /// CI server URL.
    #[arg(env = "GITHUB_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    pub server_url: String,

    /// Repository slug (owner/name).
    #[arg(env = "GITHUB_REPOSITORY", default_value = DEFAULT_REPOSITORY)]
    pub repository: String,

    /// CI run identifier.
    #[arg(env = "GITHUB_RUN_ID", default_value = DEFAULT_RUN_ID)]
    pub run_id: String,

    /// Event that triggered the run.
    #[arg(env = "GITHUB_EVENT_NAME", default_value = DEFAULT_TRIGGER)]
    pub trigger: String,

    /// Slack incoming webhook URL (takes priority over the bot token).
    #[arg(long, env = ENV_SLACK_WEBHOOK_URL, hide_env_values = true)]
    pub webhook_url: Option<String>,

    /// Slack bot token.
    #[arg(long, env = ENV_SLACK_BOT_TOKEN, hide_env_values = true)]
    pub bot_token: Option<String>,

    /// Target channel.
    #[arg(long, env = "SLACK_CHANNEL", default_value = DEFAULT_CHANNEL)]
    pub channel: String,

    /// Enable verbose logging.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    #[must_use]
    pub fn run_context(&self) -> RunContext {
        RunContext::new(
            self.server_url.clone(),
            self.repository.clone(),
            self.run_id.clone(),
            self.trigger.clone(),
        )
    }

    pub fn notifier_config(&self) -> Result<NotifierConfig, NotifyError> {
        NotifierConfig::new(
            self.webhook_url.clone(),
            self.bot_token.clone(),
            Some(self.channel.clone()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const CI_VARS: [&str; 7] = [
        "GITHUB_SERVER_URL",
        "GITHUB_REPOSITORY",
        "GITHUB_RUN_ID",
        "GITHUB_EVENT_NAME",
        "SLACK_WEBHOOK_URL",
        "SLACK_BOT_TOKEN",
        "SLACK_CHANNEL",
    ];

    fn clear_env() {
        for var in CI_VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_webhook_takes_priority() {
        let auth = AuthMode::from_credentials(
            Some("https://hooks.example/x".to_string()),
            Some("xoxb-1".to_string()),
        )
        .unwrap();
        assert_eq!(
            auth,
            AuthMode::Webhook {
                url: "https://hooks.example/x".to_string()
            }
        );
    }

    #[test]
    fn test_bot_token_only() {
        let auth = AuthMode::from_credentials(None, Some("xoxb-1".to_string())).unwrap();
        assert_eq!(
            auth,
            AuthMode::BotToken {
                token: "xoxb-1".to_string()
            }
        );
    }

    #[test]
    fn test_no_credentials() {
        let err = AuthMode::from_credentials(None, None).unwrap_err();
        assert!(matches!(err, NotifyError::NotConfigured(_)));
    }

    #[test]
    fn test_empty_credentials_are_missing() {
        let err = AuthMode::from_credentials(Some(String::new()), Some("  ".to_string()))
            .unwrap_err();
        assert!(matches!(err, NotifyError::NotConfigured(_)));
    }

    #[test]
    fn test_debug_hides_secrets() {
        let auth = AuthMode::BotToken {
            token: "xoxb-secret".to_string(),
        };
        let rendered = format!("{auth:?}");
        assert!(!rendered.contains("xoxb-secret"));
        assert!(rendered.contains("bot token"));
    }

    #[test]
    fn test_default_channel() {
        let config = NotifierConfig::new(None, Some("xoxb-1".to_string()), None).unwrap();
        assert_eq!(config.channel, DEFAULT_CHANNEL);
    }

    #[test]
    #[serial]
    fn test_args_fall_back_to_env_then_defaults() {
        clear_env();
        std::env::set_var("GITHUB_REPOSITORY", "acme/app");
        std::env::set_var("GITHUB_RUN_ID", "42");
        std::env::set_var("SLACK_BOT_TOKEN", "xoxb-env");

        let args = Args::try_parse_from(["slack-notifier", "summary.json"]).unwrap();
        let ctx = args.run_context();
        assert_eq!(ctx.server_url, "https://github.com");
        assert_eq!(ctx.repository, "acme/app");
        assert_eq!(ctx.run_id, "42");
        assert_eq!(ctx.trigger, "unknown");

        let config = args.notifier_config().unwrap();
        assert_eq!(config.channel, "#salesforce-ci");
        assert_eq!(
            config.auth,
            AuthMode::BotToken {
                token: "xoxb-env".to_string()
            }
        );

        clear_env();
    }

    #[test]
    #[serial]
    fn test_positional_args_override_env() {
        clear_env();
        std::env::set_var("GITHUB_REPOSITORY", "acme/from-env");
        std::env::set_var("SLACK_CHANNEL", "#qa");

        let args = Args::try_parse_from([
            "slack-notifier",
            "summary.json",
            "https://git.example.com",
            "acme/from-args",
            "7",
            "schedule",
        ])
        .unwrap();
        let ctx = args.run_context();
        assert_eq!(ctx.server_url, "https://git.example.com");
        assert_eq!(ctx.repository, "acme/from-args");
        assert_eq!(ctx.run_id, "7");
        assert_eq!(ctx.trigger, "schedule");
        assert_eq!(args.channel, "#qa");

        clear_env();
    }

    #[test]
    #[serial]
    fn test_missing_credentials_rejected() {
        clear_env();
        let args = Args::try_parse_from(["slack-notifier", "summary.json"]).unwrap();
        assert!(args.notifier_config().is_err());
    }

    #[test]
    fn test_summary_file_required() {
        assert!(Args::try_parse_from(["slack-notifier"]).is_err());
    }
}
