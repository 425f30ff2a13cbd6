//! CI run context used to build links and the footer.

use serde::{Deserialize, Serialize};

pub const DEFAULT_SERVER_URL: &str = "https://github.com";
pub const DEFAULT_REPOSITORY: &str = "unknown/unknown";
pub const DEFAULT_RUN_ID: &str = "unknown";
pub const DEFAULT_TRIGGER: &str = "unknown";

/// Identifies the CI run that produced a summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunContext {
    pub server_url: String,
    /// `owner/name` repository slug.
    pub repository: String,
    pub run_id: String,
    /// Event that triggered the run (`push`, `schedule`, ...).
    pub trigger: String,
}

impl RunContext {
    #[must_use]
    pub fn new(
        server_url: impl Into<String>,
        repository: impl Into<String>,
        run_id: impl Into<String>,
        trigger: impl Into<String>,
    ) -> Self {
        Self {
            server_url: server_url.into(),
            repository: repository.into(),
            run_id: run_id.into(),
            trigger: trigger.into(),
        }
    }

    /// Link to the repository root.
    #[must_use]
    pub fn repository_url(&self) -> String {
        format!("{}/{}", self.server_url, self.repository)
    }

    /// Link to the CI run page.
    #[must_use]
    pub fn run_url(&self) -> String {
        format!("{}/actions/runs/{}", self.repository_url(), self.run_id)
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new(
            DEFAULT_SERVER_URL,
            DEFAULT_REPOSITORY,
            DEFAULT_RUN_ID,
            DEFAULT_TRIGGER,
        )
    }
}
