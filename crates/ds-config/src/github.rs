//! GitHub repository storage configuration.

use serde::{Deserialize, Serialize};

/// Default GitHub REST API base URL.
fn default_api_url() -> String {
    String::from("https://api.github.com")
}

#[derive(Clone, Deserialize, Serialize)]
pub struct GitHubConfig {
    /// Personal access token with contents read/write scope.
    #[serde(default)]
    pub token: String,

    /// Repository owner (user or organization).
    #[serde(default)]
    pub owner: String,

    /// Repository name.
    #[serde(default)]
    pub repo: String,

    /// Branch to read from and commit to. Empty means the default branch.
    #[serde(default)]
    pub branch: String,

    /// REST API base URL. Override for GitHub Enterprise.
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            owner: String::new(),
            repo: String::new(),
            branch: String::new(),
            api_url: default_api_url(),
        }
    }
}

// Manual Debug so the token never lands in logs.
impl std::fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("token", &redact(&self.token))
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("branch", &self.branch)
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl GitHubConfig {
    /// Check if the GitHub config has the minimum required fields.
    pub fn is_configured(&self) -> bool {
        !self.token.is_empty() && !self.owner.is_empty() && !self.repo.is_empty()
    }

    /// The branch to target, if one was set.
    pub fn branch(&self) -> Option<&str> {
        Some(self.branch.as_str()).filter(|b| !b.is_empty())
    }
}

pub(crate) fn redact(secret: &str) -> &'static str {
    if secret.is_empty() { "<unset>" } else { "<redacted>" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_not_configured() {
        let config = GitHubConfig::default();
        assert!(!config.is_configured());
        assert_eq!(config.api_url, "https://api.github.com");
        assert!(config.branch().is_none());
    }

    #[test]
    fn configured_when_token_owner_repo_set() {
        let config = GitHubConfig {
            token: "ghp_abc".into(),
            owner: "someone".into(),
            repo: "room-tracker".into(),
            ..Default::default()
        };
        assert!(config.is_configured());
    }

    #[test]
    fn not_configured_when_missing_token() {
        let config = GitHubConfig {
            owner: "someone".into(),
            repo: "room-tracker".into(),
            ..Default::default()
        };
        assert!(!config.is_configured());
    }

    #[test]
    fn debug_output_hides_token() {
        let config = GitHubConfig {
            token: "ghp_secret".into(),
            ..Default::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("ghp_secret"));
        assert!(debug.contains("<redacted>"));
    }
}
