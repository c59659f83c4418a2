//! Storage configuration record
//!
//! Edited by the user, persisted locally by the config store and read fresh
//! on every sync attempt. Credential fields are flat and optional; each
//! provider picks only the ones it needs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Backing technology of the remote store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Github,
    Gitlab,
    Gitea,
    S3,
    Webdav,
    Local,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Github => "github",
            ProviderKind::Gitlab => "gitlab",
            ProviderKind::Gitea => "gitea",
            ProviderKind::S3 => "s3",
            ProviderKind::Webdav => "webdav",
            ProviderKind::Local => "local",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "github" => Ok(ProviderKind::Github),
            "gitlab" => Ok(ProviderKind::Gitlab),
            "gitea" => Ok(ProviderKind::Gitea),
            "s3" => Ok(ProviderKind::S3),
            "webdav" => Ok(ProviderKind::Webdav),
            "local" => Ok(ProviderKind::Local),
            other => Err(format!(
                "Unknown provider '{}'. Use github, gitlab, gitea, s3, webdav or local",
                other
            )),
        }
    }
}

/// Remote storage settings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageConfig {
    #[serde(default)]
    pub provider: ProviderKind,
    /// Master switch; nothing syncs while false
    #[serde(default)]
    pub enabled: bool,

    // GitHub / Gitea
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Override for GitHub Enterprise or other compatible hosts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    // S3
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    // WebDAV / Gitea / GitLab
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl StorageConfig {
    /// Enabled GitHub configuration
    pub fn github(token: &str, owner: &str, repo: &str) -> Self {
        Self {
            provider: ProviderKind::Github,
            enabled: true,
            token: Some(token.to_string()),
            owner: Some(owner.to_string()),
            repo: Some(repo.to_string()),
            ..Self::default()
        }
    }
}

/// Trimmed, non-empty value of an optional field
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
