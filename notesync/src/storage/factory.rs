//! Storage factory
//!
//! Picks and builds the provider for a configuration. Disabled, local-only
//! or incomplete configurations produce no provider, which callers treat as
//! "sync off".

use super::{GitHubProvider, GitHubSettings, StorageProvider, StubProvider};
use crate::config::{DEFAULT_BRANCH, GITEA_API_SUFFIX, GITHUB_API_URL};
use crate::models::storage_config::non_empty;
use crate::models::{ProviderKind, StorageConfig};
use std::sync::Arc;

/// Build the active provider for `config`, or `None` when sync is off
pub fn create_provider(config: &StorageConfig) -> Option<Arc<dyn StorageProvider>> {
    if !config.enabled {
        return None;
    }

    match config.provider {
        ProviderKind::Local => {
            tracing::debug!("Local storage selected, no remote provider");
            None
        }
        ProviderKind::Github => {
            let api_url = non_empty(&config.api_url).unwrap_or(GITHUB_API_URL);
            build_github(config, api_url.to_string(), ProviderKind::Github)
        }
        ProviderKind::Gitea => {
            let Some(endpoint) = non_empty(&config.endpoint) else {
                tracing::warn!("Gitea storage selected without an endpoint, sync disabled");
                return None;
            };
            let api_url = format!("{}{}", endpoint.trim_end_matches('/'), GITEA_API_SUFFIX);
            build_github(config, api_url, ProviderKind::Gitea)
        }
        kind @ (ProviderKind::Gitlab | ProviderKind::S3 | ProviderKind::Webdav) => {
            Some(Arc::new(StubProvider::new(kind)))
        }
    }
}

fn build_github(
    config: &StorageConfig,
    api_url: String,
    kind: ProviderKind,
) -> Option<Arc<dyn StorageProvider>> {
    let (Some(token), Some(owner), Some(repo)) = (
        non_empty(&config.token),
        non_empty(&config.owner),
        non_empty(&config.repo),
    ) else {
        tracing::warn!("{} storage needs token, owner and repo, sync disabled", kind);
        return None;
    };

    let settings = GitHubSettings {
        token: token.to_string(),
        owner: owner.to_string(),
        repo: repo.to_string(),
        branch: non_empty(&config.branch)
            .unwrap_or(DEFAULT_BRANCH)
            .to_string(),
        api_url,
    };

    match GitHubProvider::with_kind(settings, kind) {
        Ok(provider) => Some(Arc::new(provider)),
        Err(e) => {
            tracing::warn!("Failed to create {} client: {}", kind, e);
            None
        }
    }
}
