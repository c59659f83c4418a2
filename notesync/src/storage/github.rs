//! GitHub storage provider
//!
//! Stores one JSON document per note through the repository "contents" API.
//! The same API shape is served by Gitea under `/api/v1`, so both hosts use
//! this provider with a different base URL.
//!
//! Every write reads the current file first to obtain its SHA, which the host
//! requires as an optimistic-concurrency token when replacing a file.

use super::StorageProvider;
use crate::config::{NOTES_DIR, NOTE_FILE_SUFFIX, UNTITLED_NOTE, USER_AGENT};
use crate::error::{AppError, Result};
use crate::models::{decode_note, encode_note, Note, ProviderKind};
use async_trait::async_trait;
use futures_util::future::join_all;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Connection settings taken from the storage configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubSettings {
    pub token: String,
    pub owner: String,
    pub repo: String,
    pub branch: String,
    /// API base, e.g. `https://api.github.com`
    pub api_url: String,
}

/// Entry of a directory listing
#[derive(Deserialize, Debug)]
struct DirEntry {
    name: String,
    #[serde(default)]
    path: Option<String>,
    #[serde(rename = "type", default)]
    entry_type: Option<String>,
}

/// Single file returned by the contents API
#[derive(Deserialize, Debug)]
struct ContentFile {
    sha: String,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Serialize, Debug)]
struct WriteRequest<'a> {
    message: String,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<String>,
}

#[derive(Serialize, Debug)]
struct DeleteRequest<'a> {
    message: String,
    sha: String,
    branch: &'a str,
}

/// Provider backed by a GitHub-compatible contents API
#[derive(Clone)]
pub struct GitHubProvider {
    client: Client,
    settings: GitHubSettings,
    kind: ProviderKind,
}

impl GitHubProvider {
    /// Create a provider talking to GitHub
    pub fn new(settings: GitHubSettings) -> Result<Self> {
        Self::with_kind(settings, ProviderKind::Github)
    }

    /// Create a provider for any host exposing the same API (e.g. Gitea)
    pub fn with_kind(settings: GitHubSettings, kind: ProviderKind) -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            client,
            settings,
            kind,
        })
    }

    pub fn settings(&self) -> &GitHubSettings {
        &self.settings
    }

    fn contents_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.settings.api_url.trim_end_matches('/'),
            self.settings.owner,
            self.settings.repo,
            path
        )
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.contents_url(path))
            .header(AUTHORIZATION, format!("token {}", self.settings.token))
            .header(ACCEPT, "application/vnd.github+json")
    }

    /// Read a path on the configured branch. `None` when it does not exist.
    async fn get_contents(&self, path: &str) -> Result<Option<Value>> {
        let response = self
            .request(Method::GET, path)
            .query(&[("ref", self.settings.branch.as_str())])
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(Some(response.json().await?));
        }
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        Err(remote_error(response).await)
    }

    /// Current SHA of a file, `None` when it does not exist yet
    async fn read_sha(&self, path: &str) -> Result<Option<String>> {
        match self.get_contents(path).await? {
            Some(value) => {
                let file: ContentFile = serde_json::from_value(value)?;
                Ok(Some(file.sha))
            }
            None => Ok(None),
        }
    }

    async fn fetch_note_file(&self, path: &str) -> Result<Note> {
        let value = self
            .get_contents(path)
            .await?
            .ok_or_else(|| AppError::NoteNotFound(path.to_string()))?;

        let file: ContentFile = serde_json::from_value(value)?;
        let content = file
            .content
            .ok_or_else(|| AppError::Generic(format!("No inline content for {}", path)))?;

        decode_note(&content)
    }

    /// Delete one file. A file that is already gone counts as deleted.
    async fn remove_file(&self, path: &str, message: String) -> Result<()> {
        let sha = match self.read_sha(path).await? {
            Some(sha) => sha,
            None => {
                tracing::debug!("Remote note {} already absent", path);
                return Ok(());
            }
        };

        let body = DeleteRequest {
            message,
            sha,
            branch: &self.settings.branch,
        };

        let response = self
            .request(Method::DELETE, path)
            .json(&body)
            .send()
            .await?;
        let status = response.status();

        if status.is_success() || status == StatusCode::NOT_FOUND {
            tracing::debug!("Deleted remote note {}", path);
            return Ok(());
        }

        if status == StatusCode::CONFLICT || status == StatusCode::UNPROCESSABLE_ENTITY {
            let err = remote_error(response).await;
            tracing::warn!("Delete conflict on {}: {}", path, err);
            return Err(AppError::Conflict(format!("{}: {}", path, err)));
        }

        Err(remote_error(response).await)
    }
}

#[async_trait]
impl StorageProvider for GitHubProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    async fn fetch_notes(&self) -> Result<Vec<Note>> {
        let listing = match self.get_contents(NOTES_DIR).await? {
            Some(listing) => listing,
            None => {
                tracing::info!("No {} directory in {}, nothing to fetch", NOTES_DIR, self.settings.repo);
                return Ok(Vec::new());
            }
        };

        let entries: Vec<DirEntry> = match listing {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
            _ => {
                tracing::debug!("{} is not a directory listing, treating as empty", NOTES_DIR);
                return Ok(Vec::new());
            }
        };

        let paths: Vec<String> = entries
            .into_iter()
            .filter(|entry| entry.name.ends_with(NOTE_FILE_SUFFIX))
            .filter(|entry| entry.entry_type.as_deref().map_or(true, |t| t == "file"))
            .map(|entry| {
                entry
                    .path
                    .unwrap_or_else(|| format!("{}/{}", NOTES_DIR, entry.name))
            })
            .collect();

        let results = join_all(paths.iter().map(|path| self.fetch_note_file(path))).await;

        let mut notes = Vec::with_capacity(paths.len());
        for (path, result) in paths.iter().zip(results) {
            match result {
                Ok(mut note) => {
                    note.located_at(path.as_str());
                    notes.push(note);
                }
                Err(e) => tracing::warn!("Skipping remote note {}: {}", path, e),
            }
        }

        tracing::debug!(
            "Fetched {} of {} remote note documents",
            notes.len(),
            paths.len()
        );

        Ok(notes)
    }

    async fn save_note(&self, note: &Note) -> Result<()> {
        let path = note.canonical_path();

        // A failed pre-read is not fatal: the write goes out without a token
        // and may overwrite a concurrent update.
        let sha = match self.read_sha(&path).await {
            Ok(sha) => sha,
            Err(e) => {
                tracing::warn!(
                    "Could not read current version of {}, writing without sha: {}",
                    path,
                    e
                );
                None
            }
        };

        let action = if sha.is_some() { "Update" } else { "Create" };
        let body = WriteRequest {
            message: change_message(action, note),
            content: encode_note(note)?,
            branch: &self.settings.branch,
            sha,
        };

        let response = self.request(Method::PUT, &path).json(&body).send().await?;
        let status = response.status();

        if status.is_success() {
            tracing::debug!("{}d remote note {}", action, path);

            // The document moved; drop the copy at its old location
            if let Some(old_path) = note.stale_path() {
                tracing::info!("Moved remote note {} to {}", old_path, path);
                self.remove_file(old_path, change_message("Move", note))
                    .await?;
            }
            return Ok(());
        }

        if status == StatusCode::CONFLICT || status == StatusCode::UNPROCESSABLE_ENTITY {
            let err = remote_error(response).await;
            tracing::warn!("Write conflict on {}: {}", path, err);
            return Err(AppError::Conflict(format!("{}: {}", path, err)));
        }

        Err(remote_error(response).await)
    }

    async fn delete_note(&self, note: &Note) -> Result<()> {
        self.remove_file(&note.remote_path(), change_message("Delete", note))
            .await
    }
}

/// Commit message accompanying a write
fn change_message(action: &str, note: &Note) -> String {
    let title = note.title().trim();
    let title = if title.is_empty() { UNTITLED_NOTE } else { title };
    format!("{} note: {}", action, title)
}

/// Turn a non-success response into an error, keeping the host's message
async fn remote_error(response: Response) -> AppError {
    let status = response.status().as_u16();
    let text = response.text().await.unwrap_or_default();

    let message = serde_json::from_str::<Value>(&text)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or(text);

    AppError::Remote { status, message }
}
