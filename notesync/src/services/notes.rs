//! Notes service
//!
//! High-level note operations. Writes are local-first: the cache is updated
//! and becomes authoritative right away, then the change is pushed to the
//! remote provider on a best-effort basis. A failed push is reported but
//! never rolls back the local change.

use super::notifier::{Notification, SyncNotifier};
use crate::error::{AppError, Result};
use crate::models::{Note, NoteType};
use crate::storage::{LocalCache, StorageProvider};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Create note request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateNoteRequest {
    pub title: String,
    #[serde(default)]
    pub note_type: NoteType,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

/// Update note request; `None` fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateNoteRequest {
    pub id: String,
    pub title: Option<String>,
    pub content: Option<String>,
    pub note_type: Option<NoteType>,
    pub tags: Option<BTreeSet<String>>,
    pub file_name: Option<String>,
}

/// What happened to the remote copy after a local write
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum RemotePush {
    /// No provider is active
    Skipped,
    Pushed,
    Failed { message: String },
}

/// A locally saved note and the fate of its remote push
#[derive(Debug, Clone, Serialize)]
pub struct SavedNote {
    pub note: Note,
    pub remote: RemotePush,
}

/// Service for managing notes
#[derive(Clone)]
pub struct NotesService {
    cache: LocalCache,
    notifier: Arc<dyn SyncNotifier>,
}

impl NotesService {
    pub fn new(cache: LocalCache, notifier: Arc<dyn SyncNotifier>) -> Self {
        Self { cache, notifier }
    }

    /// Create a new note
    pub async fn create_note(
        &self,
        provider: Option<&dyn StorageProvider>,
        req: CreateNoteRequest,
    ) -> Result<SavedNote> {
        tracing::info!("Creating new note: {}", req.title);

        let mut note = Note::new(req.title, req.note_type);
        note.content = req.content;
        note.metadata.parent_id = req.parent_id;
        note.metadata.tags = req.tags;

        self.cache.upsert(note.clone()).await?;
        let remote = self.push_save(provider, &mut note).await?;

        tracing::info!("Note created successfully: {}", note.id());

        Ok(SavedNote { note, remote })
    }

    /// Save a full note document, bumping its modification time
    pub async fn save_note(
        &self,
        provider: Option<&dyn StorageProvider>,
        mut note: Note,
    ) -> Result<SavedNote> {
        tracing::debug!("Saving note: {}", note.id());

        // The cached copy knows where the remote document lives now
        if let Some(cached) = self.cache.get(note.id()).await? {
            note.located_at(cached.remote_path());
        }

        note.touch();
        self.cache.upsert(note.clone()).await?;
        let remote = self.push_save(provider, &mut note).await?;

        Ok(SavedNote { note, remote })
    }

    /// Apply a partial update to a cached note
    pub async fn update_note(
        &self,
        provider: Option<&dyn StorageProvider>,
        req: UpdateNoteRequest,
    ) -> Result<SavedNote> {
        let mut note = self.get_note(&req.id).await?;

        if let Some(title) = req.title {
            note.metadata.title = title;
        }
        if let Some(content) = req.content {
            note.content = content;
        }
        if let Some(note_type) = req.note_type {
            note.metadata.note_type = note_type;
        }
        if let Some(tags) = req.tags {
            note.metadata.tags = tags;
        }
        if let Some(file_name) = req.file_name {
            note.metadata.file_name = Some(file_name);
        }

        self.save_note(provider, note).await
    }

    /// Delete a note locally, then remotely
    pub async fn delete_note(
        &self,
        provider: Option<&dyn StorageProvider>,
        id: &str,
    ) -> Result<RemotePush> {
        tracing::info!("Deleting note: {}", id);

        let note = self
            .cache
            .remove(id)
            .await?
            .ok_or_else(|| AppError::NoteNotFound(id.to_string()))?;

        let Some(provider) = provider else {
            return Ok(RemotePush::Skipped);
        };

        match provider.delete_note(&note).await {
            Ok(()) => {
                tracing::info!("Note deleted successfully: {}", id);
                Ok(RemotePush::Pushed)
            }
            Err(e) => Ok(self.push_failed("Failed to delete remote note", id, e)),
        }
    }

    /// Get a note by ID
    pub async fn get_note(&self, id: &str) -> Result<Note> {
        self.cache
            .get(id)
            .await?
            .ok_or_else(|| AppError::NoteNotFound(id.to_string()))
    }

    /// List all notes, most recently updated first
    pub async fn list_notes(&self) -> Result<Vec<Note>> {
        let mut notes: Vec<Note> = self.cache.load_all().await?.into_values().collect();
        notes.sort_by(|a, b| b.metadata.updated_at.cmp(&a.metadata.updated_at));
        Ok(notes)
    }

    /// Search notes by title, content or tag
    pub async fn search_notes(&self, query: &str) -> Result<Vec<Note>> {
        let all_notes = self.list_notes().await?;

        let query_lower = query.to_lowercase();

        let filtered: Vec<Note> = all_notes
            .into_iter()
            .filter(|note| {
                note.metadata.title.to_lowercase().contains(&query_lower)
                    || note.content.to_lowercase().contains(&query_lower)
                    || note
                        .metadata
                        .tags
                        .iter()
                        .any(|tag| tag.to_lowercase().contains(&query_lower))
            })
            .collect();

        Ok(filtered)
    }

    /// Notes without a parent.
    ///
    /// A note whose parent id points at a missing note is not a root and is
    /// not reachable from one; neither is a note inside a parent cycle.
    pub async fn root_notes(&self) -> Result<Vec<Note>> {
        let notes = self.list_notes().await?;
        Ok(notes.into_iter().filter(Note::is_root).collect())
    }

    /// Direct children of a note (one level only)
    pub async fn children(&self, parent_id: &str) -> Result<Vec<Note>> {
        let notes = self.list_notes().await?;
        Ok(notes
            .into_iter()
            .filter(|note| note.metadata.parent_id.as_deref() == Some(parent_id))
            .collect())
    }

    /// Push a cached note. Once pushed it lives at its canonical path.
    async fn push_save(
        &self,
        provider: Option<&dyn StorageProvider>,
        note: &mut Note,
    ) -> Result<RemotePush> {
        let Some(provider) = provider else {
            return Ok(RemotePush::Skipped);
        };

        match provider.save_note(note).await {
            Ok(()) => {
                if note.stored_path.take().is_some() {
                    self.cache.upsert(note.clone()).await?;
                }
                Ok(RemotePush::Pushed)
            }
            Err(e) => Ok(self.push_failed("Failed to save note remotely", note.id(), e)),
        }
    }

    fn push_failed(&self, title: &str, id: &str, err: AppError) -> RemotePush {
        let message = err.to_string();
        tracing::error!("{} {}: {}", title, id, message);
        self.notifier
            .notify(Notification::error(title, message.clone()));
        RemotePush::Failed { message }
    }
}
