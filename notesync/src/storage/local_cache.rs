//! Local note cache
//!
//! Durable on-device map from note id to note document, stored as a single
//! pretty-printed JSON file. It is the fast path for reads and holds edits
//! until they reach the remote store.
//!
//! Every operation reads the file fresh and writes it back whole. There is
//! no locking: concurrent writers (user edits, deletes, reconciliation)
//! resolve as last writer wins.

use crate::error::{AppError, Result};
use crate::models::Note;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// File-backed note cache
#[derive(Clone, Debug)]
pub struct LocalCache {
    path: PathBuf,
}

impl LocalCache {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Create the parent directory if needed
    pub async fn initialize(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        tracing::info!("Note cache at: {:?}", self.path);
        Ok(())
    }

    /// All cached notes keyed by id. A missing file is an empty cache.
    pub async fn load_all(&self) -> Result<BTreeMap<String, Note>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = fs::read_to_string(&self.path).await?;
        let notes = serde_json::from_str(&content)
            .map_err(|e| AppError::Generic(format!("Failed to parse note cache: {}", e)))?;

        Ok(notes)
    }

    pub async fn get(&self, id: &str) -> Result<Option<Note>> {
        let mut notes = self.load_all().await?;
        Ok(notes.remove(id))
    }

    /// Insert or replace one note
    pub async fn upsert(&self, note: Note) -> Result<()> {
        let mut notes = self.load_all().await?;
        tracing::debug!("Caching note: {}", note.id());
        notes.insert(note.id().to_string(), note);
        self.write(&notes).await
    }

    /// Remove one note, returning it if it was cached
    pub async fn remove(&self, id: &str) -> Result<Option<Note>> {
        let mut notes = self.load_all().await?;
        let removed = notes.remove(id);

        if removed.is_some() {
            self.write(&notes).await?;
            tracing::debug!("Removed note from cache: {}", id);
        }

        Ok(removed)
    }

    /// Replace the whole cache with `notes`.
    ///
    /// Nothing previously cached survives. If two notes share an id the
    /// later one wins.
    pub async fn replace_all(&self, notes: Vec<Note>) -> Result<()> {
        let map: BTreeMap<String, Note> = notes
            .into_iter()
            .map(|note| (note.id().to_string(), note))
            .collect();

        tracing::debug!("Replacing note cache with {} notes", map.len());
        self.write(&map).await
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn write(&self, notes: &BTreeMap<String, Note>) -> Result<()> {
        let content = serde_json::to_string_pretty(notes)?;

        // Write to temp file first (atomic write)
        let temp_path = self.path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(content.as_bytes()).await?;
        file.sync_all().await?;

        fs::rename(&temp_path, &self.path).await?;

        Ok(())
    }
}
