//! Shared helpers for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use notesync::error::{AppError, Result};
use notesync::models::{Note, NoteType, ProviderKind};
use notesync::services::{Notification, SyncNotifier};
use notesync::storage::StorageProvider;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// In-memory remote store keyed by path, with host-style SHA tokens
#[derive(Default)]
pub struct MemoryProvider {
    files: Mutex<BTreeMap<String, (String, Note)>>,
    next_sha: AtomicUsize,
    pub fail_fetch: AtomicBool,
    pub fail_writes: AtomicBool,
}

impl MemoryProvider {
    pub fn with_notes(notes: &[Note]) -> Self {
        let provider = Self::default();
        for note in notes {
            provider.put_raw(note.clone());
        }
        provider
    }

    pub fn put_raw(&self, note: Note) {
        let path = note.remote_path();
        self.put_at(&path, note);
    }

    /// Store a document at an arbitrary path, as another client might
    pub fn put_at(&self, path: &str, mut note: Note) {
        note.stored_path = None;
        let sha = self.new_sha();
        self.files
            .lock()
            .unwrap()
            .insert(path.to_string(), (sha, note));
    }

    pub fn paths(&self) -> Vec<String> {
        self.files.lock().unwrap().keys().cloned().collect()
    }

    pub fn sha_of(&self, path: &str) -> Option<String> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .map(|(sha, _)| sha.clone())
    }

    fn new_sha(&self) -> String {
        format!("sha-{}", self.next_sha.fetch_add(1, Ordering::SeqCst))
    }
}

#[async_trait]
impl StorageProvider for MemoryProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Github
    }

    async fn fetch_notes(&self) -> Result<Vec<Note>> {
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(AppError::Remote {
                status: 502,
                message: "bad gateway".to_string(),
            });
        }
        Ok(self
            .files
            .lock()
            .unwrap()
            .iter()
            .map(|(path, (_, note))| {
                let mut note = note.clone();
                note.located_at(path.as_str());
                note
            })
            .collect())
    }

    async fn save_note(&self, note: &Note) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Remote {
                status: 503,
                message: "unavailable".to_string(),
            });
        }
        let sha = self.new_sha();
        let mut document = note.clone();
        document.stored_path = None;

        let mut files = self.files.lock().unwrap();
        files.insert(note.canonical_path(), (sha, document));
        if let Some(old_path) = note.stale_path() {
            files.remove(old_path);
        }
        Ok(())
    }

    async fn delete_note(&self, note: &Note) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Remote {
                status: 503,
                message: "unavailable".to_string(),
            });
        }
        self.files.lock().unwrap().remove(&note.remote_path());
        Ok(())
    }
}

/// Notifier that records everything it is told
#[derive(Default)]
pub struct RecordingNotifier {
    pub notifications: Mutex<Vec<Notification>>,
    pub config_requests: AtomicUsize,
}

impl RecordingNotifier {
    pub fn count(&self) -> usize {
        self.notifications.lock().unwrap().len()
    }
}

impl SyncNotifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications.lock().unwrap().push(notification);
    }

    fn open_configuration(&self) {
        self.config_requests.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn note(title: &str) -> Note {
    let mut note = Note::new(title, NoteType::General);
    note.content = format!("Body of {}", title);
    note
}
