//! Storage provider contract
//!
//! Every backing store (GitHub, GitLab, S3, WebDAV) implements this trait.
//! Providers convert transport failures at their own boundary: reads degrade
//! to partial or empty results where the contract allows it, writes fail
//! with an error the caller can report.

use crate::error::Result;
use crate::models::{Note, ProviderKind};
use async_trait::async_trait;

#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// Which backing technology this provider talks to
    fn kind(&self) -> ProviderKind;

    /// Fetch every note held by the remote store.
    ///
    /// A missing or empty notes directory yields an empty list. Documents
    /// that fail to download or parse are logged and left out, so the
    /// result is not guaranteed to be exhaustive.
    ///
    /// # Errors
    ///
    /// Returns an error only when the directory listing itself fails.
    async fn fetch_notes(&self) -> Result<Vec<Note>>;

    /// Create or update the note's remote document.
    ///
    /// The current concurrency token is read first. A missing document means
    /// create. Any other failure of that read is logged and the write goes
    /// out without a token, which can silently overwrite a concurrent update.
    async fn save_note(&self, note: &Note) -> Result<()>;

    /// Remove the note's remote document. Removing an absent document succeeds.
    async fn delete_note(&self, note: &Note) -> Result<()>;
}
