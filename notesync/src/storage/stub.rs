//! Placeholder providers
//!
//! GitLab, S3 and WebDAV can be selected in the configuration but have no
//! transport yet. They satisfy the provider contract so callers never crash:
//! fetches return nothing and writes are accepted without effect.

use super::StorageProvider;
use crate::error::Result;
use crate::models::{Note, ProviderKind};
use async_trait::async_trait;

/// Provider that logs and does nothing
#[derive(Debug, Clone)]
pub struct StubProvider {
    kind: ProviderKind,
}

impl StubProvider {
    pub fn new(kind: ProviderKind) -> Self {
        Self { kind }
    }
}

#[async_trait]
impl StorageProvider for StubProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    async fn fetch_notes(&self) -> Result<Vec<Note>> {
        tracing::warn!("{} storage is not implemented, returning no notes", self.kind);
        Ok(Vec::new())
    }

    async fn save_note(&self, note: &Note) -> Result<()> {
        tracing::warn!(
            "{} storage is not implemented, note {} was not uploaded",
            self.kind,
            note.id()
        );
        Ok(())
    }

    async fn delete_note(&self, note: &Note) -> Result<()> {
        tracing::warn!(
            "{} storage is not implemented, note {} was not deleted remotely",
            self.kind,
            note.id()
        );
        Ok(())
    }
}
