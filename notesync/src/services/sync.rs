//! Sync reconciler
//!
//! Reconciliation is remote-wins, full-replace: the remote set is fetched and
//! becomes the entire local cache. There is no merge. A note created locally
//! and not yet pushed when a reconciliation runs is dropped.
//!
//! Runs are triggered by the periodic scheduler (silent) or by the user
//! (manual sync, or right after saving a new storage configuration).

use super::notifier::{Notification, SyncNotifier};
use crate::models::StorageConfig;
use crate::storage::{create_provider, LocalCache, StorageProvider};
use serde::Serialize;
use std::sync::Arc;

/// What started a reconciliation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncTrigger {
    /// Background timer; never notifies the user
    Periodic,
    /// "Sync now"
    Manual,
    /// Storage configuration was just saved
    ConfigSaved,
}

impl SyncTrigger {
    pub fn is_silent(&self) -> bool {
        matches!(self, SyncTrigger::Periodic)
    }
}

/// Result of one reconciliation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum SyncOutcome {
    /// Sync is off and the trigger was silent
    Skipped,
    /// Sync is off and the user was sent to configuration
    ConfigurationRequired,
    /// Local cache now mirrors the remote set
    Synced { count: usize },
    /// Nothing was replaced
    Failed { message: String },
}

/// Reconciles the local cache against the active provider
#[derive(Clone)]
pub struct SyncService {
    cache: LocalCache,
    notifier: Arc<dyn SyncNotifier>,
}

impl SyncService {
    pub fn new(cache: LocalCache, notifier: Arc<dyn SyncNotifier>) -> Self {
        Self { cache, notifier }
    }

    /// Resolve the provider for `config` and reconcile
    pub async fn sync_with_config(&self, config: &StorageConfig, trigger: SyncTrigger) -> SyncOutcome {
        let provider = create_provider(config);
        self.reconcile(provider.as_deref(), trigger).await
    }

    /// Replace the local cache with the provider's notes.
    ///
    /// Provider and cache failures are logged and returned as
    /// [`SyncOutcome::Failed`]; they never propagate.
    pub async fn reconcile(
        &self,
        provider: Option<&dyn StorageProvider>,
        trigger: SyncTrigger,
    ) -> SyncOutcome {
        let Some(provider) = provider else {
            if trigger.is_silent() {
                tracing::debug!("Sync disabled, skipping periodic sync");
                return SyncOutcome::Skipped;
            }
            tracing::info!("Sync requested without a configured provider");
            self.notifier.open_configuration();
            return SyncOutcome::ConfigurationRequired;
        };

        tracing::info!("Syncing notes from {} ({:?})", provider.kind(), trigger);

        let notes = match provider.fetch_notes().await {
            Ok(notes) => notes,
            Err(e) => return self.fail(trigger, format!("Failed to fetch notes: {}", e)),
        };

        let count = notes.len();
        if let Err(e) = self.cache.replace_all(notes).await {
            return self.fail(trigger, format!("Failed to store synced notes: {}", e));
        }

        tracing::info!("Sync complete: {} notes", count);

        if !trigger.is_silent() {
            self.notifier.notify(Notification::success(
                "Sync complete",
                format!("Synced {} notes", count),
            ));
        }

        SyncOutcome::Synced { count }
    }

    fn fail(&self, trigger: SyncTrigger, message: String) -> SyncOutcome {
        tracing::error!("{}", message);

        if !trigger.is_silent() {
            self.notifier
                .notify(Notification::error("Sync failed", message.clone()));
        }

        SyncOutcome::Failed { message }
    }
}
