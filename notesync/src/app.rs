//! Application state and initialization
//!
//! Wires the config store, the local cache and the services around one app
//! data directory. Every operation that can reach the remote store reads the
//! storage configuration fresh and hands it down explicitly.

use crate::config::NOTES_CACHE_FILE;
use crate::error::Result;
use crate::models::{Note, StorageConfig};
use crate::services::{
    ConfigStore, CreateNoteRequest, NotesService, RemotePush, SavedNote, SyncNotifier,
    SyncOutcome, SyncScheduler, SyncService, SyncTrigger, UpdateNoteRequest,
};
use crate::storage::{create_provider, LocalCache};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Central application state holding all services
pub struct AppState {
    pub app_data_dir: PathBuf,
    pub config_store: ConfigStore,
    pub notes_service: NotesService,
    pub sync_service: SyncService,
    pub scheduler: SyncScheduler,
    /// Interval of the running background sync, if started
    background_interval: RwLock<Option<Duration>>,
}

impl AppState {
    /// Open (and create if needed) the app data directory
    pub async fn open(app_data_dir: PathBuf, notifier: Arc<dyn SyncNotifier>) -> Result<Self> {
        tracing::info!("App data directory: {:?}", app_data_dir);
        tokio::fs::create_dir_all(&app_data_dir).await?;

        let config_store = ConfigStore::new(app_data_dir.clone());
        let cache = LocalCache::new(app_data_dir.join(NOTES_CACHE_FILE));
        cache.initialize().await?;

        let notes_service = NotesService::new(cache.clone(), Arc::clone(&notifier));
        let sync_service = SyncService::new(cache, notifier);
        let scheduler = SyncScheduler::new(sync_service.clone(), config_store.clone()).await?;

        tracing::info!("Application initialized successfully");

        Ok(Self {
            app_data_dir,
            config_store,
            notes_service,
            sync_service,
            scheduler,
            background_interval: RwLock::new(None),
        })
    }

    pub async fn storage_config(&self) -> Result<StorageConfig> {
        self.config_store.load().await
    }

    /// Persist a new storage configuration and sync against it right away
    pub async fn update_storage_config(&self, config: StorageConfig) -> Result<SyncOutcome> {
        self.config_store.save(&config).await?;

        if let Some(interval) = *self.background_interval.read().await {
            self.scheduler.apply(&config, interval).await?;
        }

        Ok(self
            .sync_service
            .sync_with_config(&config, SyncTrigger::ConfigSaved)
            .await)
    }

    /// "Sync now"
    pub async fn sync_now(&self) -> Result<SyncOutcome> {
        let config = self.config_store.load().await?;
        Ok(self
            .sync_service
            .sync_with_config(&config, SyncTrigger::Manual)
            .await)
    }

    /// Start the periodic sync for the current configuration
    pub async fn start_background_sync(&self, interval: Duration) -> Result<()> {
        let config = self.config_store.load().await?;
        self.scheduler.start().await?;
        self.scheduler.apply(&config, interval).await?;
        *self.background_interval.write().await = Some(interval);
        Ok(())
    }

    /// Stop the periodic sync (view teardown)
    pub async fn stop_background_sync(&self) -> Result<()> {
        *self.background_interval.write().await = None;
        self.scheduler.shutdown().await
    }

    pub async fn create_note(&self, req: CreateNoteRequest) -> Result<SavedNote> {
        let provider = create_provider(&self.config_store.load().await?);
        self.notes_service.create_note(provider.as_deref(), req).await
    }

    pub async fn save_note(&self, note: Note) -> Result<SavedNote> {
        let provider = create_provider(&self.config_store.load().await?);
        self.notes_service.save_note(provider.as_deref(), note).await
    }

    pub async fn update_note(&self, req: UpdateNoteRequest) -> Result<SavedNote> {
        let provider = create_provider(&self.config_store.load().await?);
        self.notes_service.update_note(provider.as_deref(), req).await
    }

    pub async fn delete_note(&self, id: &str) -> Result<RemotePush> {
        let provider = create_provider(&self.config_store.load().await?);
        self.notes_service.delete_note(provider.as_deref(), id).await
    }
}
