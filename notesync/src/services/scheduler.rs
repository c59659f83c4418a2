/// Sync Scheduler Service
/// Runs the silent background reconciliation on a fixed interval while sync
/// is enabled. Each tick reads the storage configuration fresh from disk.
use crate::config::MIN_SYNC_INTERVAL_SECS;
use crate::error::{AppError, Result};
use crate::models::StorageConfig;
use crate::services::{ConfigStore, SyncService, SyncTrigger};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio_cron_scheduler::{Job, JobScheduler};
use uuid::Uuid;

/// Scheduler service for periodic sync
pub struct SyncScheduler {
    scheduler: Arc<RwLock<JobScheduler>>,
    sync_service: Arc<SyncService>,
    config_store: ConfigStore,
    current_job_id: Arc<RwLock<Option<Uuid>>>,
}

impl SyncScheduler {
    /// Create new scheduler service
    pub async fn new(sync_service: SyncService, config_store: ConfigStore) -> Result<Self> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::Scheduler(format!("Failed to create scheduler: {}", e)))?;

        Ok(Self {
            scheduler: Arc::new(RwLock::new(scheduler)),
            sync_service: Arc::new(sync_service),
            config_store,
            current_job_id: Arc::new(RwLock::new(None)),
        })
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<()> {
        let scheduler = self.scheduler.read().await;
        scheduler
            .start()
            .await
            .map_err(|e| AppError::Scheduler(format!("Failed to start scheduler: {}", e)))?;
        tracing::info!("Sync scheduler started");
        Ok(())
    }

    /// Schedule or clear the periodic sync to match `config`
    pub async fn apply(&self, config: &StorageConfig, interval: Duration) -> Result<()> {
        // Remove existing job if any
        let mut current_job = self.current_job_id.write().await;
        self.remove_job(&mut *current_job).await?;

        if !config.enabled {
            tracing::info!("Sync disabled, periodic sync not scheduled");
            return Ok(());
        }

        let interval = if interval.as_secs() < MIN_SYNC_INTERVAL_SECS {
            tracing::warn!(
                "Sync interval {:?} too short, using {}s",
                interval,
                MIN_SYNC_INTERVAL_SECS
            );
            Duration::from_secs(MIN_SYNC_INTERVAL_SECS)
        } else {
            interval
        };

        let sync_service = Arc::clone(&self.sync_service);
        let config_store = self.config_store.clone();

        let job = Job::new_repeated_async(interval, move |_uuid, _l| {
            let sync_service = Arc::clone(&sync_service);
            let config_store = config_store.clone();
            Box::pin(async move {
                tracing::debug!("Running periodic sync");

                match config_store.load().await {
                    Ok(config) => {
                        sync_service
                            .sync_with_config(&config, SyncTrigger::Periodic)
                            .await;
                    }
                    Err(e) => tracing::error!("Periodic sync could not read config: {}", e),
                }
            })
        })
        .map_err(|e| AppError::Scheduler(format!("Failed to create sync job: {}", e)))?;

        let job_id = job.guid();

        let scheduler = self.scheduler.write().await;
        scheduler
            .add(job)
            .await
            .map_err(|e| AppError::Scheduler(format!("Failed to schedule job: {}", e)))?;

        *current_job = Some(job_id);

        tracing::info!("Periodic sync scheduled every {:?}", interval);
        Ok(())
    }

    /// Cancel the periodic sync
    pub async fn cancel(&self) -> Result<()> {
        let mut current_job = self.current_job_id.write().await;
        self.remove_job(&mut *current_job).await
    }

    async fn remove_job(&self, current_job: &mut Option<Uuid>) -> Result<()> {
        if let Some(job_id) = current_job.take() {
            let scheduler = self.scheduler.write().await;
            scheduler
                .remove(&job_id)
                .await
                .map_err(|e| AppError::Scheduler(format!("Failed to remove job: {}", e)))?;

            tracing::info!("Periodic sync cancelled");
        }

        Ok(())
    }

    pub async fn is_scheduled(&self) -> bool {
        self.current_job_id.read().await.is_some()
    }

    /// Shutdown scheduler gracefully
    pub async fn shutdown(&self) -> Result<()> {
        self.cancel().await?;

        let mut scheduler = self.scheduler.write().await;
        scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::Scheduler(format!("Failed to shutdown scheduler: {}", e)))?;
        tracing::info!("Sync scheduler shutdown");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::LogNotifier;
    use crate::storage::LocalCache;
    use tempfile::TempDir;

    async fn create_test_scheduler() -> (SyncScheduler, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let cache = LocalCache::new(temp_dir.path().join("notes.json"));
        let sync_service = SyncService::new(cache, Arc::new(LogNotifier));
        let config_store = ConfigStore::new(temp_dir.path().to_path_buf());
        let scheduler = SyncScheduler::new(sync_service, config_store)
            .await
            .unwrap();
        (scheduler, temp_dir)
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_disabled_config_is_not_scheduled() {
        let (scheduler, _temp) = create_test_scheduler().await;

        scheduler
            .apply(&StorageConfig::default(), Duration::from_secs(60))
            .await
            .unwrap();

        assert!(!scheduler.is_scheduled().await);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_enable_then_disable() {
        let (scheduler, _temp) = create_test_scheduler().await;
        let enabled = StorageConfig::github("t", "o", "r");

        scheduler
            .apply(&enabled, Duration::from_secs(60))
            .await
            .unwrap();
        assert!(scheduler.is_scheduled().await);

        // Re-applying replaces the job rather than stacking a second one
        scheduler
            .apply(&enabled, Duration::from_secs(120))
            .await
            .unwrap();
        assert!(scheduler.is_scheduled().await);

        let mut disabled = enabled.clone();
        disabled.enabled = false;
        scheduler
            .apply(&disabled, Duration::from_secs(60))
            .await
            .unwrap();
        assert!(!scheduler.is_scheduled().await);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_cancel_without_job_is_ok() {
        let (scheduler, _temp) = create_test_scheduler().await;

        scheduler.cancel().await.unwrap();
        assert!(!scheduler.is_scheduled().await);
    }
}
