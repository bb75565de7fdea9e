use std::time::Duration;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

use crate::services::sync::SyncService;

/// Drives [`SyncService`] on a fixed interval for the lifetime of the process.
pub struct BackgroundScheduler {
    scheduler: JobScheduler,
}

impl BackgroundScheduler {
    /// Run one cycle immediately, then schedule one every `interval`.
    ///
    /// The startup cycle is allowed to fail; the server still comes up and
    /// the next tick tries again.
    pub async fn start(sync: SyncService, interval: Duration) -> anyhow::Result<Self> {
        sync.tick().await;

        let scheduler = JobScheduler::new().await?;

        let job_sync = sync.clone();
        scheduler
            .add(Job::new_repeated_async(interval, move |_uuid, _l| {
                let sync = job_sync.clone();
                Box::pin(async move {
                    sync.tick().await;
                })
            })?)
            .await?;

        scheduler.start().await?;
        info!("Background sync scheduled every {}s", interval.as_secs());

        Ok(Self { scheduler })
    }

    pub async fn shutdown(&self) {
        let mut scheduler = self.scheduler.clone();
        if let Err(e) = scheduler.shutdown().await {
            error!("Failed to stop background scheduler: {}", e);
            return;
        }
        info!("Background scheduler stopped");
    }
}
