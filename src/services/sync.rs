//! One fetch → parse → normalize → upsert pass, and the bookkeeping around it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{error, info, warn};

use crate::error::SyncError;
use crate::services::event_store::SharedEventStore;
use crate::services::feed_parser;
use crate::services::normalizer;
use crate::services::provider::FeedSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncPhase {
    Idle,
    Fetching,
    Parsing,
    Normalizing,
    Upserting,
}

/// Counts for a cycle that ran to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub fetched: usize,
    pub stored: usize,
    pub skipped_offline: usize,
    pub rejected: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncStatus {
    pub phase: SyncPhase,
    pub last_success_at: Option<DateTime<Utc>>,
    pub last_report: Option<SyncReport>,
    pub last_error: Option<String>,
    pub cycles_succeeded: u64,
    pub cycles_failed: u64,
}

impl Default for SyncStatus {
    fn default() -> Self {
        Self {
            phase: SyncPhase::Idle,
            last_success_at: None,
            last_report: None,
            last_error: None,
            cycles_succeeded: 0,
            cycles_failed: 0,
        }
    }
}

/// Outcome of a scheduler tick.
#[derive(Debug)]
pub enum TickOutcome {
    Completed(SyncReport),
    Failed,
    /// A previous cycle was still running.
    Skipped,
}

#[derive(Clone)]
pub struct SyncService {
    source: Arc<dyn FeedSource>,
    store: SharedEventStore,
    status: Arc<RwLock<SyncStatus>>,
    running: Arc<Mutex<()>>,
}

impl SyncService {
    pub fn new(source: Arc<dyn FeedSource>, store: SharedEventStore) -> Self {
        Self {
            source,
            store,
            status: Arc::new(RwLock::new(SyncStatus::default())),
            running: Arc::new(Mutex::new(())),
        }
    }

    pub async fn status(&self) -> SyncStatus {
        self.status.read().await.clone()
    }

    /// Run a single cycle. Fetch and parse failures return before the store is touched.
    pub async fn run_cycle(&self) -> Result<SyncReport, SyncError> {
        let result = self.run_phases().await;
        self.set_phase(SyncPhase::Idle).await;
        result
    }

    async fn run_phases(&self) -> Result<SyncReport, SyncError> {
        self.set_phase(SyncPhase::Fetching).await;
        let payload = self.source.fetch().await?;

        self.set_phase(SyncPhase::Parsing).await;
        let records = feed_parser::parse(&payload)?;
        let fetched = records.len();

        self.set_phase(SyncPhase::Normalizing).await;
        let batch = normalizer::normalize_batch(records);

        self.set_phase(SyncPhase::Upserting).await;
        let stored = batch.events.len();
        if stored > 0 {
            self.store.upsert_many(batch.events).await?;
        }

        Ok(SyncReport {
            fetched,
            stored,
            skipped_offline: batch.skipped_offline,
            rejected: batch.rejected,
        })
    }

    /// Scheduler entry point. Never returns an error: failures are logged and
    /// recorded so the next tick can try again.
    pub async fn tick(&self) -> TickOutcome {
        let Ok(_guard) = self.running.try_lock() else {
            warn!("Previous sync cycle still running, skipping this tick");
            return TickOutcome::Skipped;
        };

        match self.run_cycle().await {
            Ok(report) => {
                info!(
                    "Sync cycle finished: {} fetched, {} stored, {} offline, {} rejected",
                    report.fetched, report.stored, report.skipped_offline, report.rejected
                );
                let mut status = self.status.write().await;
                status.last_success_at = Some(Utc::now());
                status.last_report = Some(report);
                status.last_error = None;
                status.cycles_succeeded += 1;
                TickOutcome::Completed(report)
            }
            Err(e) => {
                error!("Sync cycle failed, store left unchanged: {}", e);
                let mut status = self.status.write().await;
                status.last_error = Some(e.to_string());
                status.cycles_failed += 1;
                TickOutcome::Failed
            }
        }
    }

    async fn set_phase(&self, phase: SyncPhase) {
        self.status.write().await.phase = phase;
    }
}
