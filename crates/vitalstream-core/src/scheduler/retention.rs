//! Retention scheduler.
//!
//! Periodically purges persisted readings older than the retention
//! window. A manual purge runs the identical logic on demand and
//! returns the deleted count to the caller.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::persistence::{PersistenceError, VitalsRepository};

/// Default time between scheduled purges.
pub const RETENTION_PERIOD: Duration = Duration::from_secs(60 * 60);

/// Default retention window in hours.
pub const RETENTION_HOURS: i64 = 1;

/// Snapshot of the retention scheduler's state, always available.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetentionStatus {
    /// Whether the periodic task is live.
    pub running: bool,
    /// Configured purge period.
    pub period_ms: u64,
    /// Configured retention window.
    pub retention_hours: i64,
}

/// Scheduler that keeps stored readings within the retention window.
pub struct RetentionScheduler {
    repository: Arc<dyn VitalsRepository>,
    period: Duration,
    retention_hours: i64,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl RetentionScheduler {
    /// Create a stopped scheduler over `repository`.
    pub fn new(
        repository: Arc<dyn VitalsRepository>,
        period: Duration,
        retention_hours: i64,
    ) -> Arc<Self> {
        Arc::new(Self {
            repository,
            period,
            retention_hours,
            task: Mutex::new(None),
        })
    }

    /// Start the periodic task: one purge immediately, then one per
    /// period. Idempotent; refuses to start when the repository is
    /// unavailable.
    pub fn start(self: &Arc<Self>) {
        if !self.repository.enabled() {
            warn!("persistence not configured, retention scheduler not started");
            return;
        }

        let mut task = self.task.lock();
        if task.is_some() {
            warn!("retention scheduler already running");
            return;
        }

        let this = Arc::clone(self);
        *task = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(this.period);
            loop {
                interval.tick().await;
                // Scheduled-path failures are logged; the next run
                // proceeds normally.
                if let Err(error) = this.purge_now().await {
                    warn!(%error, "scheduled retention purge failed");
                }
            }
        }));
        info!(
            period_ms = self.period.as_millis() as u64,
            retention_hours = self.retention_hours,
            "retention scheduler started"
        );
    }

    /// Stop the periodic task. After this returns no further purges
    /// begin. Idempotent.
    pub fn stop(&self) {
        if let Some(handle) = self.task.lock().take() {
            handle.abort();
            info!("retention scheduler stopped");
        }
    }

    /// Whether the periodic task is live.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task.lock().as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Purge readings older than the retention window, measured from
    /// now. Returns the deleted count; failures propagate to the
    /// caller, which makes this the manual-trigger entry point.
    pub async fn purge_now(&self) -> Result<u64, PersistenceError> {
        if !self.repository.enabled() {
            return Err(PersistenceError::NotConfigured);
        }
        let cutoff = Utc::now() - chrono::Duration::hours(self.retention_hours);
        let deleted = self.repository.delete_older_than(cutoff).await?;
        info!(deleted, retention_hours = self.retention_hours, "retention purge complete");
        Ok(deleted)
    }

    /// Current status. Always succeeds.
    #[must_use]
    pub fn status(&self) -> RetentionStatus {
        RetentionStatus {
            running: self.is_running(),
            period_ms: self.period.as_millis() as u64,
            retention_hours: self.retention_hours,
        }
    }
}

impl Drop for RetentionScheduler {
    fn drop(&mut self) {
        if let Some(handle) = self.task.lock().take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryRepository;
    use crate::subject::SubjectState;
    use chrono::Duration as ChronoDuration;

    fn scheduler_over(repo: Arc<MemoryRepository>) -> Arc<RetentionScheduler> {
        RetentionScheduler::new(repo, RETENTION_PERIOD, RETENTION_HOURS)
    }

    #[tokio::test]
    async fn manual_purge_deletes_only_expired_rows() {
        let repo = Arc::new(MemoryRepository::new());
        let now = Utc::now();
        let reading = SubjectState::from_identity("a").snapshot("a");
        repo.insert_aged(reading.clone(), now - ChronoDuration::minutes(30));
        repo.insert_aged(reading.clone(), now - ChronoDuration::minutes(90));
        repo.insert_aged(reading, now - ChronoDuration::minutes(200));

        let scheduler = scheduler_over(repo.clone());
        let deleted = scheduler.purge_now().await.unwrap();
        assert_eq!(deleted, 2);
        assert_eq!(repo.count_readings().await.unwrap(), 1);

        // Second purge finds nothing left to delete.
        assert_eq!(scheduler.purge_now().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn manual_purge_surfaces_write_failure() {
        let repo = Arc::new(MemoryRepository::new());
        repo.set_fail_writes(true);
        let scheduler = scheduler_over(repo);
        let err = scheduler.purge_now().await.unwrap_err();
        assert!(matches!(err, PersistenceError::Write(_)));
    }

    #[tokio::test]
    async fn start_is_idempotent_and_stop_cancels() {
        let repo = Arc::new(MemoryRepository::new());
        let scheduler = RetentionScheduler::new(repo, Duration::from_secs(3600), 1);

        scheduler.start();
        assert!(scheduler.is_running());
        scheduler.start();
        assert!(scheduler.is_running());

        scheduler.stop();
        assert!(!scheduler.is_running());
        scheduler.stop();
        assert!(!scheduler.is_running());
    }

    #[tokio::test]
    async fn status_reports_configuration() {
        let repo = Arc::new(MemoryRepository::new());
        let scheduler = RetentionScheduler::new(repo, Duration::from_secs(1800), 2);
        let status = scheduler.status();
        assert!(!status.running);
        assert_eq!(status.period_ms, 1_800_000);
        assert_eq!(status.retention_hours, 2);
    }
}
