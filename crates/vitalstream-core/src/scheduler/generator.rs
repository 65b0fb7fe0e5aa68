//! Fleet-wide generation scheduler.
//!
//! One shared timer that, each cycle, walks every rostered subject one
//! step forward and persists the readings as a batch. Subject states
//! live in a process-lifetime registry: unlike connection-scoped
//! entries, fleet entries are never deleted, so trajectories stay
//! continuous across cycles.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::persistence::VitalsRepository;
use crate::registry::SubjectRegistry;

/// Default time between generation cycles.
pub const GENERATION_PERIOD: Duration = Duration::from_secs(10);

/// Snapshot of the generator's state, always available.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorStatus {
    /// Whether the periodic task is live.
    pub running: bool,
    /// Subjects with live in-memory state.
    pub tracked_subjects: usize,
    /// Configured cycle period.
    pub period_ms: u64,
}

/// Periodic generator driving the whole subject fleet.
pub struct FleetGenerator {
    repository: Arc<dyn VitalsRepository>,
    registry: SubjectRegistry,
    period: Duration,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl FleetGenerator {
    /// Create a stopped generator over `repository`.
    pub fn new(repository: Arc<dyn VitalsRepository>, period: Duration) -> Arc<Self> {
        Arc::new(Self {
            repository,
            registry: SubjectRegistry::new(),
            period,
            task: Mutex::new(None),
        })
    }

    /// Start the periodic task: one cycle immediately, then one per
    /// period. Idempotent; refuses to start when the repository is
    /// unavailable.
    pub fn start(self: &Arc<Self>) {
        if !self.repository.enabled() {
            warn!("persistence not configured, fleet generator not started");
            return;
        }

        let mut task = self.task.lock();
        if task.is_some() {
            warn!("fleet generator already running");
            return;
        }

        let this = Arc::clone(self);
        *task = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(this.period);
            loop {
                // First tick completes immediately.
                interval.tick().await;
                this.run_cycle().await;
            }
        }));
        info!(period_ms = self.period.as_millis() as u64, "fleet generator started");
    }

    /// Stop the periodic task. After this returns no further cycles
    /// begin; a cycle already in flight may finish. Idempotent.
    pub fn stop(&self) {
        if let Some(handle) = self.task.lock().take() {
            handle.abort();
            info!("fleet generator stopped");
        }
    }

    /// Whether the periodic task is live.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task.lock().as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Run one generation cycle: fetch the roster, tick every subject,
    /// persist the batch.
    ///
    /// Failures are logged and the cycle abandoned; in-memory ticks
    /// taken before a failed batch write are retained (ticks are not
    /// transactional with persistence).
    pub async fn run_cycle(&self) {
        let roster = match self.repository.list_subjects().await {
            Ok(roster) => roster,
            Err(error) => {
                warn!(%error, "roster fetch failed, generation cycle abandoned");
                return;
            }
        };

        if roster.is_empty() {
            debug!("no subjects registered, skipping generation cycle");
            return;
        }

        let mut batch = Vec::with_capacity(roster.len());
        for subject in &roster {
            let state = self.registry.get_or_create(&subject.id);
            let reading = {
                let mut state = state.lock();
                state.tick();
                state.snapshot(&subject.id)
            };
            batch.push(reading);
        }

        if let Err(error) = self.repository.insert_batch(&batch).await {
            warn!(%error, subjects = roster.len(), "batch insert failed, readings dropped");
            return;
        }
        debug!(subjects = roster.len(), "generation cycle persisted");
    }

    /// Current status. Always succeeds; a generator that never started
    /// reports `running: false` and zero tracked subjects.
    #[must_use]
    pub fn status(&self) -> GeneratorStatus {
        GeneratorStatus {
            running: self.is_running(),
            tracked_subjects: self.registry.len(),
            period_ms: self.period.as_millis() as u64,
        }
    }

    /// The fleet registry (tracked in-memory states).
    #[must_use]
    pub fn registry(&self) -> &SubjectRegistry {
        &self.registry
    }
}

impl Drop for FleetGenerator {
    fn drop(&mut self) {
        if let Some(handle) = self.task.lock().take() {
            handle.abort();
        }
    }
}
