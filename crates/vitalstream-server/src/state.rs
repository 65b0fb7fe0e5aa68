//! Shared application state for the server.
//!
//! Cloned into every handler; all shared resources live behind one
//! `Arc`.

use std::sync::Arc;
use std::time::{Duration, Instant};

use vitalstream_core::{
    FleetGenerator, MemoryRepository, RetentionScheduler, SessionManager, VitalsRepository,
    EMISSION_PERIOD, GENERATION_PERIOD, RETENTION_HOURS, RETENTION_PERIOD,
};

/// Timing configuration for the background schedulers.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Period between readings on a live connection.
    pub emission_period: Duration,
    /// Period between fleet generation cycles.
    pub generation_period: Duration,
    /// Period between scheduled retention purges.
    pub retention_period: Duration,
    /// Retention window in hours.
    pub retention_hours: i64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            emission_period: EMISSION_PERIOD,
            generation_period: GENERATION_PERIOD,
            retention_period: RETENTION_PERIOD,
            retention_hours: RETENTION_HOURS,
        }
    }
}

/// Shared server state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    repository: Arc<MemoryRepository>,
    generator: Arc<FleetGenerator>,
    retention: Arc<RetentionScheduler>,
    sessions: Arc<SessionManager>,
    started_at: Instant,
}

impl AppState {
    /// Build state with default scheduler timing.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SchedulerConfig::default())
    }

    /// Build state with explicit scheduler timing.
    #[must_use]
    pub fn with_config(config: SchedulerConfig) -> Self {
        let repository = Arc::new(MemoryRepository::new());
        let repo_dyn: Arc<dyn VitalsRepository> = repository.clone();

        let generator = FleetGenerator::new(repo_dyn.clone(), config.generation_period);
        let retention = RetentionScheduler::new(
            repo_dyn,
            config.retention_period,
            config.retention_hours,
        );
        let sessions = SessionManager::new(config.emission_period);

        Self {
            inner: Arc::new(AppStateInner {
                repository,
                generator,
                retention,
                sessions,
                started_at: Instant::now(),
            }),
        }
    }

    /// Start the fleet generator and retention scheduler.
    pub fn start_schedulers(&self) {
        self.inner.generator.start();
        self.inner.retention.start();
    }

    /// Stop both background schedulers.
    pub fn stop_schedulers(&self) {
        self.inner.generator.stop();
        self.inner.retention.stop();
    }

    /// The storage backend.
    #[must_use]
    pub fn repository(&self) -> &Arc<MemoryRepository> {
        &self.inner.repository
    }

    /// The fleet generation scheduler.
    #[must_use]
    pub fn generator(&self) -> &Arc<FleetGenerator> {
        &self.inner.generator
    }

    /// The retention scheduler.
    #[must_use]
    pub fn retention(&self) -> &Arc<RetentionScheduler> {
        &self.inner.retention
    }

    /// The per-connection session manager.
    #[must_use]
    pub fn sessions(&self) -> &Arc<SessionManager> {
        &self.inner.sessions
    }

    /// Seconds since the server started.
    #[must_use]
    pub fn uptime_secs(&self) -> u64 {
        self.inner.started_at.elapsed().as_secs()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
