//! Per-connection emission sessions.
//!
//! Each live connection owns exactly one timer task and one
//! connection-scoped registry entry. On connect the session delivers
//! one reading immediately, then ticks and delivers on a fixed period;
//! on disconnect the timer is aborted and the entry deleted, so
//! connection-scoped subjects never outlive their connection.
//!
//! Sessions are keyed by a connection id, not by the upstream identity:
//! two connections presenting the same identity each get their own
//! state, seeded identically but walking independently after the first
//! tick.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::registry::SubjectRegistry;
use crate::subject::VitalsReading;

/// Default time between emitted readings.
pub const EMISSION_PERIOD: Duration = Duration::from_secs(10);

/// Owner of all connection-scoped emission timers and their registry.
pub struct SessionManager {
    registry: SubjectRegistry,
    period: Duration,
    sessions: Mutex<HashMap<String, JoinHandle<()>>>,
}

impl SessionManager {
    /// Create a manager emitting one reading per `period`.
    pub fn new(period: Duration) -> Arc<Self> {
        Arc::new(Self {
            registry: SubjectRegistry::new(),
            period,
            sessions: Mutex::new(HashMap::new()),
        })
    }

    /// Establish a session for a connection.
    ///
    /// Creates the connection's registry entry seeded from `identity`,
    /// delivers an initial reading at once, then one ticked reading per
    /// period through `sender`. Delivery failures are logged and do not
    /// stop the timer; only [`SessionManager::disconnect`] does.
    pub fn connect(
        self: &Arc<Self>,
        conn_id: &str,
        identity: &str,
        sender: mpsc::Sender<VitalsReading>,
    ) {
        let state = self.registry.get_or_create_seeded(conn_id, identity);
        let conn = conn_id.to_string();
        let identity = identity.to_string();
        let period = self.period;

        let handle = tokio::spawn(async move {
            // Initial reading, no tick and no delay.
            let first = state.lock().snapshot(&identity);
            if sender.send(first).await.is_err() {
                warn!(conn_id = %conn, "initial vitals delivery failed");
            }

            let mut interval = tokio::time::interval(period);
            // Consume the immediate first tick so the next reading
            // lands one full period after the initial one.
            interval.tick().await;
            loop {
                interval.tick().await;
                let reading = {
                    let mut state = state.lock();
                    state.tick();
                    state.snapshot(&identity)
                };
                if sender.send(reading).await.is_err() {
                    warn!(conn_id = %conn, "vitals delivery failed");
                }
            }
        });

        let mut sessions = self.sessions.lock();
        if let Some(previous) = sessions.insert(conn_id.to_string(), handle) {
            // A reused connection id replaces its old timer.
            previous.abort();
        }
        debug!(conn_id, "emission session established");
    }

    /// Tear down a connection's session: abort its timer and delete its
    /// registry entry. Idempotent.
    pub fn disconnect(&self, conn_id: &str) {
        if let Some(handle) = self.sessions.lock().remove(conn_id) {
            handle.abort();
        }
        self.registry.remove(conn_id);
        debug!(conn_id, "emission session closed");
    }

    /// Number of live sessions.
    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.sessions.lock().len()
    }

    /// The connection-scoped registry.
    #[must_use]
    pub fn registry(&self) -> &SubjectRegistry {
        &self.registry
    }
}

impl Drop for SessionManager {
    fn drop(&mut self) {
        for (_, handle) in self.sessions.lock().drain() {
            handle.abort();
        }
    }
}
