//! Deterministic vital-sign simulation engine.
//!
//! Simulates physiological telemetry (heart rate, SpO2, blood pressure,
//! temperature) for many independently tracked subjects. Values come
//! from a seeded bounded random walk, so a given identity always
//! reproduces the same trajectory; this is a plausible-looking
//! simulation, not a physiological model.
//!
//! # Architecture
//!
//! ```text
//! identity ──► seed_from_identity ──► SeededRng ──► random_walk
//!                                          │
//!                                    SubjectState (5 metrics)
//!                                          │
//!                                   SubjectRegistry
//!                                    ┌─────┴─────┐
//!                            SessionManager   FleetGenerator ──► VitalsRepository
//!                            (per-connection) (roster-driven)         ▲
//!                                                                     │
//!                                                        RetentionScheduler
//! ```
//!
//! Three schedulers drive the engine:
//!
//! - [`SessionManager`]: one timer per live connection; immediate first
//!   reading, then tick + deliver on a fixed period, torn down on
//!   disconnect.
//! - [`FleetGenerator`]: one process-wide timer that walks every
//!   rostered subject per cycle and persists the batch.
//! - [`RetentionScheduler`]: one process-wide timer purging persisted
//!   readings older than the retention window.
//!
//! All scheduled failures are caught and logged at the tick boundary;
//! only manually triggered operations propagate errors to the caller.
//!
//! # Example
//!
//! ```
//! use vitalstream_core::{SubjectRegistry, SubjectState};
//!
//! let registry = SubjectRegistry::new();
//! let state = registry.get_or_create("patient-7");
//!
//! let reading = {
//!     let mut state = state.lock();
//!     state.tick();
//!     state.snapshot("patient-7")
//! };
//! assert!((60..=100).contains(&reading.heart_rate));
//! ```

pub mod persistence;
pub mod prng;
pub mod registry;
pub mod scheduler;
pub mod session;
pub mod subject;

pub use persistence::{MemoryRepository, PersistenceError, VitalsRepository};
pub use prng::{random_walk, seed_from_identity, SeededRng};
pub use registry::{SharedSubject, SubjectRegistry};
pub use scheduler::{
    FleetGenerator, GeneratorStatus, RetentionScheduler, RetentionStatus, GENERATION_PERIOD,
    RETENTION_HOURS, RETENTION_PERIOD,
};
pub use session::{SessionManager, EMISSION_PERIOD};
pub use subject::{SubjectRecord, SubjectState, VitalsReading};
