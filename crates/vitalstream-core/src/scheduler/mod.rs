//! Periodic schedulers driving the fleet generator and data retention.

pub mod generator;
pub mod retention;

pub use generator::{FleetGenerator, GeneratorStatus, GENERATION_PERIOD};
pub use retention::{RetentionScheduler, RetentionStatus, RETENTION_HOURS, RETENTION_PERIOD};
