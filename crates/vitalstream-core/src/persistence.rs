//! Persistence collaborator: the repository trait and an in-memory
//! implementation.
//!
//! The schedulers only ever talk to [`VitalsRepository`]; swapping in a
//! database-backed store is a matter of implementing the trait. The
//! bundled [`MemoryRepository`] is the storage engine the server ships
//! with and the backend every test uses.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use thiserror::Error;

use crate::subject::{SubjectRecord, VitalsReading};

/// Failures surfaced by a repository.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Backend not reachable or not configured; schedulers refuse to
    /// start rather than erroring.
    #[error("persistence backend not configured")]
    NotConfigured,
    /// A roster or data fetch failed; the current cycle is abandoned.
    #[error("fetch failed: {0}")]
    Fetch(String),
    /// A batch insert or purge failed.
    #[error("write failed: {0}")]
    Write(String),
}

/// Storage operations the schedulers and API depend on.
#[async_trait]
pub trait VitalsRepository: Send + Sync {
    /// Whether the backend is configured and reachable. Schedulers
    /// refuse to start against a disabled repository.
    fn enabled(&self) -> bool {
        true
    }

    /// The current subject roster.
    async fn list_subjects(&self) -> Result<Vec<SubjectRecord>, PersistenceError>;

    /// Add a subject to the roster. Registering an existing id returns
    /// the existing record.
    async fn register_subject(&self, id: &str) -> Result<SubjectRecord, PersistenceError>;

    /// Persist one generation cycle's readings as a single batch.
    async fn insert_batch(&self, readings: &[VitalsReading]) -> Result<(), PersistenceError>;

    /// Delete readings older than `cutoff`; returns the deleted count.
    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, PersistenceError>;

    /// Total stored readings.
    async fn count_readings(&self) -> Result<u64, PersistenceError>;

    /// Total roster size.
    async fn count_subjects(&self) -> Result<u64, PersistenceError>;

    /// Readings for one subject since `since`, newest first.
    async fn readings_for_subject(
        &self,
        subject_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<VitalsReading>, PersistenceError>;
}

/// In-memory repository.
///
/// Row store plus roster behind `parking_lot` locks. `fail_writes` and
/// `fail_fetches` let tests exercise the transient-failure paths
/// without a real backend.
#[derive(Default)]
pub struct MemoryRepository {
    subjects: RwLock<Vec<SubjectRecord>>,
    readings: RwLock<Vec<VitalsReading>>,
    fail_writes: std::sync::atomic::AtomicBool,
    fail_fetches: std::sync::atomic::AtomicBool,
}

impl MemoryRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent writes fail with [`PersistenceError::Write`].
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, std::sync::atomic::Ordering::SeqCst);
    }

    /// Make subsequent fetches fail with [`PersistenceError::Fetch`].
    pub fn set_fail_fetches(&self, fail: bool) {
        self.fail_fetches.store(fail, std::sync::atomic::Ordering::SeqCst);
    }

    /// Insert a reading with an explicit timestamp. Test seam for
    /// retention scenarios that need rows of a known age.
    pub fn insert_aged(&self, mut reading: VitalsReading, timestamp: DateTime<Utc>) {
        reading.timestamp = timestamp;
        self.readings.write().push(reading);
    }

    fn writes_failing(&self) -> bool {
        self.fail_writes.load(std::sync::atomic::Ordering::SeqCst)
    }

    fn fetches_failing(&self) -> bool {
        self.fail_fetches.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[async_trait]
impl VitalsRepository for MemoryRepository {
    async fn list_subjects(&self) -> Result<Vec<SubjectRecord>, PersistenceError> {
        if self.fetches_failing() {
            return Err(PersistenceError::Fetch("memory repository fetch disabled".into()));
        }
        Ok(self.subjects.read().clone())
    }

    async fn register_subject(&self, id: &str) -> Result<SubjectRecord, PersistenceError> {
        if self.writes_failing() {
            return Err(PersistenceError::Write("memory repository writes disabled".into()));
        }
        let mut subjects = self.subjects.write();
        if let Some(existing) = subjects.iter().find(|s| s.id == id) {
            return Ok(existing.clone());
        }
        let record = SubjectRecord { id: id.to_string(), created_at: Utc::now() };
        subjects.push(record.clone());
        Ok(record)
    }

    async fn insert_batch(&self, readings: &[VitalsReading]) -> Result<(), PersistenceError> {
        if self.writes_failing() {
            return Err(PersistenceError::Write("memory repository writes disabled".into()));
        }
        self.readings.write().extend_from_slice(readings);
        Ok(())
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, PersistenceError> {
        if self.writes_failing() {
            return Err(PersistenceError::Write("memory repository writes disabled".into()));
        }
        let mut readings = self.readings.write();
        let before = readings.len();
        readings.retain(|r| r.timestamp >= cutoff);
        Ok((before - readings.len()) as u64)
    }

    async fn count_readings(&self) -> Result<u64, PersistenceError> {
        if self.fetches_failing() {
            return Err(PersistenceError::Fetch("memory repository fetch disabled".into()));
        }
        Ok(self.readings.read().len() as u64)
    }

    async fn count_subjects(&self) -> Result<u64, PersistenceError> {
        if self.fetches_failing() {
            return Err(PersistenceError::Fetch("memory repository fetch disabled".into()));
        }
        Ok(self.subjects.read().len() as u64)
    }

    async fn readings_for_subject(
        &self,
        subject_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<VitalsReading>, PersistenceError> {
        if self.fetches_failing() {
            return Err(PersistenceError::Fetch("memory repository fetch disabled".into()));
        }
        let mut rows: Vec<VitalsReading> = self
            .readings
            .read()
            .iter()
            .filter(|r| r.subject_id == subject_id && r.timestamp >= since)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(rows)
    }
}
