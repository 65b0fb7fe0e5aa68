//! Concurrency-safe registry of live subject states.
//!
//! Entries are created lazily on first access and removed explicitly.
//! Each entry is an `Arc<Mutex<SubjectState>>`, so ticks on one subject
//! serialize behind its own lock while different subjects proceed
//! independently; the outer map lock is held only for lookup, insert
//! and delete.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::subject::SubjectState;

/// Shared handle to one subject's state.
pub type SharedSubject = Arc<Mutex<SubjectState>>;

/// Identity-keyed map of live [`SubjectState`] instances.
#[derive(Default)]
pub struct SubjectRegistry {
    subjects: RwLock<HashMap<String, SharedSubject>>,
}

impl SubjectRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the state for `identity`, creating and seeding it on first use.
    ///
    /// Two calls with the same identity return handles to the same
    /// state, never two independent ones.
    pub fn get_or_create(&self, identity: &str) -> SharedSubject {
        self.get_or_create_seeded(identity, identity)
    }

    /// Get the state stored under `key`, seeding a new state from
    /// `identity` on first use.
    ///
    /// Connection-scoped entries use this split: the entry is keyed by
    /// a per-connection id while the metrics seed from the upstream
    /// identity, so two connections presenting the same identity start
    /// from identical base values but walk independently.
    pub fn get_or_create_seeded(&self, key: &str, identity: &str) -> SharedSubject {
        if let Some(existing) = self.subjects.read().get(key) {
            return Arc::clone(existing);
        }

        let mut subjects = self.subjects.write();
        Arc::clone(
            subjects
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(SubjectState::from_identity(identity)))),
        )
    }

    /// Look up an existing entry without creating one.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<SharedSubject> {
        self.subjects.read().get(key).map(Arc::clone)
    }

    /// Remove an entry. Removing an absent key is a no-op.
    pub fn remove(&self, key: &str) {
        self.subjects.write().remove(key);
    }

    /// Number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subjects.read().len()
    }

    /// Whether the registry holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subjects.read().is_empty()
    }
}
