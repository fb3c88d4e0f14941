//! Worker -> entry back-references.
//!
//! A worker needs to find "its" entry when it reaches a safe point. Instead
//! of a back-pointer, the association is an index keyed by worker identity
//! holding weak references, so ownership stays one-directional
//! (entry -> worker).

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::domain::WorkerId;
use crate::entry::Entry;

#[derive(Clone, Default)]
pub struct EntryRegistry {
    entries: Arc<RwLock<HashMap<WorkerId, Weak<Entry>>>>,
}

impl EntryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&self, entry: &Arc<Entry>) {
        self.entries
            .write()
            .insert(entry.worker_id(), Arc::downgrade(entry));
    }

    /// Look up the live entry owning `worker`.
    pub fn get(&self, worker: WorkerId) -> Option<Arc<Entry>> {
        self.entries.read().get(&worker).and_then(Weak::upgrade)
    }

    pub fn remove(&self, worker: WorkerId) -> bool {
        self.entries.write().remove(&worker).is_some()
    }

    /// Drop associations whose entry no longer exists. Returns how many.
    pub fn prune(&self) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| entry.strong_count() > 0);
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
