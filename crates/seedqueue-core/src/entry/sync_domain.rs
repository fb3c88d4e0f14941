//! The critical section an entry shares with its worker.

use std::fmt;
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

/// Jointly owned synchronization handle.
///
/// The worker instance creates it and exposes it through
/// [`WorkerInstance::sync_domain`](crate::ports::WorkerInstance::sync_domain);
/// the entry enters the very same handle. "Lock the entry" and "lock the
/// worker" are therefore one critical section by construction.
///
/// Not reentrant. Collaborators called while it is held (pause capability,
/// termination helpers, ping) must not enter it again.
#[derive(Clone, Default)]
pub struct SyncDomain {
    lock: Arc<Mutex<()>>,
}

impl SyncDomain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter(&self) -> MutexGuard<'_, ()> {
        self.lock.lock()
    }

    pub fn try_enter(&self) -> Option<MutexGuard<'_, ()>> {
        self.lock.try_lock()
    }

    pub fn is_shared_with(&self, other: &SyncDomain) -> bool {
        Arc::ptr_eq(&self.lock, &other.lock)
    }
}

impl fmt::Debug for SyncDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncDomain")
            .field("locked", &self.lock.is_locked())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_one_critical_section() {
        let domain = SyncDomain::new();
        let shared = domain.clone();

        let _guard = domain.enter();
        assert!(shared.try_enter().is_none());
        assert!(domain.is_shared_with(&shared));
        assert!(!domain.is_shared_with(&SyncDomain::new()));
    }
}
