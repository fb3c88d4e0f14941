//! Owning handle to an entry's worker instance.

use std::fmt;
use std::sync::Arc;

use crate::domain::WorkerId;
use crate::entry::SyncDomain;
use crate::ports::WorkerInstance;

/// The entry's exclusive handle to its worker.
///
/// Not `Clone`: an entry owns exactly one handle and nothing else tears the
/// worker down.
pub struct WorkerHandle {
    id: WorkerId,
    instance: Arc<dyn WorkerInstance>,
}

impl WorkerHandle {
    pub fn new(instance: Arc<dyn WorkerInstance>) -> Self {
        Self {
            id: instance.id(),
            instance,
        }
    }

    pub fn id(&self) -> WorkerId {
        self.id
    }

    pub fn instance(&self) -> &dyn WorkerInstance {
        self.instance.as_ref()
    }

    pub fn sync_domain(&self) -> &SyncDomain {
        self.instance.sync_domain()
    }
}

impl fmt::Debug for WorkerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerHandle")
            .field("id", &self.id)
            .field("running", &self.instance.is_running())
            .finish()
    }
}
