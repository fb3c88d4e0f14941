//! Termination ports - ways to stop a discarded worker.
//!
//! Discard tries [`FastKill`] first. When it is absent or declines, discard
//! asks [`CooperativeShutdown`] (if any) and then forces the running flag off.
//! A declined fast kill is not an error.

use crate::entry::WorkerHandle;

/// Best-effort immediate termination.
pub trait FastKill: Send + Sync {
    /// Returns false when the worker could not be killed this way.
    fn try_kill(&self, worker: &WorkerHandle) -> bool;
}

/// Cooperative shutdown request.
pub trait CooperativeShutdown: Send + Sync {
    fn request_stop(&self, worker: &WorkerHandle);
}
