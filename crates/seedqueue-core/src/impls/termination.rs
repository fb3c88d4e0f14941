//! GracefulShutdown - cooperative stop through the worker's own stop request.

use crate::entry::WorkerHandle;
use crate::ports::CooperativeShutdown;

#[derive(Debug, Default)]
pub struct GracefulShutdown;

impl CooperativeShutdown for GracefulShutdown {
    fn request_stop(&self, worker: &WorkerHandle) {
        tracing::debug!(worker = %worker.id(), "requesting cooperative stop");
        worker.instance().request_stop();
    }
}
