//! Render-thread affinity.
//!
//! Preview resources are only valid on one thread. [`RenderThread`] names
//! that thread and fails loudly when a thread-affine operation runs anywhere
//! else. Resources that must be released from another thread are handed to
//! its release queue and freed the next time the render thread drains it.

use std::fmt;
use std::sync::Arc;
use std::thread::{self, ThreadId};

use parking_lot::Mutex;

use crate::domain::EntryError;
use crate::ports::PreviewResource;

/// Handle to the designated render thread.
#[derive(Clone)]
pub struct RenderThread {
    inner: Arc<RenderThreadInner>,
}

struct RenderThreadInner {
    thread: ThreadId,
    pending_releases: Mutex<Vec<Box<dyn PreviewResource>>>,
}

impl RenderThread {
    /// Designate the calling thread as the render thread.
    pub fn bind_current() -> Self {
        Self {
            inner: Arc::new(RenderThreadInner {
                thread: thread::current().id(),
                pending_releases: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn is_current(&self) -> bool {
        thread::current().id() == self.inner.thread
    }

    /// Fail with an affinity violation unless called on the render thread.
    pub fn ensure_current(&self, operation: &'static str) -> Result<(), EntryError> {
        if self.is_current() {
            Ok(())
        } else {
            Err(EntryError::affinity(operation))
        }
    }

    /// Queue a resource for release on the render thread.
    pub(crate) fn defer_release(&self, resource: Box<dyn PreviewResource>) {
        self.inner.pending_releases.lock().push(resource);
    }

    pub fn pending_releases(&self) -> usize {
        self.inner.pending_releases.lock().len()
    }

    /// Release every queued resource. Returns how many were freed.
    pub fn drain_pending_releases(&self) -> Result<usize, EntryError> {
        self.ensure_current("drain pending preview releases")?;
        let pending = std::mem::take(&mut *self.inner.pending_releases.lock());
        let count = pending.len();
        for resource in pending {
            resource.release();
        }
        if count > 0 {
            tracing::debug!(count, "released deferred preview resources");
        }
        Ok(count)
    }
}

impl fmt::Debug for RenderThread {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderThread")
            .field("thread", &self.inner.thread)
            .field("pending_releases", &self.pending_releases())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::InMemoryPreviewBackend;
    use crate::ports::PreviewBackend;

    #[test]
    fn bound_thread_is_current() {
        let render = RenderThread::bind_current();

        assert!(render.is_current());
        assert!(render.ensure_current("draw").is_ok());
    }

    #[test]
    fn other_threads_violate_affinity() {
        let render = RenderThread::bind_current();

        let err = thread::spawn(move || render.ensure_current("draw"))
            .join()
            .unwrap()
            .unwrap_err();

        assert_eq!(err, EntryError::affinity("draw"));
    }

    #[test]
    fn deferred_releases_are_freed_on_drain() {
        let render = RenderThread::bind_current();
        let backend = InMemoryPreviewBackend::new(4, 4);

        let resource = backend.create();
        let remote = render.clone();
        thread::spawn(move || remote.defer_release(resource))
            .join()
            .unwrap();

        assert_eq!(render.pending_releases(), 1);
        assert_eq!(backend.live(), 1);

        assert_eq!(render.drain_pending_releases().unwrap(), 1);
        assert_eq!(backend.live(), 0);
    }

    #[test]
    fn drain_off_thread_is_rejected() {
        let render = RenderThread::bind_current();

        let result = thread::spawn(move || render.drain_pending_releases())
            .join()
            .unwrap();

        assert!(result.unwrap_err().is_affinity_violation());
    }
}
