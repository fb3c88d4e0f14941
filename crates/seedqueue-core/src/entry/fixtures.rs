//! Test wiring for entries backed by simulated workers.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::{OpaqueHandle, SessionServices, StorageSession};
use crate::entry::{Entry, EntryCollaborators, EntryParts, EntryRegistry, WorkerHandle};
use crate::impls::{CountingPing, InMemoryPreviewBackend, SimulatedWorker, Workload};
use crate::ports::{CooperativeShutdown, FastKill, PreviewBackend, ProgressTracker};
use crate::render::RenderThread;

pub(crate) struct Fixture {
    pub registry: EntryRegistry,
    pub render: RenderThread,
    pub preview: Arc<InMemoryPreviewBackend>,
    pub ping: Arc<CountingPing>,
    preview_backend: Option<Arc<dyn PreviewBackend>>,
    fast_kill: Option<Arc<dyn FastKill>>,
    shutdown: Option<Arc<dyn CooperativeShutdown>>,
}

impl Fixture {
    /// Binds the calling test thread as the render thread.
    pub fn new() -> Self {
        Self {
            registry: EntryRegistry::new(),
            render: RenderThread::bind_current(),
            preview: Arc::new(InMemoryPreviewBackend::new(16, 9)),
            ping: Arc::new(CountingPing::default()),
            preview_backend: None,
            fast_kill: None,
            shutdown: None,
        }
    }

    /// Replace the in-memory preview backend.
    pub fn with_preview_backend(mut self, backend: Arc<dyn PreviewBackend>) -> Self {
        self.preview_backend = Some(backend);
        self
    }

    pub fn with_fast_kill(mut self, fast_kill: Arc<dyn FastKill>) -> Self {
        self.fast_kill = Some(fast_kill);
        self
    }

    pub fn with_shutdown(mut self, shutdown: Arc<dyn CooperativeShutdown>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    pub fn collaborators(&self) -> EntryCollaborators {
        EntryCollaborators {
            render: self.render.clone(),
            preview_backend: self
                .preview_backend
                .clone()
                .unwrap_or_else(|| self.preview.clone()),
            ping: self.ping.clone(),
            fast_kill: self.fast_kill.clone(),
            shutdown: self.shutdown.clone(),
        }
    }

    pub fn workload() -> Workload {
        Workload {
            total_chunks: 10,
            max_progress_percentage: 80,
            step_delay: Duration::ZERO,
        }
    }

    fn build(&self, attach_tracker: bool) -> (Arc<Entry>, Arc<SimulatedWorker>) {
        let worker = SimulatedWorker::new(self.registry.clone(), Self::workload());
        let parts = EntryParts {
            worker: WorkerHandle::new(worker.clone()),
            session: StorageSession::new(format!("Random Speedrun #{}", self.registry.len() + 1)),
            resource_manager: OpaqueHandle::new(Arc::new(())),
            services: SessionServices::default(),
        };
        let entry = Entry::register(parts, self.collaborators(), &self.registry);
        if attach_tracker {
            let tracker: Arc<dyn ProgressTracker> = worker.clone();
            entry.attach_progress_tracker(Arc::downgrade(&tracker));
        }
        (entry, worker)
    }

    pub fn entry_with_worker(&self) -> (Arc<Entry>, Arc<SimulatedWorker>) {
        self.build(true)
    }

    pub fn entry(&self) -> Arc<Entry> {
        self.build(true).0
    }

    pub fn entry_without_tracker(&self) -> Arc<Entry> {
        self.build(false).0
    }
}
