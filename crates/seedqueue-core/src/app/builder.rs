//! QueueBuilder - wiring of the queue, its collaborators and the scheduler.
//!
//! Validation happens in `build()` so a misconfigured queue fails at startup
//! instead of on the first entry.

use std::sync::Arc;

use crate::app::policy::ConcurrencyCapPolicy;
use crate::app::queue::SeedQueue;
use crate::app::scheduler_loop::{NotifyPing, SchedulerHandle, SchedulerLoop};
use crate::config::{ConfigError, QueueConfig};
use crate::entry::EntryCollaborators;
use crate::impls::InMemoryPreviewBackend;
use crate::ports::{CooperativeShutdown, FastKill, PausePolicy, PreviewBackend};
use crate::render::RenderThread;

/// Builds an [`App`].
///
/// ```ignore
/// let app = QueueBuilder::new(config)
///     .render_thread(RenderThread::bind_current())
///     .shutdown(Arc::new(GracefulShutdown))
///     .build()?;
/// ```
pub struct QueueBuilder {
    config: QueueConfig,
    render: Option<RenderThread>,
    preview_backend: Option<Arc<dyn PreviewBackend>>,
    fast_kill: Option<Arc<dyn FastKill>>,
    shutdown: Option<Arc<dyn CooperativeShutdown>>,
    policy: Option<Arc<dyn PausePolicy>>,
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("no render thread was bound. Call render_thread() before build().")]
    MissingRenderThread,

    #[error("invalid queue configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

impl QueueBuilder {
    pub fn new(config: QueueConfig) -> Self {
        Self {
            config,
            render: None,
            preview_backend: None,
            fast_kill: None,
            shutdown: None,
            policy: None,
        }
    }

    /// The thread that owns preview resources and claims entries. Required.
    pub fn render_thread(mut self, render: RenderThread) -> Self {
        self.render = Some(render);
        self
    }

    /// Defaults to an in-memory backend sized from the config.
    pub fn preview_backend(mut self, backend: Arc<dyn PreviewBackend>) -> Self {
        self.preview_backend = Some(backend);
        self
    }

    pub fn fast_kill(mut self, fast_kill: Arc<dyn FastKill>) -> Self {
        self.fast_kill = Some(fast_kill);
        self
    }

    pub fn shutdown(mut self, shutdown: Arc<dyn CooperativeShutdown>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    /// Defaults to [`ConcurrencyCapPolicy`].
    pub fn policy(mut self, policy: Arc<dyn PausePolicy>) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn build(self) -> Result<App, BuildError> {
        self.config.validate()?;
        let render = self.render.ok_or(BuildError::MissingRenderThread)?;

        let preview_backend = self.preview_backend.unwrap_or_else(|| {
            Arc::new(InMemoryPreviewBackend::new(
                self.config.preview_width,
                self.config.preview_height,
            ))
        });
        let policy = self.policy.unwrap_or_else(|| {
            Arc::new(ConcurrencyCapPolicy::new(self.config.max_concurrent_generating))
        });
        let ping = Arc::new(NotifyPing::new());

        let collaborators = EntryCollaborators {
            render,
            preview_backend,
            ping: ping.clone(),
            fast_kill: self.fast_kill,
            shutdown: self.shutdown,
        };
        let queue = Arc::new(SeedQueue::new(self.config, collaborators));

        Ok(App {
            queue,
            policy,
            ping,
        })
    }
}

/// A wired queue, ready to accept entries and run its scheduler.
pub struct App {
    pub queue: Arc<SeedQueue>,
    pub policy: Arc<dyn PausePolicy>,
    pub ping: Arc<NotifyPing>,
}

impl App {
    /// Start the scheduler loop on the current tokio runtime.
    pub fn spawn_scheduler(&self) -> SchedulerHandle {
        SchedulerLoop::spawn(
            Arc::clone(&self.queue),
            Arc::clone(&self.policy),
            Arc::clone(&self.ping),
            self.queue.config().scheduler_poll_interval(),
        )
    }
}
