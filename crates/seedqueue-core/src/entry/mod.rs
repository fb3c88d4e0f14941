//! Entry - one queued worker plus its preview/settings resources.
//!
//! The entry is shared (`Arc<Entry>`) between three actors:
//! - the worker's generation thread (progress, threshold signal)
//! - the scheduler (pause scheduling, discard)
//! - the render/foreground thread (lock, load, preview, settings)
//!
//! # Concurrency
//! - flags are lock-free, monotonic reads (see [`EntryFlags`])
//! - check-then-act operations (`try_to_unpause`, `try_to_schedule_pause`,
//!   `lock`, `load`, `discard`) run inside the [`SyncDomain`] shared with the
//!   worker
//! - the preview resource is guarded by render-thread affinity, not by the
//!   sync domain
//!
//! The operations are split over `pause`, `preview` and `lifecycle`.

mod handle;
mod lifecycle;
mod pause;
mod preview;
mod registry;
mod sync_domain;

#[cfg(test)]
pub(crate) mod fixtures;

pub use self::handle::WorkerHandle;
pub use self::registry::EntryRegistry;
pub use self::sync_domain::SyncDomain;

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::{Arc, Weak};

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};

use crate::domain::{
    EntryFlags, FlagSnapshot, OpaqueHandle, PreviewProperties, SessionServices, SettingsSnapshot,
    StorageSession, WorkerId,
};
use crate::ports::{
    CooperativeShutdown, FastKill, PreviewBackend, PreviewResource, ProgressTracker, SchedulerPing,
};
use crate::render::RenderThread;

/// What an entry is built from: the worker and its supporting resources.
#[derive(Debug)]
pub struct EntryParts {
    pub worker: WorkerHandle,
    pub session: StorageSession,
    pub resource_manager: OpaqueHandle,
    pub services: SessionServices,
}

/// Queue-wide collaborators every entry talks to.
#[derive(Clone)]
pub struct EntryCollaborators {
    pub render: RenderThread,
    pub preview_backend: Arc<dyn PreviewBackend>,
    pub ping: Arc<dyn SchedulerPing>,
    pub fast_kill: Option<Arc<dyn FastKill>>,
    pub shutdown: Option<Arc<dyn CooperativeShutdown>>,
}

pub struct Entry {
    worker: WorkerHandle,
    session: StorageSession,
    resource_manager: OpaqueHandle,
    services: SessionServices,
    collaborators: EntryCollaborators,
    created_at: DateTime<Utc>,

    flags: EntryFlags,

    progress_tracker: RwLock<Option<Weak<dyn ProgressTracker>>>,

    preview_properties: RwLock<Option<PreviewProperties>>,
    preview_resource: Mutex<Option<Box<dyn PreviewResource>>>,
    preview_live: AtomicBool,

    settings_snapshot: Mutex<Option<SettingsSnapshot>>,
    /// Derived from the preview metadata when the snapshot is set.
    perspective: AtomicI32,

    /// Position in the wall layout's main group, -1 when not placed.
    /// Owned by the layout; the entry never writes it.
    main_position: AtomicI32,
}

impl Entry {
    /// Build an entry and register it as the owner of its worker.
    pub fn register(
        parts: EntryParts,
        collaborators: EntryCollaborators,
        registry: &EntryRegistry,
    ) -> Arc<Self> {
        let entry = Arc::new(Self {
            worker: parts.worker,
            session: parts.session,
            resource_manager: parts.resource_manager,
            services: parts.services,
            collaborators,
            created_at: Utc::now(),
            flags: EntryFlags::new(),
            progress_tracker: RwLock::new(None),
            preview_properties: RwLock::new(None),
            preview_resource: Mutex::new(None),
            preview_live: AtomicBool::new(false),
            settings_snapshot: Mutex::new(None),
            perspective: AtomicI32::new(0),
            main_position: AtomicI32::new(-1),
        });
        registry.insert(&entry);
        tracing::debug!(
            session = %entry.session,
            worker = %entry.worker_id(),
            "registered queue entry"
        );
        entry
    }

    pub fn worker(&self) -> &WorkerHandle {
        &self.worker
    }

    pub fn worker_id(&self) -> WorkerId {
        self.worker.id()
    }

    pub fn session(&self) -> &StorageSession {
        &self.session
    }

    pub fn resource_manager(&self) -> &OpaqueHandle {
        &self.resource_manager
    }

    pub fn services(&self) -> &SessionServices {
        &self.services
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_locked(&self) -> bool {
        self.flags.is_locked()
    }

    pub fn is_loaded(&self) -> bool {
        self.flags.is_loaded()
    }

    pub fn is_discarded(&self) -> bool {
        self.flags.is_discarded()
    }

    pub fn is_max_progress_reached(&self) -> bool {
        self.flags.is_max_progress_reached()
    }

    pub fn flags(&self) -> FlagSnapshot {
        self.flags.snapshot()
    }

    pub fn main_position(&self) -> i32 {
        self.main_position.load(Ordering::Relaxed)
    }

    pub fn set_main_position(&self, position: i32) {
        self.main_position.store(position, Ordering::Relaxed);
    }

    /// True once the worker finished loading and the artifact can be joined.
    pub fn is_ready(&self) -> bool {
        self.worker.instance().has_finished_loading()
    }

    /// Attach the worker-owned progress tracker.
    pub fn attach_progress_tracker(&self, tracker: Weak<dyn ProgressTracker>) {
        *self.progress_tracker.write() = Some(tracker);
    }

    pub fn progress_tracker(&self) -> Option<Arc<dyn ProgressTracker>> {
        self.progress_tracker.read().as_ref().and_then(Weak::upgrade)
    }

    /// Generation progress in percent.
    ///
    /// 0 when no tracker is attached yet, or when the worker already dropped
    /// it.
    pub fn progress_percentage(&self) -> i32 {
        self.progress_tracker()
            .map_or(0, |tracker| tracker.progress_percentage())
    }

    /// Record that the worker crossed the configured progress threshold.
    ///
    /// One-way; ignored once the entry is discarded.
    pub fn set_max_progress_reached(&self) {
        if self.is_discarded() {
            return;
        }
        if self.flags.set_max_progress_reached() {
            tracing::debug!(session = %self.session, "max generation progress reached");
        }
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("session", &self.session)
            .field("worker", &self.worker)
            .field("flags", &self.flags.snapshot())
            .field("has_preview_resource", &self.has_preview_resource())
            .field("main_position", &self.main_position())
            .finish()
    }
}
