//! SeedQueue - the container of queued entries.
//!
//! Entries are kept in insertion order, which is also age order. The queue
//! only arranges entries; every state transition goes through the entry
//! itself.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::JoinHandle;

use parking_lot::RwLock;

use crate::config::QueueConfig;
use crate::domain::{OpaqueHandle, SessionServices, StorageSession, WorkerId};
use crate::entry::{Entry, EntryCollaborators, EntryParts, EntryRegistry, WorkerHandle};
use crate::error::SeedQueueError;
use crate::impls::{SimulatedWorker, Workload};
use crate::observability::{EntryView, QueueCounts};
use crate::ports::ProgressTracker;
use crate::render::RenderThread;

pub struct SeedQueue {
    config: QueueConfig,
    registry: EntryRegistry,
    collaborators: EntryCollaborators,
    entries: RwLock<Vec<Arc<Entry>>>,
    sessions_created: AtomicU64,
}

impl SeedQueue {
    pub fn new(config: QueueConfig, collaborators: EntryCollaborators) -> Self {
        Self {
            config,
            registry: EntryRegistry::new(),
            collaborators,
            entries: RwLock::new(Vec::new()),
            sessions_created: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    pub fn registry(&self) -> &EntryRegistry {
        &self.registry
    }

    pub fn render(&self) -> &RenderThread {
        &self.collaborators.render
    }

    pub fn capacity(&self) -> usize {
        self.config.max_capacity
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Queue a new entry and ping the scheduler.
    ///
    /// # Errors
    /// `QueueFull` when the queue is at capacity; nothing is registered then.
    pub fn add(&self, parts: EntryParts) -> Result<Arc<Entry>, SeedQueueError> {
        let entry = {
            let mut entries = self.entries.write();
            if entries.len() >= self.config.max_capacity {
                return Err(SeedQueueError::QueueFull {
                    capacity: self.config.max_capacity,
                });
            }
            let entry = Entry::register(parts, self.collaborators.clone(), &self.registry);
            entries.push(Arc::clone(&entry));
            entry
        };
        tracing::info!(
            session = %entry.session(),
            worker = %entry.worker_id(),
            "queued entry"
        );
        self.collaborators.ping.ping();
        Ok(entry)
    }

    /// Queue an entry backed by a [`SimulatedWorker`] without starting it.
    pub fn add_simulated(
        &self,
        workload: Workload,
    ) -> Result<(Arc<Entry>, Arc<SimulatedWorker>), SeedQueueError> {
        let worker = SimulatedWorker::new(self.registry.clone(), workload);
        let number = self.sessions_created.fetch_add(1, Ordering::Relaxed) + 1;
        let parts = EntryParts {
            worker: WorkerHandle::new(worker.clone()),
            session: StorageSession::new(format!("Random Speedrun #{number}")),
            resource_manager: OpaqueHandle::new(Arc::new(())),
            services: SessionServices::default(),
        };
        let entry = self.add(parts)?;
        let tracker: Arc<dyn ProgressTracker> = worker.clone();
        entry.attach_progress_tracker(Arc::downgrade(&tracker));
        Ok((entry, worker))
    }

    /// Queue a simulated entry and start its generation thread.
    pub fn spawn_simulated(
        &self,
        workload: Workload,
    ) -> Result<(Arc<Entry>, JoinHandle<()>), SeedQueueError> {
        let (entry, worker) = self.add_simulated(workload)?;
        match worker.spawn() {
            Ok(join) => Ok((entry, join)),
            Err(err) => {
                self.discard(entry.worker_id());
                Err(SeedQueueError::Spawn(err))
            }
        }
    }

    pub fn get(&self, worker: WorkerId) -> Option<Arc<Entry>> {
        self.entries
            .read()
            .iter()
            .find(|entry| entry.worker_id() == worker)
            .cloned()
    }

    /// Snapshot of the queued entries, oldest first.
    pub fn entries(&self) -> Vec<Arc<Entry>> {
        self.entries.read().clone()
    }

    pub fn lock(&self, worker: WorkerId) -> bool {
        self.get(worker).is_some_and(|entry| entry.lock())
    }

    /// Claim the best ready entry: locked ones first, then the oldest.
    ///
    /// The claimed entry leaves the queue but stays in the registry so its
    /// worker can still find it. Must run on the render thread.
    pub fn claim(&self) -> Result<Option<Arc<Entry>>, SeedQueueError> {
        let mut entries = self.entries.write();
        let position = entries
            .iter()
            .position(|entry| entry.is_ready() && entry.is_locked())
            .or_else(|| entries.iter().position(|entry| entry.is_ready()));
        let Some(position) = position else {
            return Ok(None);
        };

        entries[position].load()?;
        let entry = entries.remove(position);
        tracing::info!(session = %entry.session(), "claimed entry");
        Ok(Some(entry))
    }

    /// Discard one entry and drop it from the queue.
    pub fn discard(&self, worker: WorkerId) -> bool {
        let entry = {
            let mut entries = self.entries.write();
            let Some(position) = entries.iter().position(|entry| entry.worker_id() == worker)
            else {
                return false;
            };
            entries.remove(position)
        };
        entry.discard();
        self.registry.remove(worker);
        true
    }

    /// Discard every entry that is not locked. Returns how many were dropped.
    pub fn reset_unlocked(&self) -> usize {
        let dropped: Vec<Arc<Entry>> = {
            let mut entries = self.entries.write();
            let (locked, unlocked): (Vec<_>, Vec<_>) =
                entries.drain(..).partition(|entry| entry.is_locked());
            *entries = locked;
            unlocked
        };
        self.discard_entries(&dropped);
        tracing::info!(dropped = dropped.len(), "reset unlocked entries");
        dropped.len()
    }

    /// Discard everything, locked entries included.
    pub fn discard_all(&self) -> usize {
        let dropped = std::mem::take(&mut *self.entries.write());
        self.discard_entries(&dropped);
        tracing::info!(dropped = dropped.len(), "discarded all entries");
        dropped.len()
    }

    fn discard_entries(&self, entries: &[Arc<Entry>]) {
        for entry in entries {
            entry.discard();
            self.registry.remove(entry.worker_id());
        }
        self.registry.prune();
    }

    pub fn views(&self) -> Vec<EntryView> {
        self.entries
            .read()
            .iter()
            .map(|entry| EntryView::from(entry.as_ref()))
            .collect()
    }

    pub fn counts(&self) -> QueueCounts {
        let mut counts = QueueCounts::default();
        for view in self.views() {
            counts.record(&view);
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::builder::QueueBuilder;
    use crate::ports::WorkerInstance;
    use std::thread;
    use std::time::Duration;

    fn queue(capacity: usize) -> Arc<SeedQueue> {
        let config = QueueConfig {
            max_capacity: capacity,
            ..QueueConfig::default()
        };
        QueueBuilder::new(config)
            .render_thread(RenderThread::bind_current())
            .build()
            .unwrap()
            .queue
    }

    fn workload() -> Workload {
        Workload {
            total_chunks: 4,
            max_progress_percentage: 100,
            step_delay: Duration::ZERO,
        }
    }

    fn finish(worker: &SimulatedWorker) {
        while worker.advance() {}
    }

    #[test]
    fn add_respects_capacity() {
        let queue = queue(2);
        queue.add_simulated(workload()).unwrap();
        queue.add_simulated(workload()).unwrap();

        let err = queue.add_simulated(workload()).unwrap_err();

        assert!(matches!(err, SeedQueueError::QueueFull { capacity: 2 }));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.registry().len(), 2);
    }

    #[test]
    fn entries_are_registered_and_named_in_order() {
        let queue = queue(4);
        let (first, _) = queue.add_simulated(workload()).unwrap();
        let (second, _) = queue.add_simulated(workload()).unwrap();

        assert_eq!(first.session().directory_name(), "Random Speedrun #1");
        assert_eq!(second.session().directory_name(), "Random Speedrun #2");
        assert!(queue.registry().get(second.worker_id()).is_some());
        assert_eq!(queue.get(first.worker_id()).unwrap().worker_id(), first.worker_id());
    }

    #[test]
    fn claim_prefers_locked_then_oldest() {
        let queue = queue(4);
        let (oldest, oldest_worker) = queue.add_simulated(workload()).unwrap();
        let (locked, locked_worker) = queue.add_simulated(workload()).unwrap();
        let (_pending, _) = queue.add_simulated(workload()).unwrap();
        finish(&oldest_worker);
        finish(&locked_worker);
        assert!(queue.lock(locked.worker_id()));

        let claimed = queue.claim().unwrap().unwrap();
        assert_eq!(claimed.worker_id(), locked.worker_id());
        assert!(claimed.is_loaded());

        let claimed = queue.claim().unwrap().unwrap();
        assert_eq!(claimed.worker_id(), oldest.worker_id());

        assert!(queue.claim().unwrap().is_none());
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn claimed_entries_stay_registered_while_alive() {
        let queue = queue(2);
        let (_, worker) = queue.add_simulated(workload()).unwrap();
        finish(&worker);

        let claimed = queue.claim().unwrap().unwrap();

        assert!(queue.registry().get(claimed.worker_id()).is_some());
        drop(claimed);
        assert_eq!(queue.registry().prune(), 1);
    }

    #[test]
    fn claim_off_render_thread_keeps_the_entry() {
        let queue = queue(2);
        let (entry, worker) = queue.add_simulated(workload()).unwrap();
        finish(&worker);

        let remote = Arc::clone(&queue);
        let result = thread::spawn(move || remote.claim()).join().unwrap();

        assert!(matches!(result, Err(SeedQueueError::Entry(err)) if err.is_affinity_violation()));
        assert!(!entry.is_loaded());
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn reset_unlocked_keeps_locked_entries() {
        let queue = queue(4);
        let (locked, _) = queue.add_simulated(workload()).unwrap();
        let (unlocked, unlocked_worker) = queue.add_simulated(workload()).unwrap();
        locked.lock();

        assert_eq!(queue.reset_unlocked(), 1);

        assert_eq!(queue.len(), 1);
        assert!(unlocked.is_discarded());
        assert!(!unlocked_worker.is_running());
        assert!(!locked.is_discarded());
        assert!(queue.registry().get(unlocked.worker_id()).is_none());
    }

    #[test]
    fn discard_all_empties_the_queue() {
        let queue = queue(4);
        let (first, _) = queue.add_simulated(workload()).unwrap();
        let (second, _) = queue.add_simulated(workload()).unwrap();
        second.lock();

        assert_eq!(queue.discard_all(), 2);

        assert!(queue.is_empty());
        assert!(first.is_discarded() && second.is_discarded());
        assert!(queue.registry().is_empty());
    }

    #[test]
    fn discard_unknown_worker_is_a_no_op() {
        let queue = queue(2);
        queue.add_simulated(workload()).unwrap();

        assert!(!queue.discard(WorkerId::generate()));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn counts_reflect_entry_state() {
        let queue = queue(4);
        let (locked, _) = queue.add_simulated(workload()).unwrap();
        let (_ready, ready_worker) = queue.add_simulated(workload()).unwrap();
        let (scheduled, _) = queue.add_simulated(workload()).unwrap();
        locked.lock();
        finish(&ready_worker);
        scheduled.schedule_pause();

        let counts = queue.counts();

        assert_eq!(
            counts,
            QueueCounts {
                total: 3,
                locked: 1,
                generating: 1,
                scheduled: 1,
                paused: 0,
                ready: 1,
            }
        );
    }

    #[test]
    fn spawned_entries_run_on_their_own_thread() {
        let queue = queue(2);
        let (entry, join) = queue.spawn_simulated(workload()).unwrap();

        while !entry.is_ready() {
            thread::sleep(Duration::from_millis(1));
        }
        let claimed = queue.claim().unwrap().unwrap();
        join.join().unwrap();

        assert!(claimed.is_loaded());
        assert_eq!(claimed.progress_percentage(), 100);
    }
}
