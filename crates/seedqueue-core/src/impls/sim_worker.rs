//! SimulatedWorker - an in-process worker generating fake chunks.
//!
//! Implements the worker side of the pause contract: a scheduled pause lands
//! at the next safe point (between two chunks), and the generation thread
//! blocks on a Condvar until it is unpaused or stopped.
//!
//! # Lock order
//! sync domain -> pause state. The generation thread never holds the pause
//! state while entering the domain.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use parking_lot::{Condvar, Mutex};
use rand::Rng;

use crate::domain::WorkerId;
use crate::entry::{EntryRegistry, SyncDomain};
use crate::ports::{PauseCapability, ProgressTracker, WorkerInstance};

/// Shape of a simulated generation.
#[derive(Debug, Clone)]
pub struct Workload {
    pub total_chunks: u32,
    /// Progress at which the entry is told it reached the threshold.
    pub max_progress_percentage: u8,
    pub step_delay: Duration,
}

impl Workload {
    /// A workload with a randomized chunk count, so queued workers finish at
    /// different times.
    pub fn randomized(max_progress_percentage: u8, step_delay: Duration) -> Self {
        Self {
            total_chunks: rand::thread_rng().gen_range(40..=120),
            max_progress_percentage,
            step_delay,
        }
    }
}

#[derive(Debug, Default)]
struct PauseState {
    paused: bool,
    scheduled: bool,
}

pub struct SimulatedWorker {
    id: WorkerId,
    domain: SyncDomain,
    registry: EntryRegistry,
    workload: Workload,

    pause: Mutex<PauseState>,
    resumed: Condvar,

    running: AtomicBool,
    stop_requested: AtomicBool,
    loading_finished: AtomicBool,
    generation_finished: AtomicBool,
    generated_chunks: AtomicU32,
}

impl fmt::Debug for SimulatedWorker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulatedWorker")
            .field("id", &format_args!("{}", self.id))
            .field("running", &self.is_running())
            .field("paused", &self.is_paused())
            .field("progress", &self.progress_percentage())
            .finish()
    }
}

impl SimulatedWorker {
    pub fn new(registry: EntryRegistry, workload: Workload) -> Arc<Self> {
        Arc::new(Self {
            id: WorkerId::generate(),
            domain: SyncDomain::new(),
            registry,
            workload,
            pause: Mutex::new(PauseState::default()),
            resumed: Condvar::new(),
            running: AtomicBool::new(true),
            stop_requested: AtomicBool::new(false),
            loading_finished: AtomicBool::new(false),
            generation_finished: AtomicBool::new(false),
            generated_chunks: AtomicU32::new(0),
        })
    }

    pub fn sync_domain_handle(&self) -> &SyncDomain {
        &self.domain
    }

    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    /// Generate one chunk. Returns false once generation is complete.
    pub fn advance(&self) -> bool {
        if self.generation_finished.load(Ordering::Acquire) {
            return false;
        }
        let total = self.workload.total_chunks.max(1);
        let generated = (self.generated_chunks.fetch_add(1, Ordering::AcqRel) + 1).min(total);

        if self.progress_percentage() >= i32::from(self.workload.max_progress_percentage)
            && let Some(entry) = self.registry.get(self.id)
        {
            entry.set_max_progress_reached();
        }

        if generated >= total {
            self.generation_finished.store(true, Ordering::Release);
            self.loading_finished.store(true, Ordering::Release);
            tracing::debug!(worker = %self.id, "generation finished");
            return false;
        }
        true
    }

    /// Safe point: decide, inside the sync domain, whether to pause now.
    ///
    /// Consumes a scheduled pause. Returns whether the worker is paused.
    pub fn pause_at_safe_point(&self) -> bool {
        if !self.is_running() {
            return false;
        }
        let _domain = self.domain.enter();
        let should_pause = self
            .registry
            .get(self.id)
            .is_some_and(|entry| entry.should_pause());

        let mut state = self.pause.lock();
        state.scheduled = false;
        if should_pause {
            state.paused = true;
        }
        state.paused
    }

    /// Block while paused. Returns when unpaused or stopped.
    pub fn wait_while_paused(&self) {
        let mut state = self.pause.lock();
        while state.paused && self.is_running() {
            self.resumed.wait(&mut state);
        }
    }

    /// Generation loop, run on the worker's own thread.
    pub fn run(&self) {
        tracing::debug!(worker = %self.id, chunks = self.workload.total_chunks, "worker started");
        while self.is_running() {
            if self.is_stop_requested() {
                self.running.store(false, Ordering::Release);
                break;
            }
            if self.pause_at_safe_point() {
                self.wait_while_paused();
                continue;
            }
            if self.generation_finished.load(Ordering::Acquire) {
                // a dropped entry can never be claimed
                let handed_over = self
                    .registry
                    .get(self.id)
                    .is_none_or(|entry| entry.is_loaded());
                if handed_over {
                    tracing::debug!(worker = %self.id, "handed over to the foreground");
                    break;
                }
            } else {
                self.advance();
            }
            thread::sleep(self.workload.step_delay);
        }
        tracing::debug!(worker = %self.id, "worker stopped");
    }

    /// Start the generation thread.
    pub fn spawn(self: &Arc<Self>) -> std::io::Result<JoinHandle<()>> {
        let worker = Arc::clone(self);
        thread::Builder::new()
            .name(self.id.to_string())
            .spawn(move || worker.run())
    }
}

impl PauseCapability for SimulatedWorker {
    fn is_paused(&self) -> bool {
        self.pause.lock().paused
    }

    fn is_scheduled_to_pause(&self) -> bool {
        self.pause.lock().scheduled
    }

    fn schedule_pause(&self) {
        self.pause.lock().scheduled = true;
    }

    fn unpause(&self) {
        let mut state = self.pause.lock();
        state.paused = false;
        state.scheduled = false;
        self.resumed.notify_all();
    }
}

impl WorkerInstance for SimulatedWorker {
    fn id(&self) -> WorkerId {
        self.id
    }

    fn sync_domain(&self) -> &SyncDomain {
        &self.domain
    }

    fn is_generation_finished(&self) -> bool {
        self.generation_finished.load(Ordering::Acquire)
    }

    fn has_finished_loading(&self) -> bool {
        self.loading_finished.load(Ordering::Acquire)
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
    }

    fn force_stop(&self) {
        // flip under the pause lock so a waiting thread cannot miss the wakeup
        let _state = self.pause.lock();
        self.running.store(false, Ordering::Release);
        self.resumed.notify_all();
    }
}

impl ProgressTracker for SimulatedWorker {
    fn progress_percentage(&self) -> i32 {
        let total = u64::from(self.workload.total_chunks.max(1));
        let generated = u64::from(self.generated_chunks.load(Ordering::Acquire)).min(total);
        (generated * 100 / total) as i32
    }
}
