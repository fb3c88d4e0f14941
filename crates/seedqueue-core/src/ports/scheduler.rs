//! Scheduler ports - lock notifications and pause-target selection.

use std::sync::Arc;

use crate::domain::WorkerId;
use crate::entry::Entry;

/// Notification hook the scheduler listens on.
///
/// Fired whenever `Entry::lock` transitions an entry; the scheduler is
/// expected to re-run pause-target selection afterwards.
pub trait SchedulerPing: Send + Sync {
    fn ping(&self);
}

/// What the scheduler should do with one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseAction {
    SchedulePause(WorkerId),
    Unpause(WorkerId),
}

/// Chooses which entries to pause or resume.
///
/// # Design
/// - plans only: current entry state in, actions out
/// - actions are applied by the scheduler loop through the entry's atomic
///   `try_to_schedule_pause` / `try_to_unpause`, so a stale plan is harmless
pub trait PausePolicy: Send + Sync {
    fn plan(&self, entries: &[Arc<Entry>]) -> Vec<PauseAction>;
}
