//! Worker port - the background instance generating one artifact.
//!
//! The worker owns the pause state machine. It picks the safe point at which
//! a scheduled pause lands, and blocks there until unpaused.

use crate::domain::WorkerId;
use crate::entry::SyncDomain;

/// Pause state machine of a worker.
///
/// # Contract
/// - `schedule_pause` only records the request; the worker pauses at its next
///   safe point, which consumes the request
/// - `unpause` cancels a pending request and resumes a paused worker
/// - all calls are near-instant signals, never blocking joins
pub trait PauseCapability: Send + Sync {
    fn is_paused(&self) -> bool;

    fn is_scheduled_to_pause(&self) -> bool;

    fn schedule_pause(&self);

    fn unpause(&self);
}

/// A worker instance as seen by its entry.
pub trait WorkerInstance: PauseCapability {
    fn id(&self) -> WorkerId;

    /// The critical section shared with the entry owning this worker.
    fn sync_domain(&self) -> &SyncDomain;

    /// True once generation reached its natural completion point.
    fn is_generation_finished(&self) -> bool;

    /// True once the worker finished its loading phase and can be joined.
    fn has_finished_loading(&self) -> bool;

    fn is_running(&self) -> bool;

    /// Ask the worker to shut down at its own pace.
    fn request_stop(&self);

    /// Last resort: flip the running flag off directly.
    fn force_stop(&self);
}
