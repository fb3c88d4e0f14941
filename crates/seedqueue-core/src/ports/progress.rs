//! ProgressTracker port - generation progress owned by the worker.

/// Reports how far generation got.
///
/// The worker owns the tracker; entries only hold a weak reference to it.
pub trait ProgressTracker: Send + Sync {
    /// Improved progress estimate in percent (0..=100).
    fn progress_percentage(&self) -> i32;
}
