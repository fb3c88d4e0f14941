//! CountingPing - a SchedulerPing that records pings instead of driving a loop.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::ports::SchedulerPing;

/// Counts pings; useful to observe lock transitions.
#[derive(Debug, Default)]
pub struct CountingPing {
    count: AtomicUsize,
}

impl CountingPing {
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl SchedulerPing for CountingPing {
    fn ping(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}
