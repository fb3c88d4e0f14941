//! Entry flags and the pause predicate derived from them.
//!
//! # Flags
//! - locked: consumer intent to keep the entry, suppresses threshold pausing
//! - loaded: the entry was claimed by the foreground
//! - discarded: terminal, the worker is being torn down
//! - max_progress_reached: the worker crossed the configured threshold
//!
//! Every flag only ever goes false -> true. Reads are lock-free and may be
//! stale by one poll cycle; check-then-act sequences run under the entry's
//! sync domain instead.

use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

/// Lock-free flag set of one entry.
#[derive(Debug, Default)]
pub struct EntryFlags {
    locked: AtomicBool,
    loaded: AtomicBool,
    discarded: AtomicBool,
    max_progress_reached: AtomicBool,
}

impl EntryFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Acquire)
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::Acquire)
    }

    pub fn is_discarded(&self) -> bool {
        self.discarded.load(Ordering::Acquire)
    }

    pub fn is_max_progress_reached(&self) -> bool {
        self.max_progress_reached.load(Ordering::Acquire)
    }

    /// Set `locked`. Returns true only for the call that flipped it.
    pub fn set_locked(&self) -> bool {
        !self.locked.swap(true, Ordering::AcqRel)
    }

    pub fn set_loaded(&self) -> bool {
        !self.loaded.swap(true, Ordering::AcqRel)
    }

    pub fn set_discarded(&self) -> bool {
        !self.discarded.swap(true, Ordering::AcqRel)
    }

    pub fn set_max_progress_reached(&self) -> bool {
        !self.max_progress_reached.swap(true, Ordering::AcqRel)
    }

    pub fn snapshot(&self) -> FlagSnapshot {
        FlagSnapshot {
            locked: self.is_locked(),
            loaded: self.is_loaded(),
            discarded: self.is_discarded(),
            max_progress_reached: self.is_max_progress_reached(),
        }
    }
}

/// Point-in-time copy of [`EntryFlags`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagSnapshot {
    pub locked: bool,
    pub loaded: bool,
    pub discarded: bool,
    pub max_progress_reached: bool,
}

/// The independent reasons that make pausing a worker desirable.
///
/// `should_pause` is the OR of these. It is recomputed on every query and
/// never cached: one reason can clear while another appears.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PauseReasons {
    /// The worker reached the natural end of generation.
    pub generation_finished: bool,
    /// The threshold was crossed and the entry is not locked.
    pub max_progress_unlocked: bool,
    /// A scheduler-requested pause that has not landed yet.
    pub scheduled: bool,
}

impl PauseReasons {
    /// Derive the reasons from the entry flags and the worker-side signals.
    ///
    /// Claimed and discarded entries never want to pause.
    pub fn derive(flags: FlagSnapshot, generation_finished: bool, scheduled: bool) -> Self {
        if flags.loaded || flags.discarded {
            return Self::default();
        }
        Self {
            generation_finished,
            max_progress_unlocked: flags.max_progress_reached && !flags.locked,
            scheduled,
        }
    }

    pub fn any(&self) -> bool {
        self.generation_finished || self.max_progress_unlocked || self.scheduled
    }
}
