//! Pause/lock/unpause arbitration.

use crate::domain::PauseReasons;
use crate::entry::Entry;

impl Entry {
    /// The reasons currently making a pause desirable.
    pub fn pause_reasons(&self) -> PauseReasons {
        let instance = self.worker.instance();
        PauseReasons::derive(
            self.flags.snapshot(),
            instance.is_generation_finished(),
            instance.is_scheduled_to_pause(),
        )
    }

    /// True if the worker finished generating, or reached the max progress
    /// threshold while unlocked, or has a scheduled pause not yet consumed.
    ///
    /// Recomputed on every call.
    pub fn should_pause(&self) -> bool {
        self.pause_reasons().any()
    }

    pub fn is_paused(&self) -> bool {
        self.worker.instance().is_paused()
    }

    /// True if a pause was scheduled but the worker has not reached a safe
    /// point yet.
    pub fn is_scheduled_to_pause(&self) -> bool {
        self.worker.instance().is_scheduled_to_pause()
    }

    /// Ask the worker to pause at its next safe point.
    pub fn schedule_pause(&self) {
        self.worker.instance().schedule_pause();
    }

    /// True if the entry is neither paused nor scheduled to pause.
    pub fn can_pause(&self) -> bool {
        !self.is_scheduled_to_pause() && !self.is_paused()
    }

    /// Schedule a pause if nothing else already did, atomically.
    ///
    /// Claimed and discarded entries are never paused.
    pub fn try_to_schedule_pause(&self) -> bool {
        let _domain = self.worker.sync_domain().enter();
        if self.is_loaded() || self.is_discarded() || !self.can_pause() {
            return false;
        }
        self.schedule_pause();
        tracing::trace!(session = %self.session, "scheduled pause");
        true
    }

    /// Resume the worker. Does not check eligibility.
    pub fn unpause(&self) {
        self.worker.instance().unpause();
    }

    /// A pending pause can always be cancelled. A landed pause can be lifted
    /// once no pause reason remains, for example after the entry was locked
    /// past the threshold.
    pub fn can_unpause(&self) -> bool {
        self.is_scheduled_to_pause() || (self.is_paused() && !self.should_pause())
    }

    /// Unpause if allowed. Check and act happen inside the sync domain so a
    /// concurrent pause decision cannot interleave.
    pub fn try_to_unpause(&self) -> bool {
        let _domain = self.worker.sync_domain().enter();
        if self.can_unpause() {
            self.unpause();
            tracing::trace!(session = %self.session, "unpaused");
            return true;
        }
        false
    }

    /// Lock the entry, keeping it out of threshold pausing and mass resets.
    ///
    /// Returns true only for the call that locked it, which also pings the
    /// scheduler. Discarded entries cannot be locked.
    pub fn lock(&self) -> bool {
        let _domain = self.worker.sync_domain().enter();
        if self.is_discarded() || !self.flags.set_locked() {
            return false;
        }
        tracing::debug!(session = %self.session, "locked entry");
        self.collaborators.ping.ping();
        true
    }
}

#[cfg(test)]
mod tests {
    use crate::entry::fixtures::Fixture;

    #[test]
    fn lock_transitions_once_and_pings_once() {
        let fixture = Fixture::new();
        let entry = fixture.entry();

        assert!(entry.lock());
        assert!(!entry.lock());
        assert!(!entry.lock());

        assert!(entry.is_locked());
        assert_eq!(fixture.ping.count(), 1);
    }

    #[test]
    fn discarded_entry_cannot_be_locked() {
        let fixture = Fixture::new();
        let entry = fixture.entry();

        entry.discard();

        assert!(!entry.lock());
        assert!(!entry.is_locked());
        assert_eq!(fixture.ping.count(), 0);
    }

    #[test]
    fn threshold_pause_is_lifted_by_lock() {
        let fixture = Fixture::new();
        let (entry, worker) = fixture.entry_with_worker();
        assert!(!entry.should_pause());
        assert_eq!(entry.progress_percentage(), 0);

        entry.set_max_progress_reached();
        assert!(entry.should_pause());

        assert!(worker.pause_at_safe_point());
        assert!(entry.is_paused());
        assert!(!entry.can_unpause());
        assert!(!entry.try_to_unpause());
        assert!(entry.is_paused());

        assert!(entry.lock());
        assert_eq!(fixture.ping.count(), 1);

        assert!(!entry.should_pause());
        assert!(entry.can_unpause());
        assert!(entry.try_to_unpause());
        assert!(!entry.is_paused());
    }

    #[test]
    fn pending_pause_can_always_be_cancelled() {
        let fixture = Fixture::new();
        let entry = fixture.entry();

        entry.schedule_pause();
        assert!(entry.is_scheduled_to_pause());
        assert!(entry.should_pause());
        assert!(entry.can_unpause());

        assert!(entry.try_to_unpause());
        assert!(!entry.is_scheduled_to_pause());
        assert!(!entry.is_paused());
    }

    #[test]
    fn pending_pause_is_cancellable_even_past_threshold() {
        let fixture = Fixture::new();
        let entry = fixture.entry();

        entry.set_max_progress_reached();
        entry.schedule_pause();

        assert!(entry.should_pause());
        assert!(entry.can_unpause());
    }

    #[test]
    fn scheduled_pause_lands_at_safe_point_and_is_consumed() {
        let fixture = Fixture::new();
        let (entry, worker) = fixture.entry_with_worker();

        assert!(entry.can_pause());
        assert!(entry.try_to_schedule_pause());
        assert!(!entry.can_pause());
        assert!(!entry.try_to_schedule_pause());

        assert!(worker.pause_at_safe_point());
        assert!(entry.is_paused());
        assert!(!entry.is_scheduled_to_pause());

        // the scheduler's reason is consumed, so the scheduler may resume it
        assert!(!entry.should_pause());
        assert!(entry.try_to_unpause());
        assert!(!entry.is_paused());
    }

    #[test]
    fn try_to_unpause_without_reason_is_a_no_op() {
        let fixture = Fixture::new();
        let entry = fixture.entry();

        assert!(!entry.can_unpause());
        assert!(!entry.try_to_unpause());
        assert!(!entry.is_paused());
    }

    #[test]
    fn finished_generation_keeps_a_locked_entry_paused() {
        let fixture = Fixture::new();
        let (entry, worker) = fixture.entry_with_worker();
        entry.lock();

        while worker.advance() {}
        assert!(entry.pause_reasons().generation_finished);

        assert!(worker.pause_at_safe_point());
        assert!(!entry.can_unpause());
        assert!(!entry.try_to_unpause());
    }

    #[test]
    fn claimed_entries_are_not_scheduled() {
        let fixture = Fixture::new();
        let entry = fixture.entry();

        entry.load().unwrap();

        assert!(!entry.try_to_schedule_pause());
        assert!(!entry.is_scheduled_to_pause());
    }
}
