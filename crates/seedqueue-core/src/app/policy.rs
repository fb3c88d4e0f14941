//! Default pause policy: cap how many entries generate at once.

use std::sync::Arc;

use crate::entry::Entry;
use crate::ports::{PauseAction, PausePolicy};

/// Keeps at most `max_generating` entries generating.
///
/// - running entries with a pause reason get a scheduled pause
/// - over the cap: pause unlocked entries, newest first
/// - under the cap: resume paused entries with no pause reason left, locked
///   first, then oldest
///
/// Locked entries are never picked for pausing.
#[derive(Debug, Clone)]
pub struct ConcurrencyCapPolicy {
    max_generating: usize,
}

impl ConcurrencyCapPolicy {
    pub fn new(max_generating: usize) -> Self {
        Self { max_generating }
    }

    fn is_unpaused(entry: &Entry) -> bool {
        !entry.is_paused() && !entry.is_scheduled_to_pause()
    }

    /// Running with a pause reason, e.g. past the threshold while unlocked.
    fn is_due(entry: &Entry) -> bool {
        Self::is_unpaused(entry) && entry.should_pause()
    }

    fn is_generating(entry: &Entry) -> bool {
        Self::is_unpaused(entry) && !entry.is_ready() && !entry.should_pause()
    }

    fn is_resumable(entry: &Entry) -> bool {
        entry.is_paused() && entry.can_unpause()
    }
}

impl PausePolicy for ConcurrencyCapPolicy {
    fn plan(&self, entries: &[Arc<Entry>]) -> Vec<PauseAction> {
        let active: Vec<&Arc<Entry>> = entries
            .iter()
            .filter(|entry| !entry.is_loaded() && !entry.is_discarded())
            .collect();

        let mut actions: Vec<PauseAction> = active
            .iter()
            .filter(|entry| Self::is_due(entry))
            .map(|entry| PauseAction::SchedulePause(entry.worker_id()))
            .collect();

        let generating = active
            .iter()
            .filter(|entry| Self::is_generating(entry))
            .count();

        if generating > self.max_generating {
            // entries arrive oldest first
            actions.extend(
                active
                    .iter()
                    .rev()
                    .filter(|entry| Self::is_generating(entry) && !entry.is_locked())
                    .take(generating - self.max_generating)
                    .map(|entry| PauseAction::SchedulePause(entry.worker_id())),
            );
            return actions;
        }

        let mut resumable: Vec<&Arc<Entry>> = active
            .into_iter()
            .filter(|entry| Self::is_resumable(entry))
            .collect();
        resumable.sort_by_key(|entry| !entry.is_locked());
        actions.extend(
            resumable
                .into_iter()
                .take(self.max_generating - generating)
                .map(|entry| PauseAction::Unpause(entry.worker_id())),
        );
        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::fixtures::Fixture;
    use rstest::rstest;

    #[rstest]
    #[case::under_cap(1, 2, 0)]
    #[case::at_cap(2, 2, 0)]
    #[case::over_cap(4, 2, 2)]
    fn over_the_cap_schedules_pauses(
        #[case] queued: usize,
        #[case] cap: usize,
        #[case] expected_pauses: usize,
    ) {
        let fixture = Fixture::new();
        let entries: Vec<_> = (0..queued).map(|_| fixture.entry()).collect();

        let plan = ConcurrencyCapPolicy::new(cap).plan(&entries);

        let pauses = plan
            .iter()
            .filter(|action| matches!(action, PauseAction::SchedulePause(_)))
            .count();
        assert_eq!(pauses, expected_pauses);
    }

    #[test]
    fn newest_unlocked_entries_are_paused_first() {
        let fixture = Fixture::new();
        let entries: Vec<_> = (0..4).map(|_| fixture.entry()).collect();
        entries[3].lock();

        let plan = ConcurrencyCapPolicy::new(2).plan(&entries);

        assert_eq!(
            plan,
            vec![
                PauseAction::SchedulePause(entries[2].worker_id()),
                PauseAction::SchedulePause(entries[1].worker_id()),
            ]
        );
    }

    #[test]
    fn locked_entries_resume_before_older_ones() {
        let fixture = Fixture::new();
        let pairs: Vec<_> = (0..3).map(|_| fixture.entry_with_worker()).collect();
        for (entry, worker) in &pairs {
            entry.schedule_pause();
            assert!(worker.pause_at_safe_point());
        }
        pairs[2].0.lock();

        let entries: Vec<_> = pairs.iter().map(|(entry, _)| entry.clone()).collect();
        let plan = ConcurrencyCapPolicy::new(2).plan(&entries);

        assert_eq!(
            plan,
            vec![
                PauseAction::Unpause(entries[2].worker_id()),
                PauseAction::Unpause(entries[0].worker_id()),
            ]
        );
    }

    #[test]
    fn entries_past_the_threshold_stay_paused() {
        let fixture = Fixture::new();
        let (entry, worker) = fixture.entry_with_worker();
        entry.set_max_progress_reached();
        assert!(worker.pause_at_safe_point());

        let plan = ConcurrencyCapPolicy::new(2).plan(&[entry]);

        assert!(plan.is_empty());
    }

    #[test]
    fn entries_past_the_threshold_are_scheduled_and_not_counted() {
        let fixture = Fixture::new();
        let entries: Vec<_> = (0..3).map(|_| fixture.entry()).collect();
        entries[0].set_max_progress_reached();

        let plan = ConcurrencyCapPolicy::new(2).plan(&entries);

        assert_eq!(plan, vec![PauseAction::SchedulePause(entries[0].worker_id())]);
    }

    #[test]
    fn claimed_and_discarded_entries_are_ignored() {
        let fixture = Fixture::new();
        let entries: Vec<_> = (0..3).map(|_| fixture.entry()).collect();
        entries[0].load().unwrap();
        entries[1].discard();

        let plan = ConcurrencyCapPolicy::new(0).plan(&entries);

        assert_eq!(plan, vec![PauseAction::SchedulePause(entries[2].worker_id())]);
    }
}
