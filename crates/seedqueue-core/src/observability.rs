use serde::{Deserialize, Serialize};

use crate::domain::WorkerId;
use crate::entry::Entry;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueCounts {
    pub total: usize,
    pub locked: usize,
    pub generating: usize,
    pub scheduled: usize,
    pub paused: usize,
    pub ready: usize,
}

impl QueueCounts {
    pub fn record(&mut self, view: &EntryView) {
        self.total += 1;
        if view.locked {
            self.locked += 1;
        }
        if view.ready {
            self.ready += 1;
        }
        if view.paused {
            self.paused += 1;
        } else if view.scheduled {
            self.scheduled += 1;
        } else if !view.ready {
            self.generating += 1;
        }
    }
}

/// Read-only view of one entry, for status output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryView {
    pub worker: WorkerId,
    pub session: String,
    pub progress: i32,
    pub locked: bool,
    pub paused: bool,
    pub scheduled: bool,
    pub ready: bool,
    pub main_position: i32,
}

impl From<&Entry> for EntryView {
    fn from(entry: &Entry) -> Self {
        Self {
            worker: entry.worker_id(),
            session: entry.session().directory_name().to_string(),
            progress: entry.progress_percentage(),
            locked: entry.is_locked(),
            paused: entry.is_paused(),
            scheduled: entry.is_scheduled_to_pause(),
            ready: entry.is_ready(),
            main_position: entry.main_position(),
        }
    }
}
