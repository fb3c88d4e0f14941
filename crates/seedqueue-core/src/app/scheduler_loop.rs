//! SchedulerLoop - re-plans pauses on every ping and every poll tick.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Notify, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::app::queue::SeedQueue;
use crate::ports::{PauseAction, PausePolicy, SchedulerPing};

/// [`SchedulerPing`] backed by a tokio `Notify`.
///
/// A ping sent while no pass is waiting is remembered, so a lock that lands
/// during a pass still triggers the next one.
#[derive(Debug, Default)]
pub struct NotifyPing {
    notify: Notify,
}

impl NotifyPing {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn notified(&self) {
        self.notify.notified().await;
    }
}

impl SchedulerPing for NotifyPing {
    fn ping(&self) {
        self.notify.notify_one();
    }
}

/// Run the policy once and apply its plan. Returns the number of actions that
/// took effect.
pub fn run_pass(queue: &SeedQueue, policy: &dyn PausePolicy) -> usize {
    let entries = queue.entries();
    let mut applied = 0;
    for action in policy.plan(&entries) {
        let (worker, effective) = match action {
            PauseAction::SchedulePause(worker) => (
                worker,
                entries
                    .iter()
                    .find(|entry| entry.worker_id() == worker)
                    .is_some_and(|entry| entry.try_to_schedule_pause()),
            ),
            PauseAction::Unpause(worker) => (
                worker,
                entries
                    .iter()
                    .find(|entry| entry.worker_id() == worker)
                    .is_some_and(|entry| entry.try_to_unpause()),
            ),
        };
        if effective {
            applied += 1;
        } else {
            tracing::trace!(%worker, ?action, "stale scheduler action skipped");
        }
    }
    applied
}

/// Scheduler task handle.
/// - `request_shutdown()` stops the loop after the current pass
/// - `shutdown_and_join()` also waits for it
pub struct SchedulerHandle {
    shutdown_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl SchedulerHandle {
    pub fn request_shutdown(&self) {
        // ignore send error: the loop may already be gone
        let _ = self.shutdown_tx.send(true);
    }

    pub async fn shutdown_and_join(self) {
        self.request_shutdown();
        let _ = self.join.await;
    }
}

pub struct SchedulerLoop;

impl SchedulerLoop {
    pub fn spawn(
        queue: Arc<SeedQueue>,
        policy: Arc<dyn PausePolicy>,
        ping: Arc<NotifyPing>,
        poll_interval: Duration,
    ) -> SchedulerHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let join = tokio::spawn(async move {
            scheduler_loop(queue, policy, ping, poll_interval, &mut shutdown_rx).await;
        });
        SchedulerHandle { shutdown_tx, join }
    }
}

async fn scheduler_loop(
    queue: Arc<SeedQueue>,
    policy: Arc<dyn PausePolicy>,
    ping: Arc<NotifyPing>,
    poll_interval: Duration,
    shutdown_rx: &mut watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tracing::debug!(?poll_interval, "scheduler started");

    loop {
        if *shutdown_rx.borrow() {
            break;
        }

        tokio::select! {
            changed = shutdown_rx.changed() => {
                if changed.is_err() {
                    // handle dropped without a shutdown request
                    break;
                }
                continue;
            }
            _ = ping.notified() => {}
            _ = ticker.tick() => {}
        }

        let applied = run_pass(&queue, policy.as_ref());
        if applied > 0 {
            tracing::debug!(applied, "scheduler pass applied actions");
        }
    }
    tracing::debug!("scheduler stopped");
}
