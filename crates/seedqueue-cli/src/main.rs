use std::collections::BTreeMap;
use std::sync::Arc;
use std::thread::JoinHandle;

use tokio::time::{Duration, Instant, sleep};
use tracing_subscriber::EnvFilter;

use seedqueue_core::domain::{ModelPart, PreviewPlayer, PreviewProperties, SettingsSnapshot};
use seedqueue_core::impls::{GracefulShutdown, RecordingPresentation, Workload};
use seedqueue_core::{Entry, QueueBuilder, QueueConfig, RenderThread, SeedQueue, SeedQueueError};

const CLAIMS: usize = 2;
const STEP_DELAY: Duration = Duration::from_millis(5);
const FRAME: Duration = Duration::from_millis(100);
const DEADLINE: Duration = Duration::from_secs(30);

fn load_config() -> Result<QueueConfig, SeedQueueError> {
    match std::env::args().nth(1) {
        Some(path) => {
            tracing::info!(%path, "loading queue configuration");
            Ok(QueueConfig::load(path)?)
        }
        None => Ok(QueueConfig::default()),
    }
}

/// Preview metadata and settings, as the foreground would capture them once
/// a world has something to show.
fn attach_preview(entry: &Entry) {
    if entry.has_world_preview() {
        return;
    }
    let player = PreviewPlayer {
        model_parts: ModelPart::ALL.into_iter().collect(),
    };
    let options = BTreeMap::from([
        ("fov".to_string(), "70".to_string()),
        ("renderDistance".to_string(), "12".to_string()),
    ]);
    let attached = entry
        .set_preview_properties(PreviewProperties::new(0, player))
        .and_then(|()| entry.set_settings_snapshot(SettingsSnapshot::new(options)));
    if let Err(err) = attached {
        tracing::warn!(session = %entry.session(), %err, "could not attach preview");
    }
}

/// One foreground frame: draw previews, lock promising entries, claim one.
fn frame(queue: &SeedQueue) -> Result<Option<Arc<Entry>>, SeedQueueError> {
    for entry in queue.entries() {
        let progress = entry.progress_percentage();
        if progress > 0 {
            attach_preview(&entry);
            entry.with_preview_resource(|preview| preview.render_progress(progress))?;
        }
        // the first world past the halfway mark is the one we want to keep
        if progress >= 50 && queue.counts().locked == 0 {
            entry.lock();
        }
    }
    queue.render().drain_pending_releases()?;
    queue.claim()
}

#[tokio::main]
async fn main() -> Result<(), SeedQueueError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = load_config()?;
    let app = QueueBuilder::new(config)
        .render_thread(RenderThread::bind_current())
        .shutdown(Arc::new(GracefulShutdown))
        .build()?;
    let queue = Arc::clone(&app.queue);

    let mut workers: Vec<JoinHandle<()>> = Vec::new();
    for _ in 0..queue.capacity() {
        let workload = Workload::randomized(queue.config().max_progress_percentage, STEP_DELAY);
        let (_, join) = queue.spawn_simulated(workload)?;
        workers.push(join);
    }
    let scheduler = app.spawn_scheduler();

    let started = Instant::now();
    let mut claimed = Vec::new();
    while claimed.len() < CLAIMS && started.elapsed() < DEADLINE {
        if let Some(entry) = frame(&queue)? {
            let mut presentation = RecordingPresentation::default();
            entry.load_settings_snapshot(&mut presentation);
            println!(
                "claimed {} (perspective={:?}, options={:?})",
                entry.session(),
                presentation.perspective,
                presentation.options
            );
            claimed.push(entry);
        }
        match serde_json::to_string(&queue.counts()) {
            Ok(status) => println!("status: {status}"),
            Err(err) => tracing::warn!(%err, "failed to encode status"),
        }
        sleep(FRAME).await;
    }

    let reset = queue.reset_unlocked();
    let discarded = queue.discard_all();
    tracing::info!(reset, discarded, claimed = claimed.len(), "queue drained");
    queue.render().drain_pending_releases()?;

    scheduler.shutdown_and_join().await;
    drop(claimed);
    for worker in workers {
        if worker.join().is_err() {
            tracing::error!("worker thread panicked");
        }
    }
    Ok(())
}
