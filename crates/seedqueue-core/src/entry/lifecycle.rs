//! Terminal transitions: load (claim) and discard.

use crate::domain::EntryError;
use crate::entry::Entry;

impl Entry {
    /// Claim this entry for the foreground.
    ///
    /// Sets `loaded`, releases the preview resource and resumes the worker,
    /// in that order, inside the sync domain. Must run on the render thread;
    /// affinity is checked before anything is mutated.
    ///
    /// # Errors
    /// - `IllegalState` if the entry was already discarded
    /// - `AffinityViolation` off the render thread
    pub fn load(&self) -> Result<(), EntryError> {
        let _domain = self.worker.sync_domain().enter();
        if self.is_discarded() {
            return Err(EntryError::illegal_state(format!(
                "tried to load \"{}\" but it has already been discarded",
                self.session
            )));
        }
        self.collaborators.render.ensure_current("load entry")?;

        self.flags.set_loaded();
        self.discard_preview_resource()?;
        self.unpause();

        tracing::info!(session = %self.session, worker = %self.worker_id(), "loaded entry");
        Ok(())
    }

    /// Discard this entry and everything attached to it, stopping the worker.
    ///
    /// Safe from any thread. Repeated calls only log a warning. Off the
    /// render thread, the preview resource is handed to the render thread
    /// for release.
    pub fn discard(&self) {
        let _domain = self.worker.sync_domain().enter();
        if !self.flags.set_discarded() {
            tracing::warn!(
                session = %self.session,
                "tried to discard entry but it has already been discarded"
            );
            return;
        }

        tracing::info!(session = %self.session, worker = %self.worker_id(), "discarding entry");

        self.release_preview_resource_anywhere();
        self.stop_worker();
        // release anything blocked on the pause state
        self.unpause();
    }

    fn stop_worker(&self) {
        let killed = self
            .collaborators
            .fast_kill
            .as_ref()
            .is_some_and(|fast_kill| fast_kill.try_kill(&self.worker));
        if killed {
            return;
        }
        if let Some(shutdown) = &self.collaborators.shutdown {
            shutdown.request_stop(&self.worker);
        }
        self.worker.instance().force_stop();
    }
}
