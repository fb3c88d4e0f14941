//! Preview resource lifecycle, preview metadata and the settings snapshot.

use std::sync::atomic::Ordering;

use crate::domain::{EntryError, PreviewProperties, SettingsSnapshot};
use crate::entry::Entry;
use crate::ports::{PresentationContext, PreviewResource};

impl Entry {
    /// Run `f` against the preview resource, creating it on first use.
    ///
    /// # Errors
    /// - `AffinityViolation` off the render thread (nothing is created)
    /// - `IllegalState` once the entry is loaded or discarded
    pub fn with_preview_resource<R>(
        &self,
        f: impl FnOnce(&mut dyn PreviewResource) -> R,
    ) -> Result<R, EntryError> {
        self.collaborators
            .render
            .ensure_current("get preview resource")?;
        // flags are checked under the slot lock: load and discard set their
        // flag before taking the slot, so they always see what is created here
        let mut slot = self.preview_resource.lock();
        if self.is_discarded() || self.is_loaded() {
            return Err(EntryError::illegal_state(format!(
                "tried to get the preview resource of \"{}\" after it was loaded or discarded",
                self.session
            )));
        }
        let resource = slot.get_or_insert_with(|| {
            tracing::trace!(session = %self.session, "creating preview resource");
            let resource = self.collaborators.preview_backend.create();
            self.preview_live.store(true, Ordering::Release);
            resource
        });
        Ok(f(&mut **resource))
    }

    /// Non-blocking existence check, valid from any thread.
    pub fn has_preview_resource(&self) -> bool {
        self.preview_live.load(Ordering::Acquire)
    }

    /// Release the preview resource, if any. Returns whether one was released.
    ///
    /// # Errors
    /// `AffinityViolation` off the render thread.
    pub fn discard_preview_resource(&self) -> Result<bool, EntryError> {
        self.collaborators
            .render
            .ensure_current("discard preview resource")?;
        Ok(match self.take_preview_resource() {
            Some(resource) => {
                resource.release();
                tracing::trace!(session = %self.session, "released preview resource");
                true
            }
            None => false,
        })
    }

    /// Release from any thread. Off the render thread the resource is handed
    /// to the render thread's release queue instead of being freed here.
    pub(crate) fn release_preview_resource_anywhere(&self) {
        let Some(resource) = self.take_preview_resource() else {
            return;
        };
        let render = &self.collaborators.render;
        if render.is_current() {
            resource.release();
        } else {
            tracing::debug!(
                session = %self.session,
                "deferring preview resource release to the render thread"
            );
            render.defer_release(resource);
        }
    }

    fn take_preview_resource(&self) -> Option<Box<dyn PreviewResource>> {
        let mut slot = self.preview_resource.lock();
        let resource = slot.take();
        self.preview_live.store(false, Ordering::Release);
        resource
    }

    /// True if there is preview metadata or a live preview resource.
    pub fn has_world_preview(&self) -> bool {
        self.preview_properties.read().is_some() || self.has_preview_resource()
    }

    pub fn preview_properties(&self) -> Option<PreviewProperties> {
        self.preview_properties.read().clone()
    }

    pub fn set_preview_properties(&self, properties: PreviewProperties) -> Result<(), EntryError> {
        if self.is_discarded() {
            return Err(EntryError::illegal_state(format!(
                "tried to set preview properties of \"{}\" but it has already been discarded",
                self.session
            )));
        }
        *self.preview_properties.write() = Some(properties);
        Ok(())
    }

    /// Attach the settings snapshot loaded when this entry is claimed.
    ///
    /// Pre-loads the previewed player's model parts into the snapshot and
    /// derives `perspective` from the preview metadata right away.
    ///
    /// # Errors
    /// `IllegalState` when no preview metadata exists yet or the entry is
    /// discarded. The entry is left untouched.
    pub fn set_settings_snapshot(&self, mut snapshot: SettingsSnapshot) -> Result<(), EntryError> {
        if self.is_discarded() {
            return Err(EntryError::illegal_state(format!(
                "tried to set the settings snapshot of \"{}\" but it has already been discarded",
                self.session
            )));
        }
        let properties = self.preview_properties.read();
        let Some(properties) = properties.as_ref() else {
            return Err(EntryError::illegal_state(
                "tried to set the settings snapshot but preview properties are missing",
            ));
        };

        snapshot.load_player_model_parts(&properties.player);
        *self.settings_snapshot.lock() = Some(snapshot);
        self.perspective
            .store(properties.perspective, Ordering::Release);
        Ok(())
    }

    pub fn settings_snapshot(&self) -> Option<SettingsSnapshot> {
        self.settings_snapshot.lock().clone()
    }

    /// The perspective used by this entry's preview.
    pub fn perspective(&self) -> i32 {
        self.perspective.load(Ordering::Acquire)
    }

    /// Apply the snapshot and perspective to `ctx`.
    ///
    /// Returns false, without touching `ctx`, when there is no snapshot.
    pub fn load_settings_snapshot(&self, ctx: &mut dyn PresentationContext) -> bool {
        let snapshot = self.settings_snapshot.lock();
        let Some(snapshot) = snapshot.as_ref() else {
            return false;
        };
        snapshot.apply(ctx);
        ctx.set_perspective(self.perspective());
        true
    }
}
