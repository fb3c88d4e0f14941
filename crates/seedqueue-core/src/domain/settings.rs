//! Preview metadata and the settings snapshot applied when an entry is claimed.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::ports::PresentationContext;

/// Visible parts of a player model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelPart {
    Cape,
    Jacket,
    LeftSleeve,
    RightSleeve,
    LeftPantsLeg,
    RightPantsLeg,
    Hat,
}

impl ModelPart {
    pub const ALL: [ModelPart; 7] = [
        ModelPart::Cape,
        ModelPart::Jacket,
        ModelPart::LeftSleeve,
        ModelPart::RightSleeve,
        ModelPart::LeftPantsLeg,
        ModelPart::RightPantsLeg,
        ModelPart::Hat,
    ];
}

/// The player as shown in the preview.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewPlayer {
    pub model_parts: BTreeSet<ModelPart>,
}

/// Metadata captured once the worker has something to preview.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewProperties {
    /// Camera perspective used by the preview (0 = first person).
    pub perspective: i32,
    pub player: PreviewPlayer,
}

impl PreviewProperties {
    pub fn new(perspective: i32, player: PreviewPlayer) -> Self {
        Self {
            perspective,
            player,
        }
    }
}

/// Immutable capture of consumer-facing presentation settings.
///
/// Player model parts are filled in from the preview metadata when the
/// snapshot is attached to an entry, so the claimed world shows the same
/// player the preview did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsSnapshot {
    options: BTreeMap<String, String>,
    model_parts: Option<BTreeSet<ModelPart>>,
}

impl SettingsSnapshot {
    pub fn new(options: BTreeMap<String, String>) -> Self {
        Self {
            options,
            model_parts: None,
        }
    }

    pub fn options(&self) -> &BTreeMap<String, String> {
        &self.options
    }

    pub fn model_parts(&self) -> Option<&BTreeSet<ModelPart>> {
        self.model_parts.as_ref()
    }

    /// Pre-load the per-player visual state referenced by the preview.
    pub fn load_player_model_parts(&mut self, player: &PreviewPlayer) {
        self.model_parts = Some(player.model_parts.clone());
    }

    /// Apply the captured options (and model parts, when loaded) to `ctx`.
    pub fn apply(&self, ctx: &mut dyn PresentationContext) {
        ctx.apply_options(&self.options);
        if let Some(parts) = &self.model_parts {
            ctx.set_model_parts(parts);
        }
    }
}
