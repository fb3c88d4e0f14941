//! PresentationContext port - the active foreground presentation settings.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::ModelPart;

/// Foreground settings a claimed entry's snapshot is applied to.
pub trait PresentationContext {
    fn apply_options(&mut self, options: &BTreeMap<String, String>);

    fn set_model_parts(&mut self, parts: &BTreeSet<ModelPart>);

    fn set_perspective(&mut self, perspective: i32);
}
