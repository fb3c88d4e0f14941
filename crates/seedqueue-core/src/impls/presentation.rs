//! RecordingPresentation - a presentation context that remembers what was applied.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::ModelPart;
use crate::ports::PresentationContext;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingPresentation {
    pub options: BTreeMap<String, String>,
    pub model_parts: Option<BTreeSet<ModelPart>>,
    pub perspective: Option<i32>,
}

impl PresentationContext for RecordingPresentation {
    fn apply_options(&mut self, options: &BTreeMap<String, String>) {
        self.options
            .extend(options.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    fn set_model_parts(&mut self, parts: &BTreeSet<ModelPart>) {
        self.model_parts = Some(parts.clone());
    }

    fn set_perspective(&mut self, perspective: i32) {
        self.perspective = Some(perspective);
    }
}
