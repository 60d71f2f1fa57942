// src/model/mod.rs

use crate::error::ModelResult;

pub mod classifier;
pub mod summarizer;

pub use classifier::ClassifierModel;
pub use summarizer::SummarizerModel;

/// Task label and model identifier, fixed when a model is constructed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelIdentity {
    task_label: String,
    model_id: String,
}

impl ModelIdentity {
    pub fn new(task_label: &str, model_id: &str) -> Self {
        Self {
            task_label: task_label.to_string(),
            model_id: model_id.to_string(),
        }
    }

    pub fn task_label(&self) -> &str {
        &self.task_label
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// Base info block shared by every task model.
    pub fn describe(&self) -> String {
        format!("Task: {}\nModel: {}\n", self.task_label, self.model_id)
    }
}

/// What a model expects to receive in [`TaskModel::process`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputKind {
    /// Free text.
    Text,
    /// Filesystem path to a raster image.
    ImagePath,
}

/// Common contract for every task model.
///
/// Callers hold a `&dyn TaskModel` and never need to know which variant
/// they are talking to.
pub trait TaskModel: Send + Sync {
    fn identity(&self) -> &ModelIdentity;

    fn input_kind(&self) -> InputKind;

    /// Runs the model on `input` and renders the result as text.
    fn process(&self, input: &str) -> ModelResult<String>;

    fn model_id(&self) -> &str {
        self.identity().model_id()
    }

    /// Multi-line description. Variants append their own lines to the base block.
    fn get_info(&self) -> String {
        self.identity().describe()
    }
}
