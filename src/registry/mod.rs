// src/registry/mod.rs

use tracing::{info, warn};

use crate::config::Config;
use crate::error::ModelError;
use crate::inference::Backend;
use crate::model::{ClassifierModel, SummarizerModel, TaskModel};

pub const TEXT_SUMMARIZATION: &str = "Text Summarization";
pub const IMAGE_CLASSIFICATION: &str = "Image Classification";

/// Ordered mapping from user-visible task name to a ready model.
#[derive(Default)]
pub struct ModelRegistry {
    entries: Vec<(String, Box<dyn TaskModel>)>,
    failures: Vec<(String, ModelError)>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the built-in tasks. A task whose model cannot be initialized is
    /// left out and recorded in [`ModelRegistry::failures`].
    pub fn load(backend: &dyn Backend, config: &Config) -> Self {
        let mut registry = Self::new();

        match SummarizerModel::new(backend, &config.summarizer_model) {
            Ok(model) => registry = registry.register(TEXT_SUMMARIZATION, model),
            Err(e) => registry.record_failure(TEXT_SUMMARIZATION, e),
        }

        match ClassifierModel::new(backend, &config.classifier_model) {
            Ok(model) => registry = registry.register(IMAGE_CLASSIFICATION, model),
            Err(e) => registry.record_failure(IMAGE_CLASSIFICATION, e),
        }

        info!(
            backend = backend.name(),
            tasks = registry.len(),
            failed = registry.failures.len(),
            "model registry ready"
        );
        registry
    }

    /// Binds `task_name` to `model`. Re-registering a name replaces its model in place.
    pub fn register<M: TaskModel + 'static>(mut self, task_name: &str, model: M) -> Self {
        let model: Box<dyn TaskModel> = Box::new(model);
        match self.entries.iter_mut().find(|(name, _)| name == task_name) {
            Some(entry) => entry.1 = model,
            None => self.entries.push((task_name.to_string(), model)),
        }
        self
    }

    pub fn lookup(&self, task_name: &str) -> Option<&dyn TaskModel> {
        self.entries
            .iter()
            .find(|(name, _)| name == task_name)
            .map(|(_, model)| model.as_ref())
    }

    pub fn task_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Tasks that failed to load, with the reason.
    pub fn failures(&self) -> &[(String, ModelError)] {
        &self.failures
    }

    fn record_failure(&mut self, task_name: &str, error: ModelError) {
        warn!(task = task_name, error = %error, "task unavailable");
        self.failures.push((task_name.to_string(), error));
    }
}
