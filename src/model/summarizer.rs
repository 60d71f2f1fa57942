// src/model/summarizer.rs

use tracing::debug;

use crate::error::{ModelError, ModelResult};
use crate::inference::{Backend, GenerationBounds, Summarize};
use crate::model::{InputKind, ModelIdentity, TaskModel};

pub const SUMMARIZATION_TASK: &str = "summarization";
pub const DEFAULT_SUMMARIZER_MODEL: &str = "sshleifer/distilbart-cnn-12-6";

pub struct SummarizerModel {
    identity: ModelIdentity,
    bounds: GenerationBounds,
    pipeline: Box<dyn Summarize>,
}

impl SummarizerModel {
    /// Acquires a summarization capability for `model_id` from `backend`.
    pub fn new(backend: &dyn Backend, model_id: &str) -> ModelResult<Self> {
        let pipeline = backend.load_summarizer(model_id)?;
        debug!(model_id, backend = backend.name(), "summarizer loaded");
        Ok(Self::with_capability(model_id, pipeline))
    }

    pub fn with_default_model(backend: &dyn Backend) -> ModelResult<Self> {
        Self::new(backend, DEFAULT_SUMMARIZER_MODEL)
    }

    pub fn with_capability(model_id: &str, pipeline: Box<dyn Summarize>) -> Self {
        Self {
            identity: ModelIdentity::new(SUMMARIZATION_TASK, model_id),
            bounds: GenerationBounds::default(),
            pipeline,
        }
    }
}

impl TaskModel for SummarizerModel {
    fn identity(&self) -> &ModelIdentity {
        &self.identity
    }

    fn input_kind(&self) -> InputKind {
        InputKind::Text
    }

    fn process(&self, input: &str) -> ModelResult<String> {
        if input.trim().is_empty() {
            return Err(ModelError::InvalidInput(
                "Expected non-empty text for summarization.".into(),
            ));
        }

        let summaries = self.pipeline.summarize(input, &self.bounds)?;
        summaries
            .into_iter()
            .next()
            .ok_or_else(|| ModelError::Inference("summarizer returned no summary".into()))
    }

    fn get_info(&self) -> String {
        let mut info = self.identity.describe();
        info.push_str(
            "Category: NLP (Text)\n\
             Description: Summarizes long text into concise form.\n\
             Input: Plain text\n\
             Output: Summary text\n",
        );
        info
    }
}
