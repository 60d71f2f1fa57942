// src/inference/fake.rs

use image::RgbImage;

use crate::error::{ModelError, ModelResult};
use crate::inference::{Backend, ClassifyImage, GenerationBounds, Prediction, Summarize};
use crate::model::classifier::{CLASSIFICATION_TASK, DEFAULT_CLASSIFIER_MODEL};
use crate::model::summarizer::{DEFAULT_SUMMARIZER_MODEL, SUMMARIZATION_TASK};

/// Deterministic, offline capabilities. Useful for dry runs and tests.
pub struct FakeBackend {
    known_models: Vec<String>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            known_models: vec![
                DEFAULT_SUMMARIZER_MODEL.to_string(),
                DEFAULT_CLASSIFIER_MODEL.to_string(),
            ],
        }
    }

    pub fn with_model(mut self, model_id: &str) -> Self {
        self.known_models.push(model_id.to_string());
        self
    }

    fn check_known(&self, task: &str, model_id: &str) -> ModelResult<()> {
        if self.known_models.iter().any(|m| m == model_id) {
            Ok(())
        } else {
            Err(ModelError::initialization(task, model_id, "unknown model identifier"))
        }
    }
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for FakeBackend {
    fn name(&self) -> &str {
        "fake"
    }

    fn load_summarizer(&self, model_id: &str) -> ModelResult<Box<dyn Summarize>> {
        self.check_known(SUMMARIZATION_TASK, model_id)?;
        Ok(Box::new(LeadSummarizer))
    }

    fn load_classifier(&self, model_id: &str) -> ModelResult<Box<dyn ClassifyImage>> {
        self.check_known(CLASSIFICATION_TASK, model_id)?;
        Ok(Box::new(ChannelClassifier))
    }
}

/// Keeps the leading words of the text, up to `max_length` of them.
pub struct LeadSummarizer;

impl Summarize for LeadSummarizer {
    fn summarize(&self, text: &str, bounds: &GenerationBounds) -> ModelResult<Vec<String>> {
        let lead = text
            .split_whitespace()
            .take(bounds.max_length)
            .collect::<Vec<_>>()
            .join(" ");
        Ok(vec![lead])
    }
}

/// Ranks `red`, `green` and `blue` by mean channel intensity.
pub struct ChannelClassifier;

impl ClassifyImage for ChannelClassifier {
    fn classify(&self, image: &RgbImage) -> ModelResult<Vec<Prediction>> {
        let mut sums = [0u64; 3];
        for pixel in image.pixels() {
            for (sum, value) in sums.iter_mut().zip(pixel.0) {
                *sum += u64::from(value);
            }
        }

        let total: u64 = sums.iter().sum();
        let mut predictions = ["red", "green", "blue"]
            .iter()
            .zip(sums)
            .map(|(label, sum)| {
                let score = if total == 0 {
                    1.0 / 3.0
                } else {
                    sum as f32 / total as f32
                };
                Prediction::new(label, score)
            })
            .collect::<Vec<_>>();
        predictions.sort_by(|a, b| b.score.total_cmp(&a.score));
        Ok(predictions)
    }
}
