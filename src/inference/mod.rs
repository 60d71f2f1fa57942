// src/inference/mod.rs

//! Inference capabilities the task models wrap.
//!
//! A capability is addressed by a model identifier and treated as a black box:
//! text in, summaries out, or an RGB image in, scored labels out.

use image::RgbImage;

use crate::error::ModelResult;

pub mod fake;
pub mod http;

pub use fake::FakeBackend;
pub use http::HttpBackend;

/// Output length window and decoding mode for summarization.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GenerationBounds {
    pub min_length: usize,
    pub max_length: usize,
    pub do_sample: bool,
}

impl Default for GenerationBounds {
    fn default() -> Self {
        Self {
            min_length: 25,
            max_length: 80,
            do_sample: false,
        }
    }
}

/// One scored label from an image classifier.
#[derive(Clone, Debug, PartialEq)]
pub struct Prediction {
    pub label: String,
    pub score: f32,
}

impl Prediction {
    pub fn new(label: &str, score: f32) -> Self {
        Self {
            label: label.to_string(),
            score,
        }
    }
}

pub trait Summarize: Send + Sync {
    /// Returns one or more candidate summaries; callers use the first.
    fn summarize(&self, text: &str, bounds: &GenerationBounds) -> ModelResult<Vec<String>>;
}

pub trait ClassifyImage: Send + Sync {
    fn classify(&self, image: &RgbImage) -> ModelResult<Vec<Prediction>>;
}

/// Acquires capabilities by model identifier.
pub trait Backend {
    fn name(&self) -> &str;

    fn load_summarizer(&self, model_id: &str) -> ModelResult<Box<dyn Summarize>>;

    fn load_classifier(&self, model_id: &str) -> ModelResult<Box<dyn ClassifyImage>>;
}
