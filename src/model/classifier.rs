// src/model/classifier.rs

use std::path::Path;

use image::{ImageReader, RgbImage};
use tracing::debug;

use crate::error::{ModelError, ModelResult};
use crate::inference::{Backend, ClassifyImage, Prediction};
use crate::model::{InputKind, ModelIdentity, TaskModel};

pub const CLASSIFICATION_TASK: &str = "image-classification";
pub const DEFAULT_CLASSIFIER_MODEL: &str = "google/vit-base-patch16-224";

/// Number of ranked predictions shown to the user.
pub const TOP_K: usize = 3;

pub struct ClassifierModel {
    identity: ModelIdentity,
    pipeline: Box<dyn ClassifyImage>,
}

impl ClassifierModel {
    pub fn new(backend: &dyn Backend, model_id: &str) -> ModelResult<Self> {
        let pipeline = backend.load_classifier(model_id)?;
        debug!(model_id, backend = backend.name(), "classifier loaded");
        Ok(Self::with_capability(model_id, pipeline))
    }

    pub fn with_default_model(backend: &dyn Backend) -> ModelResult<Self> {
        Self::new(backend, DEFAULT_CLASSIFIER_MODEL)
    }

    pub fn with_capability(model_id: &str, pipeline: Box<dyn ClassifyImage>) -> Self {
        Self {
            identity: ModelIdentity::new(CLASSIFICATION_TASK, model_id),
            pipeline,
        }
    }
}

impl TaskModel for ClassifierModel {
    fn identity(&self) -> &ModelIdentity {
        &self.identity
    }

    fn input_kind(&self) -> InputKind {
        InputKind::ImagePath
    }

    fn process(&self, input: &str) -> ModelResult<String> {
        let path = Path::new(input);
        if !path.is_file() {
            return Err(ModelError::InputNotFound {
                path: path.to_path_buf(),
            });
        }

        let image = load_rgb(path)?;
        let predictions = self.pipeline.classify(&image)?;
        Ok(render_top_predictions(predictions, TOP_K))
    }

    fn get_info(&self) -> String {
        let mut info = self.identity.describe();
        info.push_str(
            "Category: CV (Vision)\n\
             Description: Predicts classes for an input image.\n\
             Input: Image file path\n\
             Output: Top predictions with scores\n",
        );
        info
    }
}

/// Decodes by content rather than extension and normalizes to 8-bit RGB.
///
/// Failing to open the file is `InputNotFound`; anything the decoder rejects,
/// including a file that ends early, is `InvalidImage`.
fn load_rgb(path: &Path) -> ModelResult<RgbImage> {
    let reader = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|_| ModelError::InputNotFound {
            path: path.to_path_buf(),
        })?;

    let image = reader.decode().map_err(|source| ModelError::InvalidImage {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(image.to_rgb8())
}

/// Renders at most `k` predictions, best first, as `"<rank>. <label> (<score>)"` lines.
///
/// Fewer predictions than `k` are rendered as-is.
pub fn render_top_predictions(mut predictions: Vec<Prediction>, k: usize) -> String {
    predictions.sort_by(|a, b| b.score.total_cmp(&a.score));
    predictions
        .iter()
        .take(k)
        .enumerate()
        .map(|(i, p)| format!("{}. {} ({:.3})", i + 1, p.label, p.score))
        .collect::<Vec<_>>()
        .join("\n")
}
