// src/error.rs

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by task models, their inference capabilities and the registry.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The named inference capability could not be acquired.
    #[error("failed to initialize {task} model '{model_id}': {reason}")]
    Initialization {
        task: String,
        model_id: String,
        reason: String,
    },

    #[error("{0}")]
    InvalidInput(String),

    #[error("input file not found or unreadable: {}", path.display())]
    InputNotFound { path: PathBuf },

    #[error("failed to decode image {}", path.display())]
    InvalidImage {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Unspecified failure reported by the wrapped capability.
    #[error("inference failed: {0}")]
    Inference(String),

    #[error("inference request failed")]
    Http(#[from] reqwest::Error),

    #[error("unknown task: {0}")]
    UnknownTask(String),
}

impl ModelError {
    pub fn initialization(task: &str, model_id: &str, reason: impl Into<String>) -> Self {
        ModelError::Initialization {
            task: task.to_string(),
            model_id: model_id.to_string(),
            reason: reason.into(),
        }
    }
}

pub type ModelResult<T> = Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialization_message_names_task_and_model() {
        let err = ModelError::initialization("summarization", "nope/missing", "model not found");
        assert_eq!(
            err.to_string(),
            "failed to initialize summarization model 'nope/missing': model not found"
        );
    }

    #[test]
    fn input_not_found_shows_path() {
        let err = ModelError::InputNotFound {
            path: PathBuf::from("/tmp/missing.png"),
        };
        assert!(err.to_string().ends_with("/tmp/missing.png"));
    }
}
