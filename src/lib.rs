//! Task models for text summarization and image classification, a registry
//! that maps task names to ready models, and the action wrappers the front
//! end runs them through.

pub mod actions;
pub mod app;
pub mod config;
pub mod error;
pub mod history;
pub mod inference;
pub mod model;
pub mod registry;

pub use error::{ModelError, ModelResult};
pub use model::{ClassifierModel, InputKind, ModelIdentity, SummarizerModel, TaskModel};
pub use registry::ModelRegistry;
