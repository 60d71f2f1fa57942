// src/app/mod.rs

use tracing::debug;

use crate::actions::{self, ActionLog, ConsoleNotifier, Notifier, TracingLog};
use crate::error::{ModelError, ModelResult};
use crate::history::History;
use crate::model::{InputKind, TaskModel};
use crate::registry::ModelRegistry;

pub mod shell;

pub const RUN_ACTION: &str = "Run Selected Task";

/// The user-facing session: task selection, running, and a record of what ran.
pub struct App {
    registry: ModelRegistry,
    history: History,
    selected: Option<String>,
    notifier: Option<Box<dyn Notifier>>,
    log: Box<dyn ActionLog>,
}

impl App {
    /// Starts with the first registered task selected.
    pub fn new(registry: ModelRegistry) -> Self {
        let selected = registry.task_names().next().map(str::to_string);
        Self {
            registry,
            history: History::new(),
            selected,
            notifier: Some(Box::new(ConsoleNotifier)),
            log: Box::new(TracingLog),
        }
    }

    /// `None` routes error reports to the log only.
    pub fn with_notifier(mut self, notifier: Option<Box<dyn Notifier>>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn tasks(&self) -> impl Iterator<Item = &str> {
        self.registry.task_names()
    }

    pub fn selected_task(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected_model(&self) -> Option<&dyn TaskModel> {
        self.selected
            .as_deref()
            .and_then(|task| self.registry.lookup(task))
    }

    /// Switches to `task` and returns its model info.
    pub fn select(&mut self, task: &str) -> ModelResult<String> {
        let model = self
            .registry
            .lookup(task)
            .ok_or_else(|| ModelError::UnknownTask(task.to_string()))?;
        let info = model.get_info();
        debug!(task, model_id = model.model_id(), "task selected");
        self.selected = Some(task.to_string());
        Ok(info)
    }

    pub fn selected_info(&self) -> Option<String> {
        self.selected_model().map(|model| model.get_info())
    }

    /// Runs the selected task on `input`. Failures are reported through the
    /// notifier and yield `None`.
    pub fn run(&mut self, input: &str) -> Option<String> {
        let registry = &self.registry;
        let selected = self.selected.as_deref();

        let outcome = actions::run_action(
            RUN_ACTION,
            self.log.as_ref(),
            self.notifier.as_deref(),
            || {
                let task = selected.ok_or_else(|| ModelError::UnknownTask("(none)".into()))?;
                let model = registry
                    .lookup(task)
                    .ok_or_else(|| ModelError::UnknownTask(task.to_string()))?;
                render(model, input)
            },
        );

        let (output, entry) = outcome?;
        self.history.push(entry);
        Some(output)
    }

    pub fn history(&self) -> &[String] {
        self.history.entries()
    }
}

fn render(model: &dyn TaskModel, input: &str) -> ModelResult<(String, &'static str)> {
    match model.input_kind() {
        InputKind::Text => {
            let summary = model.process(input.trim())?;
            Ok((format!("[Summary]\n{summary}"), "Ran text summarization."))
        }
        InputKind::ImagePath => {
            let path = input.trim();
            if path.is_empty() {
                return Err(ModelError::InvalidInput(
                    "Please choose a valid image file.".into(),
                ));
            }
            let top = model.process(path)?;
            Ok((format!("[Image Top-3]\n{top}"), "Ran image classification."))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::actions::NotifyError;
    use crate::config::Config;
    use crate::inference::FakeBackend;
    use crate::registry::{IMAGE_CLASSIFICATION, TEXT_SUMMARIZATION};

    fn app() -> App {
        App::new(ModelRegistry::load(&FakeBackend::new(), &Config::default())).with_notifier(None)
    }

    #[test]
    fn first_task_selected_by_default() {
        let app = app();
        assert_eq!(app.selected_task(), Some(TEXT_SUMMARIZATION));
        assert!(app.selected_info().unwrap().contains("Category: NLP (Text)"));
    }

    #[test]
    fn select_unknown_task_keeps_selection() {
        let mut app = app();
        assert!(matches!(
            app.select("Speech"),
            Err(ModelError::UnknownTask(_))
        ));
        assert_eq!(app.selected_task(), Some(TEXT_SUMMARIZATION));
    }

    #[test]
    fn run_summary_records_history() {
        let mut app = app();
        let out = app.run("  The quick brown fox jumps over the lazy dog.  ").unwrap();
        assert_eq!(out, "[Summary]\nThe quick brown fox jumps over the lazy dog.");
        assert_eq!(app.history(), ["Ran text summarization."]);
    }

    #[test]
    fn failed_run_leaves_history_untouched() {
        let mut app = app();
        assert_eq!(app.run("   "), None);
        app.select(IMAGE_CLASSIFICATION).unwrap();
        assert_eq!(app.run(""), None);
        assert_eq!(app.run("/no/such/image.png"), None);
        assert!(app.history().is_empty());
    }

    #[derive(Clone, Default)]
    struct SharedNotifier(Rc<RefCell<Vec<String>>>);

    impl Notifier for SharedNotifier {
        fn notify_error(&self, _title: &str, message: &str) -> Result<(), NotifyError> {
            self.0.borrow_mut().push(message.to_string());
            Ok(())
        }
    }

    #[test]
    fn blank_image_path_asks_for_a_file() {
        let notifier = SharedNotifier::default();
        let mut app = App::new(ModelRegistry::load(&FakeBackend::new(), &Config::default()))
            .with_notifier(Some(Box::new(notifier.clone())));
        app.select(IMAGE_CLASSIFICATION).unwrap();

        assert_eq!(app.run("   "), None);
        assert_eq!(*notifier.0.borrow(), ["Please choose a valid image file."]);
        assert!(app.history().is_empty());
    }

    #[test]
    fn empty_registry_run_is_none() {
        let mut app = App::new(ModelRegistry::new()).with_notifier(None);
        assert_eq!(app.selected_task(), None);
        assert_eq!(app.selected_info(), None);
        assert_eq!(app.run("anything"), None);
    }
}
