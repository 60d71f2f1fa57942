use std::cell::RefCell;
use std::path::Path;

use image::{Rgb, RgbImage};
use regex::Regex;
use taskdesk::actions::{self, ActionLog, Notifier, NotifyError};
use taskdesk::app::App;
use taskdesk::config::Config;
use taskdesk::inference::FakeBackend;
use taskdesk::registry::{IMAGE_CLASSIFICATION, TEXT_SUMMARIZATION};
use taskdesk::{ClassifierModel, ModelError, ModelRegistry, SummarizerModel, TaskModel};

const ARTICLE: &str = "The city council met on Tuesday evening to debate a proposal that would \
    convert three downtown parking garages into mixed-use housing. Supporters argued the plan \
    would ease a housing shortage that has pushed rents up by nearly a fifth over two years, \
    while opponents warned that small businesses depend on the parking for customers who drive \
    in from surrounding towns. After four hours of public comment the council voted to delay a \
    decision until an independent traffic study is completed next spring, and asked the \
    planning department to return with options that keep at least some of the spaces open.";

fn write_png(dir: &Path, name: &str, colour: [u8; 3]) -> String {
    let path = dir.join(name);
    RgbImage::from_pixel(8, 8, Rgb(colour)).save(&path).unwrap();
    path.to_str().unwrap().to_string()
}

#[test]
fn summary_is_bounded_and_non_empty() {
    let model = SummarizerModel::with_default_model(&FakeBackend::new()).unwrap();
    let summary = model.process(ARTICLE).unwrap();

    assert!(!summary.is_empty());
    assert!(summary.split_whitespace().count() <= 80);
    assert!(summary.len() < ARTICLE.len());
}

#[test]
fn blank_text_is_invalid_input() {
    let model = SummarizerModel::with_default_model(&FakeBackend::new()).unwrap();
    assert!(matches!(model.process(""), Err(ModelError::InvalidInput(_))));
    assert!(matches!(model.process("   "), Err(ModelError::InvalidInput(_))));
}

#[test]
fn missing_image_is_input_not_found() {
    let model = ClassifierModel::with_default_model(&FakeBackend::new()).unwrap();
    assert!(matches!(
        model.process("/tmp/taskdesk-does-not-exist.png"),
        Err(ModelError::InputNotFound { .. })
    ));
}

#[test]
fn classification_lines_are_ranked_and_formatted() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_png(dir.path(), "reddish.png", [200, 40, 20]);

    let model = ClassifierModel::with_default_model(&FakeBackend::new()).unwrap();
    let output = model.process(&path).unwrap();

    let line = Regex::new(r"^(\d+)\. (.+) \((\d+\.\d{3})\)$").unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert!(!lines.is_empty() && lines.len() <= 3);

    let mut last_score = f32::INFINITY;
    for (i, text) in lines.iter().enumerate() {
        let caps = line.captures(text).unwrap();
        assert_eq!(caps[1].parse::<usize>().unwrap(), i + 1);
        let score: f32 = caps[3].parse().unwrap();
        assert!(score <= last_score);
        last_score = score;
    }
    assert!(lines[0].starts_with("1. red "));
}

#[test]
fn info_is_stable_and_starts_with_identity() {
    let backend = FakeBackend::new();
    let models: Vec<Box<dyn TaskModel>> = vec![
        Box::new(SummarizerModel::with_default_model(&backend).unwrap()),
        Box::new(ClassifierModel::with_default_model(&backend).unwrap()),
    ];

    for model in &models {
        let info = model.get_info();
        let mut lines = info.lines();
        assert_eq!(
            lines.next().unwrap(),
            format!("Task: {}", model.identity().task_label())
        );
        assert_eq!(lines.next().unwrap(), format!("Model: {}", model.model_id()));
        assert_eq!(info, model.get_info());
    }
}

#[test]
fn registry_tasks_differ_by_category() {
    let registry = ModelRegistry::load(&FakeBackend::new(), &Config::default());
    let text = registry.lookup(TEXT_SUMMARIZATION).unwrap();
    let image = registry.lookup(IMAGE_CLASSIFICATION).unwrap();

    let category = |info: String| {
        info.lines()
            .find(|l| l.starts_with("Category:"))
            .map(str::to_string)
            .unwrap()
    };
    assert_eq!(category(text.get_info()), "Category: NLP (Text)");
    assert_eq!(category(image.get_info()), "Category: CV (Vision)");
    assert_ne!(text.model_id(), image.model_id());
}

#[test]
fn unknown_model_id_leaves_other_task_usable() {
    let config = Config {
        summarizer_model: "nobody/none".into(),
        ..Config::default()
    };
    let registry = ModelRegistry::load(&FakeBackend::new(), &config);

    assert!(registry.lookup(TEXT_SUMMARIZATION).is_none());
    assert!(registry.lookup(IMAGE_CLASSIFICATION).is_some());
    assert!(matches!(
        registry.failures()[0].1,
        ModelError::Initialization { .. }
    ));
}

#[derive(Default)]
struct Recorder {
    events: RefCell<Vec<String>>,
}

impl ActionLog for Recorder {
    fn started(&self, label: &str) {
        self.events.borrow_mut().push(format!("started:{label}"));
    }

    fn completed(&self, label: &str) {
        self.events.borrow_mut().push(format!("completed:{label}"));
    }
}

impl Notifier for Recorder {
    fn notify_error(&self, title: &str, message: &str) -> Result<(), NotifyError> {
        self.events.borrow_mut().push(format!("notify:{title}:{message}"));
        Ok(())
    }
}

#[test]
fn wrapped_failure_notifies_exactly_once() {
    let recorder = Recorder::default();
    let model = SummarizerModel::with_default_model(&FakeBackend::new()).unwrap();

    let out = actions::run_action("Summarize", &recorder, Some(&recorder), || model.process(" "));

    assert_eq!(out, None);
    let events = recorder.events.borrow();
    assert_eq!(events.iter().filter(|e| e.starts_with("notify:")).count(), 1);
    assert_eq!(events[0], "started:Summarize");
}

#[test]
fn wrapped_success_passes_through() {
    let recorder = Recorder::default();
    let model = SummarizerModel::with_default_model(&FakeBackend::new()).unwrap();

    let out = actions::run_action("Summarize", &recorder, Some(&recorder), || model.process("Hi there."));

    assert_eq!(out.as_deref(), Some("Hi there."));
    assert_eq!(
        *recorder.events.borrow(),
        ["started:Summarize", "completed:Summarize"]
    );
}

#[test]
fn app_runs_both_tasks() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_png(dir.path(), "leaf.png", [30, 180, 60]);

    let registry = ModelRegistry::load(&FakeBackend::new(), &Config::default());
    let mut app = App::new(registry).with_notifier(None);

    let summary = app.run(ARTICLE).unwrap();
    assert!(summary.starts_with("[Summary]\n"));

    app.select(IMAGE_CLASSIFICATION).unwrap();
    let top = app.run(&path).unwrap();
    assert!(top.starts_with("[Image Top-3]\n1. green ("));

    assert_eq!(
        app.history(),
        ["Ran text summarization.", "Ran image classification."]
    );
}
