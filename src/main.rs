use std::io;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use taskdesk::app::{self, App};
use taskdesk::config::{BackendKind, Config};
use taskdesk::inference::{Backend, FakeBackend, HttpBackend};
use taskdesk::registry::{ModelRegistry, TEXT_SUMMARIZATION};

#[derive(Parser)]
#[command(name = "taskdesk", version, about = "Summarize text or classify images with hosted models")]
struct Cli {
    /// Capability backend: `http` or `fake`
    #[arg(long)]
    backend: Option<BackendKind>,

    #[arg(long)]
    summarizer_model: Option<String>,

    #[arg(long)]
    classifier_model: Option<String>,

    /// Skip looking models up on the hub
    #[arg(long)]
    no_verify: bool,

    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// List available tasks
    Tasks,
    /// Show model info for a task
    Info { task: Option<String> },
    /// Run a task once
    Run {
        #[arg(long, default_value = TEXT_SUMMARIZATION)]
        task: String,
        /// Text to summarize, or the path of an image to classify
        input: String,
    },
    /// Interactive session (default)
    Shell,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }
    if let Some(model) = cli.summarizer_model {
        config.summarizer_model = model;
    }
    if let Some(model) = cli.classifier_model {
        config.classifier_model = model;
    }
    if cli.no_verify {
        config.verify_models = false;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    init_tracing(&config.log_level);
    info!(version = env!("CARGO_PKG_VERSION"), backend = ?config.backend, "taskdesk starting");

    let backend: Box<dyn Backend> = match config.backend {
        BackendKind::Fake => Box::new(FakeBackend::new()),
        BackendKind::Http => match HttpBackend::from_config(&config) {
            Ok(backend) => Box::new(backend),
            Err(e) => {
                eprintln!("{} {e}", "Error:".red().bold());
                return ExitCode::FAILURE;
            }
        },
    };

    let registry = ModelRegistry::load(backend.as_ref(), &config);
    let mut app = App::new(registry);

    match cli.command.unwrap_or(Command::Shell) {
        Command::Tasks => {
            for task in app.tasks() {
                println!("{task}");
            }
            ExitCode::SUCCESS
        }
        Command::Info { task } => {
            let info = match task {
                Some(task) => app.select(&task),
                None => app
                    .selected_info()
                    .ok_or_else(|| taskdesk::ModelError::UnknownTask("(none)".into())),
            };
            match info {
                Ok(info) => {
                    print!("{info}");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("{} {e}", "Error:".red().bold());
                    ExitCode::FAILURE
                }
            }
        }
        Command::Run { task, input } => {
            if let Err(e) = app.select(&task) {
                eprintln!("{} {e}", "Error:".red().bold());
                return ExitCode::FAILURE;
            }
            match app.run(&input) {
                Some(output) => {
                    println!("{output}");
                    ExitCode::SUCCESS
                }
                None => ExitCode::FAILURE,
            }
        }
        Command::Shell => {
            let stdin = io::stdin();
            let mut stdout = io::stdout();
            match app::shell::run(&mut app, stdin.lock(), &mut stdout) {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    eprintln!("{} {e}", "Error:".red().bold());
                    ExitCode::FAILURE
                }
            }
        }
    }
}

fn init_tracing(level: &str) {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => match level.parse::<EnvFilter>() {
            Ok(filter) => filter,
            Err(e) => {
                eprintln!("WARN: log level '{level}' is not a valid filter ({e}); falling back to 'info'");
                EnvFilter::new("info")
            }
        },
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
