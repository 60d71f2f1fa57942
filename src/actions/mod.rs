// src/actions/mod.rs

//! Wrappers applied around user-triggered actions.
//!
//! [`logged`] brackets an action with "started"/"completed" observations and
//! lets failures pass through untouched. [`guarded`] turns any failure, panics
//! included, into a user notification and a `None` result. The notification
//! and the error event carry the failure's full source chain; panics also keep
//! the standard hook's report. Compose them with logging on the outside:
//!
//! ```ignore
//! let output = logged("Run Selected Task", &log, guarded(Some(&notifier), op))();
//! ```

use std::any::Any;
use std::error::Error;
use std::io::Write;
use std::panic::{self, AssertUnwindSafe};

use colored::Colorize;
use thiserror::Error;
use tracing::{error, info};

/// Receives the observations emitted by [`logged`].
pub trait ActionLog {
    fn started(&self, label: &str);
    fn completed(&self, label: &str);
}

/// Emits observations as `tracing` events.
pub struct TracingLog;

impl ActionLog for TracingLog {
    fn started(&self, label: &str) {
        info!(action = label, "{label} started.");
    }

    fn completed(&self, label: &str) {
        info!(action = label, "{label} completed.");
    }
}

/// Whether a returned value counts as a completed action.
pub trait Outcome {
    fn is_success(&self) -> bool;
}

impl<T, E> Outcome for Result<T, E> {
    fn is_success(&self) -> bool {
        self.is_ok()
    }
}

/// `None` is the guard's "no result" sentinel, which still counts as completed.
impl<T> Outcome for Option<T> {
    fn is_success(&self) -> bool {
        true
    }
}

pub fn logged<'a, R, F>(label: &'a str, log: &'a dyn ActionLog, op: F) -> impl FnOnce() -> R + 'a
where
    F: FnOnce() -> R + 'a,
    R: Outcome,
{
    move || {
        log.started(label);
        let result = op();
        if result.is_success() {
            log.completed(label);
        }
        result
    }
}

#[derive(Debug, Error)]
#[error("notification channel unavailable: {0}")]
pub struct NotifyError(pub String);

/// A user-facing channel for error messages.
pub trait Notifier {
    fn notify_error(&self, title: &str, message: &str) -> Result<(), NotifyError>;
}

/// Writes notifications to stderr.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify_error(&self, title: &str, message: &str) -> Result<(), NotifyError> {
        let mut stderr = std::io::stderr().lock();
        writeln!(stderr, "{} {}", format!("{title}:").red().bold(), message)
            .map_err(|e| NotifyError(e.to_string()))
    }
}

pub fn guarded<'a, T, E, F>(
    notifier: Option<&'a dyn Notifier>,
    op: F,
) -> impl FnOnce() -> Option<T> + 'a
where
    F: FnOnce() -> Result<T, E> + 'a,
    E: Error,
{
    move || {
        let message = match panic::catch_unwind(AssertUnwindSafe(op)) {
            Ok(Ok(value)) => return Some(value),
            Ok(Err(err)) => error_chain(&err),
            Err(payload) => panic_message(payload.as_ref()),
        };

        error!(error = %message, "action failed");
        report(notifier, &message);
        None
    }
}

/// Logs `op` under `label` around an error guard.
pub fn run_action<T, E, F>(
    label: &str,
    log: &dyn ActionLog,
    notifier: Option<&dyn Notifier>,
    op: F,
) -> Option<T>
where
    F: FnOnce() -> Result<T, E>,
    E: Error,
{
    logged(label, log, guarded(notifier, op))()
}

fn report(notifier: Option<&dyn Notifier>, message: &str) {
    match notifier {
        Some(notifier) => {
            if let Err(e) = notifier.notify_error("Error", message) {
                error!(reason = %e, "[ERROR] {message}");
            }
        }
        None => error!("[ERROR] {message}"),
    }
}

fn error_chain(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "action panicked".to_string()
    }
}
