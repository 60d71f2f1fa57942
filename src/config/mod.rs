// src/config/mod.rs

//! Runtime configuration, read from environment variables at startup.

use std::str::FromStr;
use std::time::Duration;

use crate::model::classifier::DEFAULT_CLASSIFIER_MODEL;
use crate::model::summarizer::DEFAULT_SUMMARIZER_MODEL;

/// Which capability backend the task models are loaded from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendKind {
    Http,
    Fake,
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(BackendKind::Http),
            "fake" => Ok(BackendKind::Fake),
            other => Err(format!("unknown backend '{other}' (expected 'http' or 'fake')")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub backend: BackendKind,
    pub summarizer_model: String,
    pub classifier_model: String,

    /// Base URL used to look models up (default: `"https://huggingface.co"`).
    pub hub_url: String,

    /// Base URL of the inference API (default: `"https://api-inference.huggingface.co"`).
    pub inference_url: String,

    pub api_token: Option<String>,
    pub timeout: Duration,

    /// Look each model up on the hub before accepting it.
    pub verify_models: bool,

    /// `tracing` filter string, e.g. `"info"` or `"taskdesk=debug"`.
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a [`Config`] from an arbitrary key lookup, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_owned());

        Self {
            backend: parse_or(&lookup, "TASKDESK_BACKEND", BackendKind::Http),
            summarizer_model: var("TASKDESK_SUMMARIZER_MODEL", DEFAULT_SUMMARIZER_MODEL),
            classifier_model: var("TASKDESK_CLASSIFIER_MODEL", DEFAULT_CLASSIFIER_MODEL),
            hub_url: var("TASKDESK_HUB_URL", "https://huggingface.co"),
            inference_url: var("TASKDESK_INFERENCE_URL", "https://api-inference.huggingface.co"),
            api_token: lookup("HF_TOKEN").filter(|t| !t.trim().is_empty()),
            timeout: Duration::from_secs(parse_or(&lookup, "TASKDESK_TIMEOUT_SECS", 120)),
            verify_models: lookup("TASKDESK_VERIFY_MODELS")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(true),
            log_level: var("TASKDESK_LOG", "info"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}
