// src/inference/http.rs

//! Capabilities served over HTTP by the Hugging Face Hub and Inference API.

use std::io::Cursor;
use std::sync::LazyLock;
use std::time::Duration;

use image::{ImageFormat, RgbImage};
use regex::Regex;
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{ModelError, ModelResult};
use crate::inference::{Backend, ClassifyImage, GenerationBounds, Prediction, Summarize};
use crate::model::classifier::CLASSIFICATION_TASK;
use crate::model::summarizer::SUMMARIZATION_TASK;

static MODEL_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*(/[A-Za-z0-9][A-Za-z0-9._-]*)?$")
        .expect("model id pattern is valid")
});

pub fn is_valid_model_id(model_id: &str) -> bool {
    MODEL_ID.is_match(model_id) && !model_id.contains("..")
}

pub struct HttpBackend {
    client: Client,
    hub_url: String,
    inference_url: String,
    token: Option<String>,
    verify: bool,
}

impl HttpBackend {
    pub fn new(hub_url: &str, inference_url: &str, timeout: Duration) -> ModelResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            hub_url: hub_url.trim_end_matches('/').to_string(),
            inference_url: inference_url.trim_end_matches('/').to_string(),
            token: None,
            verify: true,
        })
    }

    pub fn from_config(config: &Config) -> ModelResult<Self> {
        Ok(Self::new(&config.hub_url, &config.inference_url, config.timeout)?
            .with_token(config.api_token.clone())
            .verify_models(config.verify_models))
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    /// When disabled, models are not looked up on the hub before use.
    pub fn verify_models(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    fn acquire(&self, task: &str, model_id: &str) -> ModelResult<Endpoint> {
        if !is_valid_model_id(model_id) {
            return Err(ModelError::initialization(task, model_id, "malformed model identifier"));
        }

        if self.verify {
            self.check_hub(task, model_id)?;
        }

        Ok(Endpoint {
            client: self.client.clone(),
            url: format!("{}/models/{}", self.inference_url, model_id),
            token: self.token.clone(),
        })
    }

    fn check_hub(&self, task: &str, model_id: &str) -> ModelResult<()> {
        let url = format!("{}/api/models/{}", self.hub_url, model_id);
        debug!(%url, "checking model on hub");

        let mut request = self.client.get(&url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .map_err(|e| ModelError::initialization(task, model_id, format!("hub unreachable: {e}")))?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                return Err(ModelError::initialization(task, model_id, "model not found on hub"));
            }
            status if !status.is_success() => {
                return Err(ModelError::initialization(
                    task,
                    model_id,
                    format!("hub returned {status}"),
                ));
            }
            _ => {}
        }

        let info: HubModelInfo = response
            .json()
            .map_err(|e| ModelError::initialization(task, model_id, format!("bad hub response: {e}")))?;

        match info.pipeline_tag.as_deref() {
            Some(tag) if tag != task => Err(ModelError::initialization(
                task,
                model_id,
                format!("model is tagged for '{tag}'"),
            )),
            Some(_) => Ok(()),
            None => {
                warn!(model_id, task, "model has no pipeline tag; assuming it fits");
                Ok(())
            }
        }
    }
}

impl Backend for HttpBackend {
    fn name(&self) -> &str {
        "http"
    }

    fn load_summarizer(&self, model_id: &str) -> ModelResult<Box<dyn Summarize>> {
        let endpoint = self.acquire(SUMMARIZATION_TASK, model_id)?;
        Ok(Box::new(HttpSummarizer { endpoint }))
    }

    fn load_classifier(&self, model_id: &str) -> ModelResult<Box<dyn ClassifyImage>> {
        let endpoint = self.acquire(CLASSIFICATION_TASK, model_id)?;
        Ok(Box::new(HttpImageClassifier { endpoint }))
    }
}

struct Endpoint {
    client: Client,
    url: String,
    token: Option<String>,
}

impl Endpoint {
    fn send(&self, request: RequestBuilder) -> ModelResult<String> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send()?;
        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            return Err(ModelError::Inference(error_message(status, &body)));
        }
        Ok(body)
    }
}

pub struct HttpSummarizer {
    endpoint: Endpoint,
}

impl Summarize for HttpSummarizer {
    fn summarize(&self, text: &str, bounds: &GenerationBounds) -> ModelResult<Vec<String>> {
        let payload = json!({
            "inputs": text,
            "parameters": {
                "min_length": bounds.min_length,
                "max_length": bounds.max_length,
                "do_sample": bounds.do_sample,
            }
        });

        let body = self
            .endpoint
            .send(self.endpoint.client.post(&self.endpoint.url).json(&payload))?;
        parse_summaries(&body)
    }
}

pub struct HttpImageClassifier {
    endpoint: Endpoint,
}

impl ClassifyImage for HttpImageClassifier {
    fn classify(&self, image: &RgbImage) -> ModelResult<Vec<Prediction>> {
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| ModelError::Inference(format!("failed to encode image: {e}")))?;

        let request = self
            .endpoint
            .client
            .post(&self.endpoint.url)
            .header(CONTENT_TYPE, "image/png")
            .body(bytes);
        let body = self.endpoint.send(request)?;
        parse_predictions(&body)
    }
}

#[derive(Deserialize)]
struct HubModelInfo {
    #[serde(default)]
    pipeline_tag: Option<String>,
}

#[derive(Deserialize)]
struct SummaryItem {
    summary_text: String,
}

#[derive(Deserialize)]
struct LabelScore {
    label: String,
    score: f32,
}

#[derive(Deserialize)]
struct ApiError {
    error: String,
}

fn error_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<ApiError>(body) {
        Ok(api) => format!("{status}: {}", api.error),
        Err(_) if body.trim().is_empty() => status.to_string(),
        Err(_) => format!("{status}: {}", body.trim()),
    }
}

pub fn parse_summaries(body: &str) -> ModelResult<Vec<String>> {
    match serde_json::from_str::<Vec<SummaryItem>>(body) {
        Ok(items) => Ok(items.into_iter().map(|i| i.summary_text).collect()),
        Err(e) => Err(unexpected_body(body, e)),
    }
}

pub fn parse_predictions(body: &str) -> ModelResult<Vec<Prediction>> {
    match serde_json::from_str::<Vec<LabelScore>>(body) {
        Ok(items) => Ok(items
            .into_iter()
            .map(|i| Prediction {
                label: i.label,
                score: i.score,
            })
            .collect()),
        Err(e) => Err(unexpected_body(body, e)),
    }
}

fn unexpected_body(body: &str, err: serde_json::Error) -> ModelError {
    match serde_json::from_str::<ApiError>(body) {
        Ok(api) => ModelError::Inference(api.error),
        Err(_) => ModelError::Inference(format!("unexpected response: {err}")),
    }
}
