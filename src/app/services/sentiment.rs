use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::debug;

use super::ServiceError;

const BASE_URL: &str = "https://api-inference.huggingface.co/models";
const TIMEOUT: Duration = Duration::from_secs(60);

/// Tried in order until one answers 200.
pub const DEFAULT_MODELS: &[&str] = &[
    "distilbert-base-uncased-finetuned-sst-2-english",
    "cardiffnlp/twitter-roberta-base-sentiment-latest",
    "nlptown/bert-base-multilingual-uncased-sentiment",
    "finiteautomata/bertweet-base-sentiment-analysis",
];

/// Hosted sentiment analysis.
#[async_trait]
pub trait SentimentClient: Send + Sync {
    async fn sentiment(&self, text: &str) -> Result<Value, ServiceError>;
}

/// Hugging Face inference API with model fallback.
///
/// - `200`: `{"model", "result"}` from the first model that answers.
/// - `401`/`403`: stop, the token is wrong for every model.
/// - anything else: remember it and try the next model.
///
/// Only transport failures are errors; API-level failures are reported in
/// the returned object.
#[derive(Debug, Clone)]
pub struct HuggingFaceClient {
    http: reqwest::Client,
    token: String,
    base_url: String,
    models: Vec<String>,
}

impl HuggingFaceClient {
    pub fn new(token: &str) -> Result<Self, reqwest::Error> {
        Ok(Self {
            http: reqwest::Client::builder().timeout(TIMEOUT).build()?,
            token: token.to_owned(),
            base_url: BASE_URL.to_owned(),
            models: DEFAULT_MODELS.iter().map(|m| (*m).to_owned()).collect(),
        })
    }

    /// Points the client at another inference server, e.g. a local mock.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_owned();
        self
    }
}

#[async_trait]
impl SentimentClient for HuggingFaceClient {
    async fn sentiment(&self, text: &str) -> Result<Value, ServiceError> {
        let payload = json!({ "inputs": text });
        let mut last_error = Value::Null;

        for model in &self.models {
            let res = self.http
                .post(format!("{}/{model}", self.base_url))
                .bearer_auth(&self.token)
                // Blocks until a cold model is loaded instead of answering 503.
                .header("x-wait-for-model", "true")
                .json(&payload)
                .send()
                .await
                .map_err(ServiceError::http("huggingface"))?;

            let status = res.status().as_u16();
            if status == 200 {
                let result: Value = res.json().await.map_err(ServiceError::http("huggingface"))?;
                return Ok(json!({ "model": model, "result": result }));
            }

            let body = res.text().await.unwrap_or_default();
            if status == 401 || status == 403 {
                return Ok(json!({
                    "error": "Unauthorized/Forbidden",
                    "hint": "Check HF_TOKEN and the token's scopes.",
                    "status": status,
                    "model": model,
                    "body": body,
                }));
            }

            debug!(%model, status, "sentiment model failed, trying next");
            last_error = json!({ "status": status, "model": model, "body": body });
        }

        Ok(json!({
            "error": "All sentiment models failed",
            "hint": "Model may be warming or temporarily unavailable.",
            "last_error": last_error,
        }))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunSentiment;

#[async_trait]
impl SentimentClient for DryRunSentiment {
    async fn sentiment(&self, text: &str) -> Result<Value, ServiceError> {
        Ok(json!({ "status": "DRY-RUN", "echo": text }))
    }
}
