use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use super::ServiceError;

const TIMEOUT: Duration = Duration::from_secs(30);

/// GPU inference endpoint that echoes its input.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    async fn echo(&self, payload: Value) -> Result<Value, ServiceError>;
}

/// RunPod serverless endpoint. Non-2xx responses are errors.
#[derive(Debug, Clone)]
pub struct RunpodClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl RunpodClient {
    pub fn new(endpoint: &str, api_key: &str) -> Result<Self, reqwest::Error> {
        Ok(Self {
            http: reqwest::Client::builder().timeout(TIMEOUT).build()?,
            endpoint: endpoint.to_owned(),
            api_key: api_key.to_owned(),
        })
    }
}

#[async_trait]
impl InferenceClient for RunpodClient {
    async fn echo(&self, payload: Value) -> Result<Value, ServiceError> {
        let err = || ServiceError::http("runpod");
        self.http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(err())?
            .json()
            .await
            .map_err(err())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunInference;

#[async_trait]
impl InferenceClient for DryRunInference {
    async fn echo(&self, payload: Value) -> Result<Value, ServiceError> {
        Ok(json!({ "status": "DRY-RUN", "echo": payload }))
    }
}
