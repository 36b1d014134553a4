//! Clients for the external services the demo wraps.
//!
//! Each capability is a trait with a real backend and a dry-run stub. The
//! variant is picked once at startup from [`Settings`]: without credentials
//! the stub answers with a deterministic placeholder and performs no I/O.

mod inference;
mod object_store;
mod sentiment;

pub use inference::{DryRunInference, InferenceClient, RunpodClient};
pub use object_store::{DryRunObjectStore, ObjectStore};
pub use sentiment::{DEFAULT_MODELS, DryRunSentiment, HuggingFaceClient, SentimentClient};

use std::sync::Arc;

use tracing::{info, warn};

use super::error::AppError;
use super::settings::Settings;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{service} request failed: {source}")]
    Http {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

impl ServiceError {
    pub(crate) fn http(service: &'static str) -> impl FnOnce(reqwest::Error) -> Self {
        move |source| Self::Http { service, source }
    }
}

pub fn object_store(settings: &Settings) -> Arc<dyn ObjectStore> {
    if settings.s3_configured() {
        warn!("S3 credentials are set but no S3 backend is built in; uploads stay dry-run");
    }
    Arc::new(DryRunObjectStore)
}

pub fn inference(settings: &Settings) -> Result<Arc<dyn InferenceClient>, AppError> {
    Ok(match settings.runpod() {
        Some((endpoint, api_key)) => {
            info!(%endpoint, "using RunPod inference backend");
            Arc::new(RunpodClient::new(endpoint, api_key)?)
        }
        None => Arc::new(DryRunInference),
    })
}

pub fn sentiment(settings: &Settings) -> Result<Arc<dyn SentimentClient>, AppError> {
    Ok(match settings.hf_token.as_deref() {
        Some(token) => {
            info!("using Hugging Face sentiment backend");
            Arc::new(HuggingFaceClient::new(token)?)
        }
        None => Arc::new(DryRunSentiment),
    })
}
