use std::sync::Arc;

use tracing::info;

use super::error::AppError;
use super::pool::BlockingPool;
use super::services::{self, InferenceClient, ObjectStore, SentimentClient};
use super::settings::Settings;
use super::store::{MemoryUserRepository, UserRepository};

/// Everything the handlers share, built once at startup.
pub struct AppState {
    pub settings: Settings,
    pub users: Arc<dyn UserRepository>,
    pub blocking: BlockingPool,
    /// Client for the `*-http` passthroughs.
    pub upstream: reqwest::Client,
    pub object_store: Arc<dyn ObjectStore>,
    pub inference: Arc<dyn InferenceClient>,
    pub sentiment: Arc<dyn SentimentClient>,
}

impl AppState {
    pub fn new(settings: Settings) -> Result<Self, AppError> {
        let blocking = BlockingPool::new(settings.blocking_workers);
        info!(workers = blocking.workers(), "capped blocking pool");

        let upstream = reqwest::Client::builder()
            .timeout(settings.upstream_timeout())
            .build()?;

        Ok(Self {
            users: Arc::new(MemoryUserRepository::new()),
            blocking,
            upstream,
            object_store: services::object_store(&settings),
            inference: services::inference(&settings)?,
            sentiment: services::sentiment(&settings)?,
            settings,
        })
    }

    pub fn with_object_store(mut self, store: Arc<dyn ObjectStore>) -> Self {
        self.object_store = store;
        self
    }

    pub fn with_inference(mut self, client: Arc<dyn InferenceClient>) -> Self {
        self.inference = client;
        self
    }

    pub fn with_sentiment(mut self, client: Arc<dyn SentimentClient>) -> Self {
        self.sentiment = client;
        self
    }
}
