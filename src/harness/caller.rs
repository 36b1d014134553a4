//! Bounded concurrent caller.

use std::time::Instant;

use futures::future::join_all;
use reqwest::StatusCode;
use tokio::sync::Semaphore;
use tracing::debug;

use super::config::HarnessConfig;
use super::endpoint::Endpoint;
use super::error::HarnessError;
use super::result::{BatchResult, CallOutcome, FailureKind};

/// The only status that counts as success.
pub const EXPECTED_STATUS: StatusCode = StatusCode::OK;

/// Fires batches of GET requests at endpoints under one base URL.
///
/// Within a batch all N calls are created together and polled concurrently
/// on the current task. An admission gate with C permits decides which may
/// be in flight; a permit is held from just before sending until the body is
/// read or the call fails.
#[derive(Debug, Clone)]
pub struct Caller {
    client: reqwest::Client,
    base_url: String,
    requests: usize,
    concurrency: usize,
}

impl Caller {
    pub fn new(config: &HarnessConfig) -> Result<Self, HarnessError> {
        if config.concurrency == 0 {
            return Err(HarnessError::ZeroConcurrency);
        }

        let parsed = url::Url::parse(&config.base_url).map_err(|source| {
            HarnessError::InvalidBaseUrl { url: config.base_url.clone(), source }
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(HarnessError::UnsupportedScheme(config.base_url.clone()));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout()?)
            .pool_max_idle_per_host(config.concurrency)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            requests: config.requests,
            concurrency: config.concurrency,
        })
    }

    pub fn requests(&self) -> usize { self.requests }
    pub fn concurrency(&self) -> usize { self.concurrency }

    pub fn url_for(&self, endpoint: &Endpoint) -> String {
        format!("{}/{endpoint}", self.base_url)
    }

    /// Runs one batch. Never fails: every per-call error is counted in the
    /// result instead.
    pub async fn run(&self, endpoint: &Endpoint) -> BatchResult {
        let url = self.url_for(endpoint);
        let gate = Semaphore::new(self.concurrency);

        let started = Instant::now();
        let outcomes = join_all((0..self.requests).map(|_| self.call(&gate, &url))).await;
        let elapsed = started.elapsed();

        let result = BatchResult::from_outcomes(endpoint, &outcomes, elapsed);
        debug!(
            endpoint = %endpoint,
            succeeded = result.requests_succeeded(),
            failures = ?result.failures(),
            elapsed_ms = elapsed.as_millis() as u64,
            "batch finished"
        );
        result
    }

    async fn call(&self, gate: &Semaphore, url: &str) -> CallOutcome {
        // The gate lives as long as the batch and is never closed.
        let Ok(_permit) = gate.acquire().await else {
            return CallOutcome::Failed(FailureKind::Other);
        };

        let res = match self.client.get(url).send().await {
            Ok(res) => res,
            Err(e) => return CallOutcome::Failed(classify(&e)),
        };

        let status = res.status();
        match res.bytes().await {
            Ok(_) if status == EXPECTED_STATUS => CallOutcome::Succeeded,
            Ok(_) => CallOutcome::Failed(FailureKind::Status(status.as_u16())),
            Err(e) => CallOutcome::Failed(classify(&e)),
        }
    }
}

fn classify(e: &reqwest::Error) -> FailureKind {
    if e.is_timeout() {
        FailureKind::Timeout
    } else if e.is_connect() {
        FailureKind::Connect
    } else {
        FailureKind::Other
    }
}
