use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};

use super::error::HarnessError;

/// Fixed parameters of a comparison run.
///
/// Loaded from defaults and `BENCH_`-prefixed environment variables
/// (`BENCH_REQUESTS=20`, `BENCH_ENDPOINTS=[sync-slow, async-slow]`); the CLI
/// overrides individual fields afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarnessConfig {
    pub base_url: String,
    /// N: calls per batch.
    pub requests: usize,
    /// C: ceiling on in-flight calls.
    pub concurrency: usize,
    /// Per-call timeout, connect through body.
    pub timeout_secs: f64,
    /// Batches run in this order.
    pub endpoints: Vec<String>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000/api".to_owned(),
            requests: 5,
            concurrency: 5,
            timeout_secs: 60.0,
            endpoints: ["sync-slow", "async-slow", "sync-http", "async-http"]
                .map(str::to_owned)
                .to_vec(),
        }
    }
}

impl HarnessConfig {
    pub fn figment() -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Env::prefixed("BENCH_"))
    }

    pub fn load() -> Result<Self, HarnessError> {
        Ok(Self::figment().extract()?)
    }

    pub fn timeout(&self) -> Result<Duration, HarnessError> {
        Duration::try_from_secs_f64(self.timeout_secs)
            .ok()
            .filter(|t| !t.is_zero())
            .ok_or(HarnessError::InvalidTimeout(self.timeout_secs))
    }
}
