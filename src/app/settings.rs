//! Service settings.
//!
//! Sources, later ones winning:
//! 1. built-in defaults
//! 2. `blockbench.toml` in the working directory, if present
//! 3. environment variables named after the fields (`HF_TOKEN`,
//!    `SLOW_DELAY_MS`, ...), matched case-insensitively

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Deserializer, Serialize, de};

use super::error::AppError;

pub const CONFIG_FILE: &str = "blockbench.toml";

const ENV_KEYS: &[&str] = &[
    "app_name",
    "debug",
    "aws_access_key_id",
    "aws_secret_access_key",
    "aws_region",
    "aws_s3_bucket",
    "runpod_api_key",
    "runpod_endpoint",
    "hf_token",
    "upstream_url",
    "upstream_timeout_secs",
    "slow_delay_ms",
    "blocking_workers",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub app_name: String,
    #[serde(deserialize_with = "flag")]
    pub debug: bool,

    pub aws_access_key_id: Option<String>,
    pub aws_secret_access_key: Option<String>,
    pub aws_region: Option<String>,
    /// Bucket for background log uploads. Without it the upload is skipped.
    pub aws_s3_bucket: Option<String>,

    pub runpod_api_key: Option<String>,
    pub runpod_endpoint: Option<String>,

    pub hf_token: Option<String>,

    /// Target of the `sync-http` / `async-http` passthroughs.
    pub upstream_url: String,
    pub upstream_timeout_secs: u64,

    /// How long `sync-slow` and `async-slow` block.
    pub slow_delay_ms: u64,
    /// Capacity of the pool that runs exclusive-block work.
    pub blocking_workers: usize,
}

/// Accepts what people put in env files: booleans, `0`/`1`, and
/// `yes`/`no`/`on`/`off`/`true`/`false` in any case.
fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Int(i64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Bool(b) => Ok(b),
        Raw::Int(0) => Ok(false),
        Raw::Int(1) => Ok(true),
        Raw::Int(n) => Err(de::Error::custom(format!("expected 0 or 1, found {n}"))),
        Raw::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "t" | "yes" | "y" | "on" => Ok(true),
            "0" | "false" | "f" | "no" | "n" | "off" => Ok(false),
            other => Err(de::Error::custom(format!("expected a boolean flag, found {other:?}"))),
        },
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_name: "blockbench demo".to_owned(),
            debug: false,
            aws_access_key_id: None,
            aws_secret_access_key: None,
            aws_region: None,
            aws_s3_bucket: None,
            runpod_api_key: None,
            runpod_endpoint: None,
            hf_token: None,
            upstream_url: "https://httpbin.org/delay/2".to_owned(),
            upstream_timeout_secs: 10,
            slow_delay_ms: 2_000,
            blocking_workers: 1,
        }
    }
}

impl Settings {
    pub fn figment() -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::raw().only(ENV_KEYS))
    }

    pub fn load() -> Result<Self, AppError> {
        Ok(Self::figment().extract()?)
    }

    pub fn slow_delay(&self) -> Duration {
        Duration::from_millis(self.slow_delay_ms)
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    pub fn s3_configured(&self) -> bool {
        self.aws_access_key_id.is_some()
            && self.aws_secret_access_key.is_some()
            && self.aws_region.is_some()
    }

    /// Endpoint and key, only when both are set.
    pub fn runpod(&self) -> Option<(&str, &str)> {
        Some((self.runpod_endpoint.as_deref()?, self.runpod_api_key.as_deref()?))
    }
}
