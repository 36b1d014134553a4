/// Run-level failures. Per-call failures never surface here; they are
/// counted in the [`BatchResult`](super::BatchResult).
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("invalid endpoint {0:?}: expected a relative path such as `async-slow`")]
    InvalidEndpoint(String),

    #[error("no endpoints to compare")]
    NoEndpoints,

    #[error("concurrency must be at least 1")]
    ZeroConcurrency,

    #[error("per-call timeout must be a positive number of seconds, got {0}")]
    InvalidTimeout(f64),

    #[error("base url {0:?} must use http or https")]
    UnsupportedScheme(String),

    #[error("invalid base url {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("configuration error: {0}")]
    Config(#[from] Box<figment::Error>),
}

impl From<figment::Error> for HarnessError {
    fn from(e: figment::Error) -> Self {
        Self::Config(Box::new(e))
    }
}
