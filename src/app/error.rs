//! Application errors.

use serde_json::json;
use tracing::error;

use crate::response::{IntoResponse, Json, Response};
use crate::status::Status;

use super::services::ServiceError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("http client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("blocking pool is closed")]
    PoolClosed,

    #[error("blocking task failed: {0}")]
    Blocking(#[from] tokio::task::JoinError),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl From<figment::Error> for AppError {
    fn from(e: figment::Error) -> Self {
        Self::Config(Box::new(e))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::Service(_) => Status::BadGateway,
            _ => Status::InternalServerError,
        };
        error!("request failed: {self}");
        (status, Json(json!({ "ok": false, "error": self.to_string() }))).into_response()
    }
}
