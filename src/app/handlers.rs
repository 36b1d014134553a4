//! Route handlers of the demo service.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use tracing::{info, warn};

use crate::request::Request;
use crate::response::{ContentType, IntoResponse, Json, Response};
use crate::status::Status;

use super::error::AppError;
use super::models::{FieldError, UserCreate};
use super::state::AppState;

const LOG_KEY: &str = "logs/app.log";
const DEFAULT_REMOTE_DELAY: f64 = 2.0;

fn unprocessable(errors: Vec<FieldError>) -> Response {
    (Status::UnprocessableContent, Json(json!({ "detail": errors }))).into_response()
}

fn passthrough_failed(error: impl std::fmt::Display) -> Response {
    (Status::ServiceUnavailable, Json(json!({ "ok": false, "error": error.to_string() })))
        .into_response()
}

fn json_body<T: serde::de::DeserializeOwned>(req: &Request) -> Result<T, Response> {
    req.json().map_err(|e| unprocessable(vec![FieldError::new("body", e.to_string())]))
}

// GET /
pub async fn home(_req: Request) -> Response {
    Response::builder().bytes(
        ContentType::Html,
        b"<!doctype html><h1>blockbench</h1><p>API mounted at <code>/api</code>.</p>".to_vec(),
    )
}

// GET /api/health
pub async fn health(state: Arc<AppState>, _req: Request) -> Response {
    Json(json!({ "ok": true, "app": state.settings.app_name })).into_response()
}

// POST /api/users
pub async fn create_user(state: Arc<AppState>, req: Request) -> Response {
    let new: UserCreate = match json_body(&req) {
        Ok(new) => new,
        Err(res) => return res,
    };
    if let Err(errors) = new.validate() {
        return unprocessable(errors);
    }
    let user = state.users.add(new);
    (Status::Created, Json(user)).into_response()
}

// GET /api/users
pub async fn list_users(state: Arc<AppState>, _req: Request) -> Response {
    Json(state.users.list()).into_response()
}

// GET /api/sync-slow
//
// Sleeps on the blocking pool. With one worker, concurrent calls queue.
pub async fn sync_slow(state: Arc<AppState>, _req: Request) -> Response {
    let delay = state.settings.slow_delay();
    match state.blocking.run(move || std::thread::sleep(delay)).await {
        Ok(()) => Json(json!({ "kind": "sync", "slept": delay.as_secs_f64() })).into_response(),
        Err(e) => e.into_response(),
    }
}

// GET /api/async-slow
pub async fn async_slow(state: Arc<AppState>, _req: Request) -> Response {
    let delay = state.settings.slow_delay();
    tokio::time::sleep(delay).await;
    Json(json!({ "kind": "async", "slept": delay.as_secs_f64() })).into_response()
}

// POST /api/background?msg=...
pub async fn background(state: Arc<AppState>, req: Request) -> Response {
    let msg = req.query("msg").unwrap_or_else(|| "hello".to_owned());
    tokio::spawn(log_to_object_store(state, format!("BG: {msg}")));
    Json(json!({ "enqueued": true })).into_response()
}

async fn log_to_object_store(state: Arc<AppState>, message: String) {
    let Some(bucket) = state.settings.aws_s3_bucket.as_deref() else {
        return;
    };
    match state.object_store.upload_text(bucket, LOG_KEY, &format!("{message}\n")).await {
        Ok(uri) => info!(%uri, "background log uploaded"),
        Err(e) => warn!("background log upload failed: {e}"),
    }
}

// POST /api/runpod/echo
pub async fn runpod_echo(state: Arc<AppState>, req: Request) -> Response {
    let payload: Value = match json_body(&req) {
        Ok(payload) => payload,
        Err(res) => return res,
    };
    match state.inference.echo(payload).await {
        Ok(out) => Json(out).into_response(),
        Err(e) => AppError::from(e).into_response(),
    }
}

// POST /api/huggingface/sentiment
pub async fn sentiment(state: Arc<AppState>, req: Request) -> Response {
    let payload: Value = match json_body(&req) {
        Ok(payload) => payload,
        Err(res) => return res,
    };
    let text = payload.get("text").and_then(Value::as_str).unwrap_or_default();
    match state.sentiment.sentiment(text).await {
        Ok(out) => Json(out).into_response(),
        Err(e) => AppError::from(e).into_response(),
    }
}

// GET /api/fake-remote?delay=<secs>
pub async fn fake_remote(req: Request) -> Response {
    let delay = match req.query("delay") {
        None => DEFAULT_REMOTE_DELAY,
        Some(raw) => match raw.parse::<f64>() {
            Ok(d) => d,
            Err(_) => return unprocessable(vec![FieldError::new("delay", "must be a number")]),
        },
    };
    let Ok(sleep) = Duration::try_from_secs_f64(delay) else {
        return unprocessable(vec![FieldError::new("delay", "must be a finite, non-negative number")]);
    };
    tokio::time::sleep(sleep).await;
    Json(json!({ "ok": true, "delay": delay })).into_response()
}

// GET /api/sync-http
//
// The outbound call blocks a pool worker for its whole duration.
pub async fn sync_http(state: Arc<AppState>, _req: Request) -> Response {
    let client = state.upstream.clone();
    let url = state.settings.upstream_url.clone();
    let runtime = tokio::runtime::Handle::current();

    let outcome = state.blocking
        .run(move || runtime.block_on(async { client.get(&url).send().await.map(|r| r.status()) }))
        .await;

    match outcome {
        Ok(Ok(status)) => Json(json!({ "ok": true, "status": status.as_u16() })).into_response(),
        Ok(Err(e)) => passthrough_failed(e),
        Err(e) => passthrough_failed(e),
    }
}

// GET /api/async-http
pub async fn async_http(state: Arc<AppState>, _req: Request) -> Response {
    match state.upstream.get(&state.settings.upstream_url).send().await {
        Ok(res) => Json(json!({ "ok": true, "status": res.status().as_u16() })).into_response(),
        Err(e) => passthrough_failed(e),
    }
}
