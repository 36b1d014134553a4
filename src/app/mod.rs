//! The demo service: a root page plus the API mounted under `/api`.
//!
//! `sync-slow` and `async-slow` are the endpoint pair the benchmark harness
//! compares; the rest are illustrative endpoints around an in-memory user
//! store and dry-run wrappers of external services.

mod error;
mod handlers;
mod models;
mod pool;
pub mod services;
mod settings;
mod state;
mod store;

pub use error::AppError;
pub use models::{FieldError, User, UserCreate};
pub use pool::BlockingPool;
pub use settings::{CONFIG_FILE, Settings};
pub use state::AppState;
pub use store::{MemoryUserRepository, UserRepository};

use std::sync::Arc;

use crate::handler::with_state;
use crate::health;
use crate::middleware::cors::Cors;
use crate::router::Router;

/// Mount path of the API.
pub const API_PREFIX: &str = "/api";

/// Builds the full routing table.
pub fn router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .get("/health",                   with_state(&state, handlers::health))
        .post("/users",                   with_state(&state, handlers::create_user))
        .get("/users",                    with_state(&state, handlers::list_users))
        .get("/sync-slow",                with_state(&state, handlers::sync_slow))
        .get("/async-slow",               with_state(&state, handlers::async_slow))
        .post("/background",              with_state(&state, handlers::background))
        .post("/runpod/echo",             with_state(&state, handlers::runpod_echo))
        .post("/huggingface/sentiment",   with_state(&state, handlers::sentiment))
        .get("/fake-remote",              handlers::fake_remote)
        .get("/sync-http",                with_state(&state, handlers::sync_http))
        .get("/async-http",               with_state(&state, handlers::async_http));

    Router::new()
        .get("/",        handlers::home)
        .get("/healthz", health::liveness)
        .get("/readyz",  health::readiness)
        .nest(API_PREFIX, api)
        .cors(Cors::permissive())
}
