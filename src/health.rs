//! Liveness and readiness probe handlers.
//!
//! ```rust,no_run
//! use blockbench::{Router, health};
//!
//! let app = Router::new()
//!     .get("/healthz", health::liveness)
//!     .get("/readyz", health::readiness);
//! ```
//!
//! The API's own `/api/health` reports the application name; these two are
//! dependency-free and meant for orchestrators.

use crate::{Request, Response};

/// Always `200 OK` with body `"ok"`.
pub async fn liveness(_req: Request) -> Response {
    Response::text("ok")
}

/// `200 OK` with body `"ready"`. The service holds no connections that need
/// warming, so readiness equals liveness.
pub async fn readiness(_req: Request) -> Response {
    Response::text("ready")
}
