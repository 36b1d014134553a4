//! Request tracing.

use std::time::Instant;

use tracing::{Span, info, info_span};

/// Span wrapping one request's handler future.
pub(crate) fn span(method: &http::Method, path: &str) -> Span {
    info_span!("request", method = %method, path = %path)
}

/// Emits the completion event inside the request span.
pub(crate) fn finish(status: u16, started: Instant) {
    let latency_ms = started.elapsed().as_secs_f64() * 1000.0;
    info!(status, latency_ms, "request completed");
}
