//! Middleware applied by the server around every dispatched request.
//!
//! - [`trace`]: per-request span with method and path, plus a completion
//!   event carrying status and latency.
//! - [`cors`]: cross-origin headers and preflight handling, opted into with
//!   [`Router::cors`](crate::Router::cors).

pub mod cors;
pub mod trace;
