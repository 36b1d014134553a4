//! # blockbench
//!
//! A demo HTTP service and a benchmark harness that together make the cost
//! of blocking request handlers visible.
//!
//! The service exposes two endpoints with the same contract: wait for a
//! fixed time, then answer 200. `sync-slow` waits on a blocking pool capped
//! to one worker; `async-slow` suspends on a timer. Fire five concurrent
//! requests at each with the [`harness`] and the first takes five times as
//! long.
//!
//! ## Layout
//!
//! - HTTP layer: [`Router`], [`Server`], [`Request`], [`Response`], hyper
//!   underneath. Radix-tree routing via [`matchit`], graceful shutdown.
//! - [`app`]: the demo routes, settings, and dry-run service clients.
//! - [`harness`]: bounded concurrent caller, progress spinner, comparator.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use blockbench::{Server, app::{self, AppState, Settings}};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let state = Arc::new(AppState::new(Settings::load()?)?);
//!     Server::bind("127.0.0.1:8000").await?.serve(app::router(state)).await?;
//!     Ok(())
//! }
//! ```

mod error;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod app;
pub mod handler;
pub mod harness;
pub mod health;
pub mod middleware;

pub use error::Error;
pub use handler::Handler;
pub use method::Method;
pub use request::Request;
pub use response::{ContentType, IntoResponse, Json, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
pub use status::Status;
