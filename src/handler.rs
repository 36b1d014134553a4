//! Handler trait, type erasure, and shared-state binding.
//!
//! The router stores handlers of different concrete types in one table, so
//! each is erased behind `Arc<dyn ErasedHandler>`:
//!
//! ```text
//! async fn health(req: Request) -> Response   ← user code
//!        ↓ router.on(Method::Get, "/health", health)
//! Arc::new(FnHandler(health))                 ← BoxedHandler
//!        ↓ at request time
//! Box::pin(async { health(req).await.into_response() })
//! ```
//!
//! Handlers that need application state are bound with [`with_state`].

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// A boxed future resolving to a [`Response`]. `Send + 'static` so the
/// connection task can be moved across worker threads.
pub(crate) type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

#[doc(hidden)]
pub trait ErasedHandler {
    fn call(&self, req: Request) -> BoxFuture;
}

#[doc(hidden)]
pub type BoxedHandler = Arc<dyn ErasedHandler + Send + Sync + 'static>;

/// Implemented for every valid route handler.
///
/// Satisfied automatically by any `Fn(Request) -> impl Future<Output = impl IntoResponse>`;
/// sealed so only that blanket impl exists.
pub trait Handler: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler;
}

mod private {
    pub trait Sealed {}
}

impl<F, Fut, R> private::Sealed for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(FnHandler(self))
    }
}

struct FnHandler<F>(F);

impl<F, Fut, R> ErasedHandler for FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request) -> BoxFuture {
        let fut = (self.0)(req);
        Box::pin(async move { fut.await.into_response() })
    }
}

/// Binds shared state to a two-argument handler, producing a [`Handler`].
///
/// ```rust,no_run
/// # use std::sync::Arc;
/// # use blockbench::{handler::with_state, Method, Request, Response, Router};
/// struct Counter;
/// async fn show(_state: Arc<Counter>, _req: Request) -> Response { Response::text("0") }
///
/// let state = Arc::new(Counter);
/// Router::new().on(Method::Get, "/count", with_state(&state, show));
/// ```
pub fn with_state<S, F, Fut, R>(
    state: &Arc<S>,
    f: F,
) -> impl Fn(Request) -> Fut + Send + Sync + 'static + use<S, F, Fut, R>
where
    S: Send + Sync + 'static,
    F: Fn(Arc<S>, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    let state = Arc::clone(state);
    move |req| f(Arc::clone(&state), req)
}
