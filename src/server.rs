//! HTTP server and graceful shutdown.
//!
//! On shutdown the server:
//! 1. Stops calling `listener.accept()`, so no new connections are made.
//! 2. Asks every open connection to finish its in-flight request and close.
//! 3. Returns from [`Server::serve`].
//!
//! [`Server::serve`] waits for SIGTERM or Ctrl-C. Tests and embedders use
//! [`Server::serve_with_shutdown`] with their own signal.

use std::collections::HashMap;
use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, error, info, warn};

use crate::error::Error;
use crate::method::Method;
use crate::middleware::cors::Cors;
use crate::middleware::trace;
use crate::request::Request;
use crate::response::Response;
use crate::router::{Route, Router};
use crate::status::Status;

/// The HTTP server, bound to a listening socket.
pub struct Server {
    listener: TcpListener,
}

impl Server {
    /// Binds a listener on `addr` (`host:port`, hostnames resolved). Port `0`
    /// picks a free port; read it back with [`local_addr`](Server::local_addr).
    ///
    /// ```rust,no_run
    /// # async fn run() -> Result<(), blockbench::Error> {
    /// let server = blockbench::Server::bind("127.0.0.1:8000").await?;
    /// # Ok(()) }
    /// ```
    pub async fn bind(addr: &str) -> Result<Self, Error> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| Error::Bind { addr: addr.to_owned(), source })?;
        Ok(Self { listener })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, Error> {
        Ok(self.listener.local_addr()?)
    }

    /// Serves `router` until SIGTERM or Ctrl-C, then drains in-flight
    /// connections.
    pub async fn serve(self, router: Router) -> Result<(), Error> {
        self.serve_with_shutdown(router, shutdown_signal()).await
    }

    /// Serves `router` until `signal` resolves, then drains in-flight
    /// connections.
    pub async fn serve_with_shutdown(
        self,
        router: Router,
        signal: impl Future<Output = ()>,
    ) -> Result<(), Error> {
        let addr = self.local_addr()?;
        let router = Arc::new(router);

        info!(%addr, "blockbench listening");

        let mut tasks = tokio::task::JoinSet::new();
        let draining = CancellationToken::new();

        tokio::pin!(signal);

        loop {
            tokio::select! {
                // Check shutdown first so a signal stops accepting immediately,
                // even with connections queued.
                biased;

                () = &mut signal => {
                    info!(in_flight = tasks.len(), "shutdown signal received, draining connections");
                    draining.cancel();
                    break;
                }

                res = self.listener.accept() => {
                    let (stream, remote_addr) = match res {
                        Ok(v) => v,
                        Err(e) => {
                            error!("accept error: {e}");
                            continue;
                        }
                    };

                    let router = Arc::clone(&router);
                    let io = TokioIo::new(stream);

                    let draining = draining.clone();

                    tasks.spawn(async move {
                        // Called once per request on the connection.
                        let svc = service_fn(move |req| {
                            let router = Arc::clone(&router);
                            async move { dispatch(router, req).await }
                        });

                        let builder = ConnBuilder::new(TokioExecutor::new());
                        let conn = builder.serve_connection(io, svc);
                        tokio::pin!(conn);

                        // Idle keep-alive connections would otherwise hold the
                        // drain open forever.
                        let res = tokio::select! {
                            res = conn.as_mut() => res,
                            () = draining.cancelled() => {
                                conn.as_mut().graceful_shutdown();
                                conn.await
                            }
                        };
                        if let Err(e) = res {
                            warn!(peer = %remote_addr, "connection error: {e}");
                        }
                    });
                }

                // Reap finished connection tasks so the set stays bounded.
                Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
            }
        }

        while tasks.join_next().await.is_some() {}

        info!("blockbench stopped");
        Ok(())
    }
}

// ── Request dispatch ──────────────────────────────────────────────────────────

/// Routes one request and produces one response. All failures become HTTP
/// responses, so hyper never sees an error.
async fn dispatch(
    router: Arc<Router>,
    req: hyper::Request<Incoming>,
) -> Result<http::Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let span = trace::span(req.method(), req.uri().path());

    let response = route(&router, req).instrument(span.clone()).await;

    span.in_scope(|| trace::finish(response.status_code(), started));
    Ok(response.into_inner())
}

async fn route(router: &Router, req: hyper::Request<Incoming>) -> Response {
    let Ok(method) = Method::try_from(req.method()) else {
        return Response::status(Status::MethodNotAllowed);
    };

    let (parts, body) = req.into_parts();
    let body = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            warn!("failed to read request body: {e}");
            return Response::status(Status::BadRequest);
        }
    };

    let (target, params) = match router.lookup(method, parts.uri.path()) {
        Route::Found(handler, params) => (Ok(handler), params),
        Route::MethodNotAllowed => (Err(Status::MethodNotAllowed), HashMap::new()),
        Route::NotFound => (Err(Status::NotFound), HashMap::new()),
    };
    let req = Request::new(method, &parts, body, params);

    let cors = router.cors_policy();
    if let Some(cors) = cors {
        if Cors::is_preflight(&req) {
            return cors.preflight(&req);
        }
    }

    let origin = req.header("origin").map(str::to_owned);
    let mut response = match target {
        Ok(handler) => handler.call(req).await,
        Err(status) => Response::status(status),
    };

    if let Some(cors) = cors {
        cors.apply(origin.as_deref(), &mut response);
    }
    response
}

// ── Shutdown signal ───────────────────────────────────────────────────────────

/// Resolves on the first SIGTERM or SIGINT (Ctrl-C). On Windows only Ctrl-C
/// is available. A handler that fails to install never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to install Ctrl-C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c   => {}
        () = sigterm  => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn binds_by_hostname() {
        let server = Server::bind("localhost:0").await.unwrap();
        assert!(server.local_addr().unwrap().ip().is_loopback());
    }

    #[tokio::test]
    async fn bad_address_names_the_address() {
        let err = Server::bind("127.0.0.1:99999").await.err().unwrap();
        assert!(matches!(&err, Error::Bind { addr, .. } if addr == "127.0.0.1:99999"));
        assert!(err.to_string().starts_with("failed to bind 127.0.0.1:99999"));
    }
}
