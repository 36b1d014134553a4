//! Radix-tree request router.
//!
//! One tree per HTTP method, O(path-length) lookup. Sub-routers can be
//! mounted under a prefix with [`Router::nest`], which is how the API is
//! served under `/api` beside the root pages.

use std::collections::HashMap;
use std::sync::Arc;

use matchit::Router as MatchitRouter;

use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::middleware::cors::Cors;

/// Result of matching a request against the routing table.
pub(crate) enum Route {
    Found(BoxedHandler, HashMap<String, String>),
    /// The path exists, but not for this method.
    MethodNotAllowed,
    NotFound,
}

/// The application router.
///
/// Build it once at startup and pass it to [`Server::serve`](crate::Server::serve).
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
    // Registration log, replayed by `nest` since matchit trees cannot be
    // iterated.
    table: Vec<(Method, String, BoxedHandler)>,
    cors: Option<Cors>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new(), table: Vec::new(), cors: None }
    }

    /// Register a handler for a method + path pair.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them.
    ///
    /// # Panics
    ///
    /// Panics if the path is malformed or conflicts with an existing route.
    /// Routes are static and registered at startup.
    pub fn on(self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.insert(method, path.to_owned(), handler.into_boxed_handler())
    }

    pub fn get(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Get, path, handler)
    }

    pub fn post(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Post, path, handler)
    }

    /// Mounts every route of `sub` under `prefix` (e.g. `"/api"`).
    ///
    /// The sub-router's CORS policy is not carried over; set it on the outer
    /// router.
    pub fn nest(self, prefix: &str, sub: Router) -> Self {
        let prefix = prefix.trim_end_matches('/');
        sub.table.into_iter().fold(self, |router, (method, path, handler)| {
            router.insert(method, format!("{prefix}{path}"), handler)
        })
    }

    /// Applies `cors` to every response and answers preflight requests.
    pub fn cors(mut self, cors: Cors) -> Self {
        self.cors = Some(cors);
        self
    }

    pub(crate) fn cors_policy(&self) -> Option<&Cors> {
        self.cors.as_ref()
    }

    fn insert(mut self, method: Method, path: String, handler: BoxedHandler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path.clone(), Arc::clone(&handler))
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self.table.push((method, path, handler));
        self
    }

    pub(crate) fn lookup(&self, method: Method, path: &str) -> Route {
        if let Some(matched) = self.routes.get(&method).and_then(|t| t.at(path).ok()) {
            let params = matched.params.iter()
                .map(|(k, v)| (k.to_owned(), v.to_owned()))
                .collect();
            return Route::Found(Arc::clone(matched.value), params);
        }

        if self.routes.values().any(|tree| tree.at(path).is_ok()) {
            Route::MethodNotAllowed
        } else {
            Route::NotFound
        }
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}
