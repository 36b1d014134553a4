//! Cross-origin resource sharing.

use crate::request::Request;
use crate::response::Response;

/// CORS policy.
///
/// With `allow_credentials`, browsers reject a literal `*` origin, so a
/// wildcard policy echoes the request's `Origin` instead.
#[derive(Clone, Debug)]
pub struct Cors {
    allow_origins: Vec<String>,
    allow_credentials: bool,
    allow_methods: String,
}

impl Cors {
    /// Any origin, any method, any header, credentials allowed.
    pub fn permissive() -> Self {
        Self {
            allow_origins: vec!["*".to_owned()],
            allow_credentials: true,
            allow_methods: "DELETE, GET, HEAD, OPTIONS, PATCH, POST, PUT".to_owned(),
        }
    }

    fn allowed_origin<'a>(&self, origin: &'a str) -> Option<&'a str> {
        let any = self.allow_origins.iter().any(|o| o == "*");
        if any || self.allow_origins.iter().any(|o| o == origin) {
            Some(origin)
        } else {
            None
        }
    }

    pub(crate) fn is_preflight(req: &Request) -> bool {
        req.method() == crate::Method::Options
            && req.header("origin").is_some()
            && req.header("access-control-request-method").is_some()
    }

    /// Answers a preflight request. Disallowed origins get a bare 400.
    pub(crate) fn preflight(&self, req: &Request) -> Response {
        let Some(origin) = req.header("origin").and_then(|o| self.allowed_origin(o)) else {
            return Response::builder().status(crate::Status::BadRequest).text("Disallowed CORS origin");
        };

        let mut builder = Response::builder()
            .header("access-control-allow-origin", origin)
            .header("access-control-allow-methods", &self.allow_methods)
            .header("access-control-max-age", "600")
            .header("vary", "Origin");
        if let Some(headers) = req.header("access-control-request-headers") {
            builder = builder.header("access-control-allow-headers", headers);
        }
        if self.allow_credentials {
            builder = builder.header("access-control-allow-credentials", "true");
        }
        builder.text("OK")
    }

    /// Decorates a simple (non-preflight) response.
    pub(crate) fn apply(&self, origin: Option<&str>, res: &mut Response) {
        let Some(origin) = origin.and_then(|o| self.allowed_origin(o)) else {
            return;
        };
        res.push_header("access-control-allow-origin", origin);
        res.push_header("vary", "Origin");
        if self.allow_credentials {
            res.push_header("access-control-allow-credentials", "true");
        }
    }
}
