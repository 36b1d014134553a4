//! HTTP status codes used by the service.
//!
//! ```rust
//! use blockbench::{Response, Status};
//!
//! Response::status(Status::NoContent);
//!
//! Response::builder()
//!     .status(Status::Created)
//!     .json(br#"{"id":1}"#.to_vec());
//! ```

/// Status codes the service emits.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[allow(clippy::enum_variant_names)]
pub enum Status {
    // ── 2xx ──────────────────────────────────────────────────────────────────
    Ok,                   // 200
    Created,              // 201
    NoContent,            // 204

    // ── 4xx ──────────────────────────────────────────────────────────────────
    BadRequest,           // 400
    Forbidden,            // 403
    NotFound,             // 404
    MethodNotAllowed,     // 405
    UnprocessableContent, // 422

    // ── 5xx ──────────────────────────────────────────────────────────────────
    InternalServerError,  // 500
    BadGateway,           // 502
    ServiceUnavailable,   // 503
}

impl From<Status> for u16 {
    fn from(s: Status) -> u16 {
        match s {
            Status::Ok                   => 200,
            Status::Created              => 201,
            Status::NoContent            => 204,
            Status::BadRequest           => 400,
            Status::Forbidden            => 403,
            Status::NotFound             => 404,
            Status::MethodNotAllowed     => 405,
            Status::UnprocessableContent => 422,
            Status::InternalServerError  => 500,
            Status::BadGateway           => 502,
            Status::ServiceUnavailable   => 503,
        }
    }
}
