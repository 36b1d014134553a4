//! Server infrastructure errors.

use std::fmt;
use std::io;

/// The error type returned by the server's fallible operations.
///
/// Handler failures (404, 422, 503, ...) are HTTP [`Response`](crate::Response)
/// values, never `Error`s. This type only covers the listener: resolving and
/// binding the address, and inspecting the socket.
#[derive(Debug)]
pub enum Error {
    Bind { addr: String, source: io::Error },
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bind { addr, source } => write!(f, "failed to bind {addr}: {source}"),
            Self::Io(e) => write!(f, "io: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Bind { source, .. } => Some(source),
            Self::Io(e) => Some(e),
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
