use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

/// Where the harness writes its report: stdout in the binary, a buffer in
/// tests. Progress drawing never goes here, so the report stays parseable.
#[derive(Clone)]
pub struct Console {
    out: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl Console {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    pub fn new(out: impl Write + Send + 'static) -> Self {
        Self { out: Arc::new(Mutex::new(Box::new(out))) }
    }

    /// Writes `s` and flushes.
    pub fn write(&self, s: &str) -> io::Result<()> {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        out.write_all(s.as_bytes())?;
        out.flush()
    }

    pub fn line(&self, s: &str) -> io::Result<()> {
        self.write(&format!("{s}\n"))
    }
}
