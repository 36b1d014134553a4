//! Sequential batch comparison.

use std::sync::Arc;

use indicatif::ProgressDrawTarget;
use tracing::{info, warn};

use super::caller::Caller;
use super::console::Console;
use super::endpoint::Endpoint;
use super::error::HarnessError;
use super::result::BatchResult;
use super::spinner::Spinner;

type IndicatorTarget = Arc<dyn Fn() -> ProgressDrawTarget + Send + Sync>;

/// Runs one batch per endpoint, strictly one after another, so the timings
/// are not confounded by each other.
///
/// The report goes to `console`; the spinner draws on stderr (or wherever
/// [`indicator`](Comparator::indicator) points it), never into the report.
pub struct Comparator {
    caller: Caller,
    console: Console,
    indicator: IndicatorTarget,
    quiet: bool,
}

impl Comparator {
    pub fn new(caller: Caller, console: Console) -> Self {
        Self {
            caller,
            console,
            indicator: Arc::new(ProgressDrawTarget::stderr),
            quiet: false,
        }
    }

    /// Where each batch's spinner draws. Called once per batch.
    pub fn indicator(mut self, target: impl Fn() -> ProgressDrawTarget + Send + Sync + 'static) -> Self {
        self.indicator = Arc::new(target);
        self
    }

    /// Suppresses the per-batch summary lines; the spinner still runs.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Runs a batch against `endpoint` with a spinner beside it.
    ///
    /// Returns only once the spinner has been cancelled and has cleared its
    /// line.
    pub async fn run_batch(&self, endpoint: &Endpoint) -> BatchResult {
        let spinner = Spinner::start((self.indicator)(), format!("Running {endpoint}"));
        let result = self.caller.run(endpoint).await;
        spinner.stop().await;
        result
    }

    /// Validates every endpoint up front, then runs the batches in order.
    /// Results come back in the same order as `endpoints`.
    pub async fn compare<S: AsRef<str>>(&self, endpoints: &[S]) -> Result<Vec<BatchResult>, HarnessError> {
        let endpoints = Endpoint::parse_all(endpoints)?;
        if endpoints.is_empty() {
            return Err(HarnessError::NoEndpoints);
        }

        let mut results = Vec::with_capacity(endpoints.len());
        for endpoint in &endpoints {
            let result = self.run_batch(endpoint).await;
            info!(
                endpoint = %endpoint,
                succeeded = result.requests_succeeded(),
                sent = result.requests_sent(),
                elapsed_s = result.elapsed_seconds(),
                "batch complete"
            );
            if !self.quiet {
                self.report(&result);
            }
            results.push(result);
        }
        Ok(results)
    }

    fn report(&self, result: &BatchResult) {
        let text = format!("{}\n{}\n", result.summary_line(), result.timing_line());
        if let Err(e) = self.console.line(&text) {
            warn!("failed to write batch report: {e}");
        }
    }
}
