use std::time::Duration;

use serde::Serialize;

use super::endpoint::Endpoint;

/// Why a single call did not succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Timeout,
    Connect,
    /// Reached the server, got something other than the expected status.
    Status(u16),
    /// Anything else: request building, redirects, body decoding.
    Other,
}

/// Outcome of one call within a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallOutcome {
    Succeeded,
    Failed(FailureKind),
}

/// Failure counts by cause. Sums to `requests_sent - requests_succeeded`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FailureBreakdown {
    pub timeouts: usize,
    pub connect: usize,
    pub status: usize,
    pub other: usize,
}

impl FailureBreakdown {
    pub fn total(&self) -> usize {
        self.timeouts + self.connect + self.status + self.other
    }

    fn record(&mut self, kind: FailureKind) {
        match kind {
            FailureKind::Timeout => self.timeouts += 1,
            FailureKind::Connect => self.connect += 1,
            FailureKind::Status(_) => self.status += 1,
            FailureKind::Other => self.other += 1,
        }
    }
}

/// Aggregate of one batch. Built once from the call outcomes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchResult {
    endpoint_name: String,
    requests_sent: usize,
    requests_succeeded: usize,
    elapsed_seconds: f64,
    failures: FailureBreakdown,
}

impl BatchResult {
    pub fn from_outcomes(endpoint: &Endpoint, outcomes: &[CallOutcome], elapsed: Duration) -> Self {
        let mut failures = FailureBreakdown::default();
        let mut succeeded = 0;
        for outcome in outcomes {
            match outcome {
                CallOutcome::Succeeded => succeeded += 1,
                CallOutcome::Failed(kind) => failures.record(*kind),
            }
        }
        Self {
            endpoint_name: endpoint.to_string(),
            requests_sent: outcomes.len(),
            requests_succeeded: succeeded,
            elapsed_seconds: elapsed.as_secs_f64(),
            failures,
        }
    }

    pub fn endpoint_name(&self) -> &str { &self.endpoint_name }
    pub fn requests_sent(&self) -> usize { self.requests_sent }
    pub fn requests_succeeded(&self) -> usize { self.requests_succeeded }
    pub fn requests_failed(&self) -> usize { self.requests_sent - self.requests_succeeded }
    pub fn elapsed_seconds(&self) -> f64 { self.elapsed_seconds }
    pub fn failures(&self) -> FailureBreakdown { self.failures }

    /// `sync-slow: 5/5 succeeded`
    pub fn summary_line(&self) -> String {
        format!("{}: {}/{} succeeded", self.endpoint_name, self.requests_succeeded, self.requests_sent)
    }

    /// `sync-slow took 10.02s`
    pub fn timing_line(&self) -> String {
        format!("{} took {:.2}s", self.endpoint_name, self.elapsed_seconds)
    }
}
