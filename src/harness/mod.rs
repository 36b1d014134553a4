//! Benchmark harness: measures how blocking and non-blocking endpoints
//! behave under the same concurrent load.
//!
//! - [`Caller`] fires N calls at one endpoint with at most C in flight and
//!   times the whole batch.
//! - [`Spinner`] animates the console while a batch runs.
//! - [`Comparator`] runs batches for a list of endpoints, one after another,
//!   and reports each.
//!
//! Per-call failures are counted, never raised. Only run-level problems
//! (bad endpoint list, bad base URL, C = 0) are [`HarnessError`]s.

mod caller;
mod comparator;
mod config;
mod console;
mod endpoint;
mod error;
mod result;
mod spinner;

pub use caller::{Caller, EXPECTED_STATUS};
pub use comparator::Comparator;
pub use config::HarnessConfig;
pub use console::Console;
pub use endpoint::Endpoint;
pub use error::HarnessError;
pub use result::{BatchResult, CallOutcome, FailureBreakdown, FailureKind};
pub use spinner::Spinner;
