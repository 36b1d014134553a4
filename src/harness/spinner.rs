//! Console liveness indicator shown while a batch runs.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Animation frames; the trailing empty string is the finished state.
const TICKS: [&str; 5] = ["|", "/", "-", "\\", ""];
const FRAME_INTERVAL: Duration = Duration::from_millis(100);

fn style() -> ProgressStyle {
    ProgressStyle::with_template("{msg} {spinner}")
        .expect("hardcoded template is valid")
        .tick_strings(&TICKS)
}

/// A running spinner task.
///
/// [`stop`](Spinner::stop) cancels it and waits until the line is cleared.
/// Dropping a `Spinner` without stopping it still cancels the task, so a
/// batch that unwinds never leaves it animating.
pub struct Spinner {
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl Spinner {
    pub fn start(target: ProgressDrawTarget, label: impl Into<String>) -> Self {
        Self::with_interval(target, label, FRAME_INTERVAL)
    }

    pub fn with_interval(target: ProgressDrawTarget, label: impl Into<String>, interval: Duration) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_draw_target(target);
        bar.set_style(style());
        bar.set_message(label.into());

        let cancel = CancellationToken::new();
        let task = tokio::spawn(animate(Line(bar), interval, cancel.clone()));
        Self { cancel, task: Some(task) }
    }

    /// Cancels the animation and waits for it to clean up its line.
    ///
    /// A panicked or already-finished task is not an error here.
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Owns the bar while the animation runs; clears it on every exit.
struct Line(ProgressBar);

impl Drop for Line {
    fn drop(&mut self) {
        self.0.finish_and_clear();
    }
}

// Frames advance on the task's own timer rather than a steady tick, so
// cancellation is seen at every frame boundary.
async fn animate(line: Line, interval: Duration, cancel: CancellationToken) {
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            () = tokio::time::sleep(interval) => line.0.tick(),
        }
    }
}
