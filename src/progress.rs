use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Receives progress notifications from the prober, once per batch.
pub trait BatchObserver {
    fn on_start(&mut self, _total_batches: usize, _total_actions: usize) {}

    fn on_batch(&mut self, completed: usize, total_batches: usize);

    fn on_finish(&mut self) {}
}

/// Observer that ignores every notification.
#[derive(Debug, Default)]
pub struct NoProgress;

impl BatchObserver for NoProgress {
    fn on_batch(&mut self, _completed: usize, _total_batches: usize) {}
}

/// Terminal progress bar counting completed batches.
///
/// The bar stays hidden until the first batch is about to be submitted, so
/// nothing is drawn while the principal and catalog are still being resolved.
pub struct BatchProgressBar {
    bar: ProgressBar,
    enabled: bool,
}

impl BatchProgressBar {
    pub fn new(enabled: bool) -> Self {
        let style = ProgressStyle::with_template(
            "{spinner} {msg} [{bar:40.cyan/blue}] {pos}/{len} batches [{elapsed_precise}]",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
        let bar = ProgressBar::hidden().with_style(style).with_message("Simulating");
        Self { bar, enabled }
    }
}

impl BatchObserver for BatchProgressBar {
    fn on_start(&mut self, total_batches: usize, total_actions: usize) {
        self.bar.set_length(total_batches as u64);
        self.bar.set_message(format!("Simulating {total_actions} actions"));
        if self.enabled {
            self.bar.set_draw_target(ProgressDrawTarget::stderr());
            self.bar.enable_steady_tick(Duration::from_millis(500));
        }
    }

    fn on_batch(&mut self, completed: usize, _total_batches: usize) {
        self.bar.set_position(completed as u64);
    }

    fn on_finish(&mut self) {
        self.bar.finish_and_clear();
    }
}

// An interrupted run is followed by an error line; leave no half-drawn bar above it.
impl Drop for BatchProgressBar {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}
