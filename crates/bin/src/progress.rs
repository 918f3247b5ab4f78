//! Progress bar for long rolling runs.

use fixcov::Tensor;
use fixcov::covariance::{TracingObserver, WindowObserver};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Advances an `indicatif` bar once per window and forwards to tracing
pub(crate) struct ProgressObserver {
    bar: ProgressBar,
    tracing: TracingObserver,
}

impl ProgressObserver {
    pub(crate) fn new(windows: usize) -> Self {
        let bar = ProgressBar::new(windows as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓░"),
        );
        bar.enable_steady_tick(Duration::from_millis(100));
        Self {
            bar,
            tracing: TracingObserver,
        }
    }

    pub(crate) fn finish(&self, succeeded: bool) {
        if succeeded {
            self.bar
                .finish_with_message(format!("Computed {} windows", self.bar.position()));
        } else {
            self.bar.abandon_with_message("Failed!");
        }
    }
}

impl WindowObserver for ProgressObserver {
    fn on_window(&mut self, start: usize, covariance: &Tensor) {
        self.tracing.on_window(start, covariance);
        self.bar.inc(1);
    }
}
