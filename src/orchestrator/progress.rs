// file: src/orchestrator/progress.rs
// description: terminal spinner shown while a query is pending
// reference: uses indicatif for progress reporting

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

pub struct PendingSpinner {
    bar: ProgressBar,
}

impl PendingSpinner {
    pub fn start(message: &str, colored: bool) -> Self {
        let bar = ProgressBar::new_spinner();
        let template = if colored {
            "{spinner:.green} [{elapsed}] {msg}"
        } else {
            "{spinner} [{elapsed}] {msg}"
        };

        if let Ok(style) = ProgressStyle::default_spinner().template(template) {
            bar.set_style(style);
        }
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(120));

        Self { bar }
    }

    /// Spinner that never draws, for non-interactive output.
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    pub fn set_message(&self, message: String) {
        self.bar.set_message(message);
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }

    pub fn is_finished(&self) -> bool {
        self.bar.is_finished()
    }
}

impl Drop for PendingSpinner {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}
