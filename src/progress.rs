//! Terminal progress bar for the archive download.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use subgrab_core::ProgressSink;

const BAR_TEMPLATE: &str = "{msg} [{bar:30}] {bytes}/{total_bytes} ({bytes_per_sec})";
const SPINNER_TEMPLATE: &str = "{spinner} {msg} {bytes} ({bytes_per_sec})";

/// Renders fetch progress with `indicatif`. Draws nothing when disabled.
pub(crate) struct BarProgress {
    enabled: bool,
    bar: Option<ProgressBar>,
}

impl BarProgress {
    pub(crate) fn new(enabled: bool) -> Self {
        Self { enabled, bar: None }
    }
}

impl ProgressSink for BarProgress {
    fn start(&mut self, label: &str, total: Option<u64>) {
        if !self.enabled {
            return;
        }
        let bar = if let Some(total) = total {
            let bar = ProgressBar::new(total);
            bar.set_style(
                ProgressStyle::with_template(BAR_TEMPLATE)
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("=> "),
            );
            bar
        } else {
            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::with_template(SPINNER_TEMPLATE)
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            spinner.enable_steady_tick(Duration::from_millis(100));
            spinner
        };
        bar.set_message(label.to_string());
        self.bar = Some(bar);
    }

    fn advance(&mut self, downloaded: u64) {
        if let Some(bar) = &self.bar {
            bar.set_position(downloaded);
        }
    }

    fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}
