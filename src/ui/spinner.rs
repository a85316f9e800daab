//! Animated spinner for long installs.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use super::theme::{Theme, Tone};
use super::SpinnerHandle;

const TICKS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// An [`indicatif`] spinner that ends on a single styled status line.
pub struct ProgressSpinner {
    bar: ProgressBar,
    theme: Theme,
}

impl ProgressSpinner {
    pub fn new(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars(TICKS)
            .template("  {spinner:.cyan} {msg} {elapsed:.dim}")
        {
            bar.set_style(style);
        }
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self {
            bar,
            theme: Theme::detect(),
        }
    }

    fn end(&mut self, tone: Tone, msg: &str) {
        if let Ok(style) = ProgressStyle::with_template("  {msg}") {
            self.bar.set_style(style);
        }
        self.bar.finish_with_message(self.theme.line(tone, msg));
    }
}

impl SpinnerHandle for ProgressSpinner {
    fn set_message(&mut self, msg: &str) {
        self.bar.set_message(msg.to_string());
    }

    fn finish_success(&mut self, msg: &str) {
        self.end(Tone::Success, msg);
    }

    fn finish_error(&mut self, msg: &str) {
        self.end(Tone::Error, msg);
    }

    fn finish_skipped(&mut self, msg: &str) {
        self.end(Tone::Skipped, msg);
    }
}
