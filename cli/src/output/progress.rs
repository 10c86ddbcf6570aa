//! Progress indicators using indicatif

#![allow(clippy::expect_used)] // Templates are compile-time constants

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✓"])
            .template("  {spinner:.magenta} {msg}")
            .expect("valid template"),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// A spinner when `show` is true, otherwise nothing.
#[must_use]
pub fn maybe_spinner(show: bool, msg: &str) -> Option<ProgressBar> {
    show.then(|| spinner(msg))
}
