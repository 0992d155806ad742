//! Spinners and the per-group progress bar

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

const SPINNER_TICKS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

fn spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("    {spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars(SPINNER_TICKS)
}

fn group_bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("    {msg} [{bar:40.cyan/blue}] {pos}/{len} groups ({per_sec}, {eta})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓▒░")
}

/// Spinner for reads whose size is not known up front
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner()
        .with_style(spinner_style())
        .with_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Bar advanced once per reconciled duplicate group
pub fn create_group_progress_bar(total_groups: usize) -> ProgressBar {
    ProgressBar::new(total_groups as u64)
        .with_style(group_bar_style())
        .with_message("Reconciling")
}

pub fn finish_with_success(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("✅ {}", message));
}

/// Leave the bar at its current position, marking the run as failed
pub fn abandon_with_error(pb: &ProgressBar, message: &str) {
    pb.abandon_with_message(format!("❌ {} at group {}", message, pb.position() + 1));
}
