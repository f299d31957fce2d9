//! Progress display for long-running commands
//!
//! Thin wrappers over indicatif: a spinner while the listing is fetched and
//! a bar over trip files while the catalog is processed. Both are hidden in
//! quiet mode.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::app::coordinator::TripFileReport;

const TICK_INTERVAL: Duration = Duration::from_millis(120);

/// Spinner for a single step of unknown length
pub fn spinner(message: impl Into<String>, quiet: bool) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if quiet {
        spinner.set_draw_target(ProgressDrawTarget::hidden());
    }
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["◐", "◓", "◑", "◒", "●"]),
    );
    spinner.set_message(message.into());
    spinner.enable_steady_tick(TICK_INTERVAL);
    spinner
}

/// Progress over the trip files of one `catalog process` run
pub struct FileProgress {
    bar: ProgressBar,
}

impl FileProgress {
    pub fn new(total_files: usize, quiet: bool) -> Self {
        let bar = ProgressBar::new(total_files as u64);
        if quiet {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        }
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        bar.enable_steady_tick(TICK_INTERVAL);
        Self { bar }
    }

    /// Record a finished file
    pub fn file_done(&self, report: &TripFileReport) {
        let name = report
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.bar.set_message(format!(
            "{} (+{} stations, +{} rides)",
            name, report.merge.new_stations, report.ledger.appended
        ));
        self.bar.inc(1);
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
