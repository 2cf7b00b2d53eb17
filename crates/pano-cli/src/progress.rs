//! Progress bars for action execution and metadata scans
//!
//! Bars are hidden until work starts and draw to stderr, so they never mix
//! with command output on stdout.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use pano_core::{Action, Progress};
use pano_remote::{ScanProgress, TableScan};

fn bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:25.cyan/dim}] {pos}/{len} {msg:.dim}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
}

fn start_bar(bar: &ProgressBar, total: usize) {
    bar.set_length(total as u64);
    bar.set_style(bar_style());
    bar.set_draw_target(ProgressDrawTarget::stderr());
}

/// Progress of an action set being applied.
pub struct ActionBar {
    bar: ProgressBar,
}

impl ActionBar {
    pub fn new() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }
}

impl Default for ActionBar {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress for ActionBar {
    fn start(&self, total: usize) {
        start_bar(&self.bar, total);
    }

    fn advance(&self, action: &Action) {
        self.bar.set_message(action.description().to_string());
        self.bar.inc(1);
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

/// Progress of tables being scanned; shared by the scan workers.
pub struct ScanBar {
    bar: ProgressBar,
}

impl ScanBar {
    pub fn new() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }
}

impl Default for ScanBar {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanProgress for ScanBar {
    fn start(&self, tables: usize) {
        start_bar(&self.bar, tables);
    }

    fn table_finished(&self, scan: &TableScan) {
        self.bar.set_message(scan.table().to_string());
        self.bar.inc(1);
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
