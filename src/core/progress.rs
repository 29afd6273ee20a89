//! Progress bar management and run event reporting
//!
//! The driver and the writer never touch the logger directly. They report
//! through a [`Reporter`] handed to them, so the sink (and its verbosity) is
//! decided once at startup and tests can record events instead.

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

use super::config::{PROGRESS_CHARS, PROGRESS_MESSAGE, PROGRESS_TEMPLATE};
use crate::rsync::{Failure, FailureKind};

/// Receives progress and per-candidate events from an enumeration run
pub trait Reporter: Send + Sync {
    /// Called once before the first probe with the number of candidates
    fn begin(&self, _total: u64) {}

    /// One candidate has been fully processed
    fn advance(&self) {}

    fn found(&self, path: &str);

    fn probe_failed(&self, path: &str, failure: &Failure);

    fn fetched(&self, path: &str, destination: &str);

    fn fetch_failed(&self, path: &str, failure: &Failure);

    /// Results were persisted
    fn saved(&self, output: &Path, count: usize);

    /// The run ended, either exhausted or interrupted
    fn finish(&self) {}
}

/// Creates a progress bar style configuration
/// Returns a ProgressStyle configured with the application's visual styling
pub(crate) fn create_progress_style() -> Result<ProgressStyle> {
    Ok(ProgressStyle::default_bar()
        .template(PROGRESS_TEMPLATE)?
        .progress_chars(PROGRESS_CHARS))
}

/// Creates the processed/total progress bar; hidden automatically when stderr is not a terminal
pub(crate) fn create_progress_bar(total: u64) -> Result<ProgressBar> {
    let pb = ProgressBar::new(total);
    pb.set_style(create_progress_style()?);
    pb.set_message(PROGRESS_MESSAGE);
    Ok(pb)
}

/// Reporter that writes through the `log` facade and drives a progress bar
pub struct LogReporter {
    progress: ProgressBar,
}

impl LogReporter {
    pub fn new() -> Result<Self> {
        Ok(Self {
            progress: create_progress_bar(0)?,
        })
    }

    /// Logs while the bar is cleared so lines do not interleave with it
    fn emit(&self, f: impl FnOnce()) {
        self.progress.suspend(f);
    }
}

/// rsync answers most misses with a failure status, so those stay at debug.
/// Timeouts and an unreachable target are surfaced at warn.
fn probe_failure_level(failure: &Failure) -> log::Level {
    if failure.is_timeout() || failure.is_unreachable() {
        log::Level::Warn
    } else {
        log::Level::Debug
    }
}

impl Reporter for LogReporter {
    fn begin(&self, total: u64) {
        self.progress.set_length(total);
        self.progress.set_position(0);
    }

    fn advance(&self) {
        self.progress.inc(1);
    }

    fn found(&self, path: &str) {
        self.emit(|| log::info!("  [+] Found: {path}"));
    }

    fn probe_failed(&self, path: &str, failure: &Failure) {
        let level = probe_failure_level(failure);
        match failure.kind {
            FailureKind::Timeout => {
                self.emit(|| log::log!(level, "  [!] Probe timed out: {path} ({})", failure.message))
            }
            FailureKind::ExecutionFailure => {
                self.emit(|| log::log!(level, "  [-] Probe failed: {path} ({})", failure.message))
            }
        }
    }

    fn fetched(&self, path: &str, destination: &str) {
        self.emit(|| log::info!("  [↓] Downloaded: {path} -> {destination}"));
    }

    fn fetch_failed(&self, path: &str, failure: &Failure) {
        self.emit(|| log::error!("  [x] Download failed {path}: {failure}"));
    }

    fn saved(&self, output: &Path, count: usize) {
        self.emit(|| log::info!("💾 Saved {count} found paths to {}", output.display()));
    }

    fn finish(&self) {
        self.progress.finish_and_clear();
    }
}

/// Reporter that discards every event
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn found(&self, _path: &str) {}
    fn probe_failed(&self, _path: &str, _failure: &Failure) {}
    fn fetched(&self, _path: &str, _destination: &str) {}
    fn fetch_failed(&self, _path: &str, _failure: &Failure) {}
    fn saved(&self, _output: &Path, _count: usize) {}
}
