//! Statistics tracking for enumeration runs

use std::time::Duration;

use crate::rsync::{FetchOutcome, ProbeOutcome};

/// Counters for one enumeration run
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Candidates scheduled after exclusion filtering
    pub total: u64,
    /// Wordlist entries dropped by exclude substrings
    pub excluded_entries: u64,
    pub processed: u64,
    pub found: u64,
    pub not_found: u64,
    pub probe_failures: u64,
    pub probe_timeouts: u64,
    pub fetched: u64,
    pub fetch_failures: u64,
    pub fetch_timeouts: u64,
}

impl RunStats {
    /// Creates a new statistics tracker with all counters initialized to zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates counters from a probe outcome
    pub fn record_probe(&mut self, outcome: &ProbeOutcome) {
        match outcome {
            ProbeOutcome::Found(_) => self.found += 1,
            ProbeOutcome::NotFound => self.not_found += 1,
            ProbeOutcome::Failed(failure) if failure.is_timeout() => self.probe_timeouts += 1,
            ProbeOutcome::Failed(_) => self.probe_failures += 1,
        }
    }

    /// Updates counters from a fetch outcome
    pub fn record_fetch(&mut self, outcome: &FetchOutcome) {
        match outcome {
            FetchOutcome::Fetched(_) => self.fetched += 1,
            FetchOutcome::Failed(failure) if failure.is_timeout() => self.fetch_timeouts += 1,
            FetchOutcome::Failed(_) => self.fetch_failures += 1,
        }
    }

    /// Generates a one-line summary of the run
    pub fn generate_summary(&self, duration: Duration) -> String {
        let mut summary = format!(
            "✅ Completed in {:.1}s • {}/{} probed • {} found",
            duration.as_secs_f64(),
            self.processed,
            self.total,
            self.found
        );

        if self.probe_timeouts > 0 {
            summary.push_str(&format!(" • {} timed out", self.probe_timeouts));
        }
        if self.fetched + self.fetch_failures + self.fetch_timeouts > 0 {
            summary.push_str(&format!(" • {} downloaded", self.fetched));
            let failed = self.fetch_failures + self.fetch_timeouts;
            if failed > 0 {
                summary.push_str(&format!(" • {failed} downloads failed"));
            }
        }
        if self.excluded_entries > 0 {
            summary.push_str(&format!(" • {} entries excluded", self.excluded_entries));
        }

        summary
    }
}
