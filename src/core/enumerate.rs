//! Sequential enumeration driver
//!
//! Each candidate flows through: probe → (found → record → optional fetch) →
//! advance progress → optional delay. One candidate is in flight at a time.

use std::future::Future;
use std::time::Duration;

use super::candidates::CandidateSet;
use super::config::RunConfig;
use super::progress::Reporter;
use super::stats::RunStats;
use crate::rsync::{FetchOutcome, Fetcher, ProbeOutcome, Prober, Target};

/// Everything a finished or interrupted run produced
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunResult {
    /// Found paths in enumeration order, duplicates kept
    pub found_paths: Vec<String>,
    pub stats: RunStats,
    pub interrupted: bool,
}

/// Drives probes (and fetches) over a candidate set
pub struct Enumerator<'a> {
    target: Target,
    probe_timeout: Option<Duration>,
    fetch_timeout: Option<Duration>,
    delay: Option<Duration>,
    download: bool,
    prober: &'a dyn Prober,
    fetcher: &'a dyn Fetcher,
    reporter: &'a dyn Reporter,
    found: Vec<String>,
    stats: RunStats,
}

impl<'a> Enumerator<'a> {
    /// The fetcher is only consulted when `config.download` is set
    pub fn new(
        config: &RunConfig,
        prober: &'a dyn Prober,
        fetcher: &'a dyn Fetcher,
        reporter: &'a dyn Reporter,
    ) -> Self {
        Self {
            target: Target::new(config.target.clone(), config.port),
            probe_timeout: config.probe_timeout,
            fetch_timeout: config.fetch_timeout,
            delay: config.delay,
            download: config.download,
            prober,
            fetcher,
            reporter,
            found: Vec::new(),
            stats: RunStats::new(),
        }
    }

    /// Runs until the candidate set is exhausted
    pub async fn run(self, candidates: &CandidateSet) -> RunResult {
        self.run_until(candidates, std::future::pending()).await
    }

    /// Runs until the candidate set is exhausted or `shutdown` resolves.
    /// On shutdown the in-flight probe or fetch is dropped (killing its process)
    /// and the paths found so far are returned with `interrupted` set.
    pub async fn run_until<F>(mut self, candidates: &CandidateSet, shutdown: F) -> RunResult
    where
        F: Future<Output = ()>,
    {
        self.stats.total = candidates.len();
        self.stats.excluded_entries = candidates.excluded() as u64;
        self.reporter.begin(candidates.len());

        let interrupted = tokio::select! {
            biased;
            () = shutdown => true,
            () = self.drive(candidates) => false,
        };

        self.reporter.finish();

        RunResult {
            found_paths: self.found,
            stats: self.stats,
            interrupted,
        }
    }

    async fn drive(&mut self, candidates: &CandidateSet) {
        for candidate in candidates {
            self.step(&candidate).await;
        }
    }

    async fn step(&mut self, candidate: &str) {
        let outcome = self
            .prober
            .probe(&self.target, candidate, self.probe_timeout)
            .await;
        self.stats.record_probe(&outcome);

        match outcome {
            ProbeOutcome::Found(_) => {
                self.reporter.found(candidate);
                self.found.push(candidate.to_string());
                if self.download {
                    self.fetch(candidate).await;
                }
            }
            ProbeOutcome::NotFound => {}
            ProbeOutcome::Failed(failure) => self.reporter.probe_failed(candidate, &failure),
        }

        self.stats.processed += 1;
        self.reporter.advance();

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }

    /// Fetch failures are reported and otherwise ignored; the path stays found
    async fn fetch(&mut self, candidate: &str) {
        let outcome = self
            .fetcher
            .fetch(&self.target, candidate, self.fetch_timeout)
            .await;
        self.stats.record_fetch(&outcome);

        match outcome {
            FetchOutcome::Fetched(destination) => self.reporter.fetched(candidate, &destination),
            FetchOutcome::Failed(failure) => self.reporter.fetch_failed(candidate, &failure),
        }
    }
}
