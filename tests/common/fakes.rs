//! Scripted collaborators for driving enumeration without an rsync daemon

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use rsync_enum::core::Reporter;
use rsync_enum::rsync::{Failure, FetchOutcome, Fetcher, ProbeOutcome, Prober, Target};

/// Listing text returned for scripted hits
pub const LISTING: &str = "drwxr-xr-x          4,096 2024/01/01 00:00:00 .";

/// Answers probes from a script; unscripted paths are NotFound
#[derive(Default)]
pub struct ScriptedProber {
    script: HashMap<String, ProbeOutcome>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedProber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn found(mut self, path: &str) -> Self {
        self.script
            .insert(path.to_string(), ProbeOutcome::Found(LISTING.to_string()));
        self
    }

    pub fn timeout(mut self, path: &str) -> Self {
        self.script.insert(
            path.to_string(),
            ProbeOutcome::Failed(Failure::timeout("no response after 1.0s")),
        );
        self
    }

    pub fn failure(mut self, path: &str, message: &str) -> Self {
        self.script.insert(
            path.to_string(),
            ProbeOutcome::Failed(Failure::execution(message)),
        );
        self
    }

    /// Paths probed so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Prober for ScriptedProber {
    async fn probe(&self, _target: &Target, path: &str, _timeout: Option<Duration>) -> ProbeOutcome {
        self.calls.lock().unwrap().push(path.to_string());
        self.script
            .get(path)
            .cloned()
            .unwrap_or(ProbeOutcome::NotFound)
    }
}

/// Records fetches and fails the ones listed in `failing`
#[derive(Default)]
pub struct RecordingFetcher {
    pub failing: Vec<String>,
    calls: Mutex<Vec<String>>,
}

impl RecordingFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(paths: &[&str]) -> Self {
        Self {
            failing: paths.iter().map(|p| p.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for RecordingFetcher {
    async fn fetch(&self, _target: &Target, path: &str, _timeout: Option<Duration>) -> FetchOutcome {
        self.calls.lock().unwrap().push(path.to_string());
        if self.failing.iter().any(|p| p == path) {
            FetchOutcome::Failed(Failure::execution("auth required"))
        } else {
            FetchOutcome::Fetched(format!("downloads/{path}"))
        }
    }
}

/// Event captured by [`RecordingReporter`]
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Begin(u64),
    Advance,
    Found(String),
    ProbeFailed(String, Failure),
    Fetched(String),
    FetchFailed(String, Failure),
    Saved(String, usize),
    Finish,
}

/// Reporter that keeps every event for later assertions
#[derive(Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<Event>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

impl Reporter for RecordingReporter {
    fn begin(&self, total: u64) {
        self.push(Event::Begin(total));
    }

    fn advance(&self) {
        self.push(Event::Advance);
    }

    fn found(&self, path: &str) {
        self.push(Event::Found(path.to_string()));
    }

    fn probe_failed(&self, path: &str, failure: &Failure) {
        self.push(Event::ProbeFailed(path.to_string(), failure.clone()));
    }

    fn fetched(&self, path: &str, _destination: &str) {
        self.push(Event::Fetched(path.to_string()));
    }

    fn fetch_failed(&self, path: &str, failure: &Failure) {
        self.push(Event::FetchFailed(path.to_string(), failure.clone()));
    }

    fn saved(&self, output: &Path, count: usize) {
        self.push(Event::Saved(output.display().to_string(), count));
    }

    fn finish(&self) {
        self.push(Event::Finish);
    }
}

/// Reports every path as found and fires `signal` when it reaches `trigger`.
/// Each probe yields once so a pending shutdown is observed promptly.
pub struct InterruptingProber {
    trigger: String,
    signal: Mutex<Option<tokio::sync::oneshot::Sender<()>>>,
    calls: Mutex<Vec<String>>,
}

impl InterruptingProber {
    pub fn new(trigger: &str) -> (Self, tokio::sync::oneshot::Receiver<()>) {
        let (tx, rx) = tokio::sync::oneshot::channel();
        let prober = Self {
            trigger: trigger.to_string(),
            signal: Mutex::new(Some(tx)),
            calls: Mutex::new(Vec::new()),
        };
        (prober, rx)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Prober for InterruptingProber {
    async fn probe(&self, _target: &Target, path: &str, _timeout: Option<Duration>) -> ProbeOutcome {
        self.calls.lock().unwrap().push(path.to_string());
        if path == self.trigger {
            let signal = self.signal.lock().unwrap().take();
            if let Some(tx) = signal {
                let _ = tx.send(());
            }
        }
        tokio::task::yield_now().await;
        ProbeOutcome::Found(LISTING.to_string())
    }
}
