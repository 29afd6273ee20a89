//! Remote operations against an rsync daemon
//!
//! Probing and fetching sit behind the [`Prober`] and [`Fetcher`] traits so the
//! enumeration driver can run against scripted implementations in tests.

pub mod operations;
pub mod status;

use async_trait::async_trait;
use std::time::Duration;

pub use operations::{
    check_rsync_available, clean_error_message, rsync_url, run_rsync, RsyncFetcher, RsyncProber,
};
pub use status::{Failure, FailureKind, FetchOutcome, ProbeOutcome};

/// Address of the rsync daemon being enumerated
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Target {
    pub host: String,
    pub port: u16,
}

impl Target {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

/// Existence check for a single remote path
#[async_trait]
pub trait Prober: Send + Sync {
    /// Probes `path` on `target`; `None` timeout means wait indefinitely.
    /// Every failure mode resolves to a [`ProbeOutcome`] variant.
    async fn probe(&self, target: &Target, path: &str, timeout: Option<Duration>) -> ProbeOutcome;
}

/// Retrieval of a remote path that a probe already confirmed
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, target: &Target, path: &str, timeout: Option<Duration>) -> FetchOutcome;
}
