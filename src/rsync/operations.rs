//! rsync command execution and the process-backed prober and fetcher

use async_trait::async_trait;
use std::io;
use std::net::Ipv6Addr;
use std::path::{Component, Path, PathBuf};
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

use super::status::{
    Failure, FetchOutcome, ProbeOutcome, REASON_CONNECTION_REFUSED, REASON_HOST_NOT_RESOLVED,
};
use super::{Fetcher, Prober, Target};
use crate::core::config::{ERROR_MESSAGE_MAX_LENGTH, ERROR_MESSAGE_TRUNCATE_LENGTH};

// rsync command arguments
const RSYNC_LIST_ARGS: &[&str] = &["-av", "--list-only"];
const RSYNC_FETCH_ARGS: &[&str] = &["-av"];
const RSYNC_VERSION_ARGS: &[&str] = &["--version"];

const VERSION_CHECK_TIMEOUT_SECS: u64 = 10;

// rsync reads this instead of prompting on the terminal for a module password
const RSYNC_PASSWORD_ENV: &str = "RSYNC_PASSWORD";

/// Why an rsync invocation produced no exit status
#[derive(Error, Debug)]
pub enum InvocationError {
    #[error("no response after {:.1}s", .0.as_secs_f64())]
    TimedOut(Duration),
    #[error("failed to start '{bin}': {source}")]
    Spawn {
        bin: String,
        #[source]
        source: io::Error,
    },
}

/// Runs the rsync binary with the given arguments, optionally bounded by a timeout.
/// The child is killed if the timeout elapses. Unless the caller's environment
/// already supplies `RSYNC_PASSWORD`, it is set empty so protected modules fail
/// with "auth failed" instead of prompting.
/// Returns (success, stdout, stderr)
pub async fn run_rsync<S: AsRef<str>>(
    bin: &str,
    args: &[S],
    timeout: Option<Duration>,
) -> Result<(bool, String, String), InvocationError> {
    let mut command = Command::new(bin);
    command
        .args(args.iter().map(|arg| AsRef::<str>::as_ref(arg)))
        .stdin(Stdio::null())
        .kill_on_drop(true);
    if std::env::var_os(RSYNC_PASSWORD_ENV).is_none() {
        command.env(RSYNC_PASSWORD_ENV, "");
    }

    let result = match timeout {
        Some(limit) => tokio::time::timeout(limit, command.output())
            .await
            .map_err(|_| InvocationError::TimedOut(limit))?,
        None => command.output().await,
    };

    let output = result.map_err(|source| InvocationError::Spawn {
        bin: bin.to_string(),
        source,
    })?;

    Ok((
        output.status.success(),
        String::from_utf8_lossy(&output.stdout).trim().to_string(),
        String::from_utf8_lossy(&output.stderr).trim().to_string(),
    ))
}

/// Builds the daemon URL for a path, bracketing IPv6 literals
pub fn rsync_url(target: &Target, path: &str) -> String {
    let host = if target.host.parse::<Ipv6Addr>().is_ok() {
        format!("[{}]", target.host)
    } else {
        target.host.clone()
    };
    format!(
        "rsync://{}:{}/{}",
        host,
        target.port,
        path.trim_start_matches('/')
    )
}

/// Verifies the rsync binary can be executed at all
pub async fn check_rsync_available(bin: &str) -> bool {
    matches!(
        run_rsync(
            bin,
            RSYNC_VERSION_ARGS,
            Some(Duration::from_secs(VERSION_CHECK_TIMEOUT_SECS))
        )
        .await,
        Ok((true, _, _))
    )
}

/// Condenses rsync stderr into a short reason
pub fn clean_error_message(error: &str) -> String {
    let cleaned = error.split_whitespace().collect::<Vec<_>>().join(" ");
    let lower = cleaned.to_lowercase();

    if cleaned.is_empty() {
        "exited with failure status".to_string()
    } else if lower.contains("unknown module") {
        "unknown module".to_string()
    } else if lower.contains("auth failed") || lower.contains("password") {
        "authentication required".to_string()
    } else if lower.contains("connection refused") {
        REASON_CONNECTION_REFUSED.to_string()
    } else if lower.contains("no such file or directory") {
        "no such path".to_string()
    } else if lower.contains("timed out") {
        "timeout".to_string()
    } else if lower.contains("name or service not known")
        || lower.contains("could not resolve")
        || lower.contains("nodename nor servname")
    {
        REASON_HOST_NOT_RESOLVED.to_string()
    } else if cleaned.chars().count() > ERROR_MESSAGE_MAX_LENGTH {
        let head: String = cleaned.chars().take(ERROR_MESSAGE_TRUNCATE_LENGTH).collect();
        format!("{head}...")
    } else {
        cleaned
    }
}

/// Probes paths with `rsync --list-only`
pub struct RsyncProber {
    bin: String,
}

impl RsyncProber {
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }
}

#[async_trait]
impl Prober for RsyncProber {
    async fn probe(&self, target: &Target, path: &str, timeout: Option<Duration>) -> ProbeOutcome {
        let mut args: Vec<String> = RSYNC_LIST_ARGS.iter().map(|a| a.to_string()).collect();
        args.push(rsync_url(target, path));

        match run_rsync(&self.bin, &args, timeout).await {
            Ok((true, listing, _)) if !listing.is_empty() => ProbeOutcome::Found(listing),
            Ok((true, _, _)) => ProbeOutcome::NotFound,
            Ok((false, _, stderr)) => {
                ProbeOutcome::Failed(Failure::execution(clean_error_message(&stderr)))
            }
            Err(e @ InvocationError::TimedOut(_)) => ProbeOutcome::Failed(Failure::timeout(e.to_string())),
            Err(e) => ProbeOutcome::Failed(Failure::execution(e.to_string())),
        }
    }
}

/// Downloads found paths with `rsync -av` into a local directory
pub struct RsyncFetcher {
    bin: String,
    download_dir: PathBuf,
    prepared: AtomicBool,
}

impl RsyncFetcher {
    pub fn new(bin: impl Into<String>, download_dir: impl Into<PathBuf>) -> Self {
        Self {
            bin: bin.into(),
            download_dir: download_dir.into(),
            prepared: AtomicBool::new(false),
        }
    }

    /// Creates the download directory the first time it is needed
    async fn ensure_download_dir(&self) -> io::Result<()> {
        if self.prepared.load(Ordering::Acquire) {
            return Ok(());
        }
        tokio::fs::create_dir_all(&self.download_dir).await?;
        self.prepared.store(true, Ordering::Release);
        Ok(())
    }

    /// Maps a remote path to its local destination, refusing paths that escape the download directory
    fn destination_for(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes || relative.as_os_str().is_empty() {
            return None;
        }
        Some(self.download_dir.join(relative))
    }
}

#[async_trait]
impl Fetcher for RsyncFetcher {
    async fn fetch(&self, target: &Target, path: &str, timeout: Option<Duration>) -> FetchOutcome {
        if let Err(e) = self.ensure_download_dir().await {
            return FetchOutcome::Failed(Failure::execution(format!(
                "cannot create {}: {e}",
                self.download_dir.display()
            )));
        }

        let Some(destination) = self.destination_for(path) else {
            return FetchOutcome::Failed(Failure::execution(
                "path would escape the download directory",
            ));
        };

        if let Some(parent) = destination.parent() {
            if let Err(e) = tokio::fs::create_dir_all(parent).await {
                return FetchOutcome::Failed(Failure::execution(format!(
                    "cannot create {}: {e}",
                    parent.display()
                )));
            }
        }

        let mut args: Vec<String> = RSYNC_FETCH_ARGS.iter().map(|a| a.to_string()).collect();
        args.push(rsync_url(target, path));
        args.push(destination.to_string_lossy().into_owned());

        match run_rsync(&self.bin, &args, timeout).await {
            Ok((true, _, _)) => FetchOutcome::Fetched(destination.display().to_string()),
            Ok((false, _, stderr)) => {
                FetchOutcome::Failed(Failure::execution(clean_error_message(&stderr)))
            }
            Err(e @ InvocationError::TimedOut(_)) => FetchOutcome::Failed(Failure::timeout(e.to_string())),
            Err(e) => FetchOutcome::Failed(Failure::execution(e.to_string())),
        }
    }
}
