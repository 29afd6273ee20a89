//! Enumerate command implementation
//!
//! Wires the configuration, the rsync-backed prober and fetcher, interrupt
//! handling and the result writer around the enumeration driver.

use std::future::Future;
use std::time::Instant;

use crate::core::{
    read_wordlist, write_results, CandidateSet, Enumerator, LogReporter, Reporter, RunConfig,
    RunResult,
};
use crate::error::{EnumError, Result};
use crate::rsync::{check_rsync_available, Fetcher, Prober, RsyncFetcher, RsyncProber};

const BANNER_RULE_WIDTH: usize = 50;

/// Handles the enumerate command against a real rsync daemon
pub async fn handle_enumerate_command(config: RunConfig) -> Result<RunResult> {
    log_run_header(&config);

    if !check_rsync_available(&config.rsync_bin).await {
        return Err(EnumError::RsyncUnavailable(config.rsync_bin.clone()));
    }

    let prober = RsyncProber::new(config.rsync_bin.as_str());
    let fetcher = RsyncFetcher::new(config.rsync_bin.as_str(), config.download_dir.as_path());
    let reporter = LogReporter::new()?;

    execute(&config, &prober, &fetcher, &reporter, shutdown_signal()).await
}

/// Runs one enumeration with the given collaborators.
///
/// The wordlist is read before anything is probed. When `shutdown` resolves the
/// run stops with [`EnumError::Interrupted`]; partial results are written only
/// if `save_on_interrupt` is set.
pub async fn execute<F>(
    config: &RunConfig,
    prober: &dyn Prober,
    fetcher: &dyn Fetcher,
    reporter: &dyn Reporter,
    shutdown: F,
) -> Result<RunResult>
where
    F: Future<Output = ()>,
{
    let entries = read_wordlist(&config.wordlist).await?;
    let candidates = CandidateSet::new(
        entries,
        &config.extensions,
        &config.exclude,
        config.skip_blank,
    );

    if candidates.excluded() > 0 {
        log::info!("Excluded {} wordlist entries", candidates.excluded());
    }
    if candidates.blank_skipped() > 0 {
        log::debug!("Skipped {} blank wordlist lines", candidates.blank_skipped());
    }

    let start_time = Instant::now();
    let result = Enumerator::new(config, prober, fetcher, reporter)
        .run_until(&candidates, shutdown)
        .await;

    if result.interrupted {
        log::error!(
            "⚠️  Interrupted after {}/{} candidates ({} found)",
            result.stats.processed,
            result.stats.total,
            result.found_paths.len()
        );
        // a failed partial save must not mask the interrupt
        if config.save_on_interrupt {
            if let Err(e) = write_results(&result.found_paths, config.output.as_ref(), reporter) {
                log::error!("❌ Could not save partial results: {e}");
            }
        }
        return Err(EnumError::Interrupted);
    }

    write_results(&result.found_paths, config.output.as_ref(), reporter)?;
    log::info!("{}", result.stats.generate_summary(start_time.elapsed()));

    Ok(result)
}

/// Resolves on Ctrl-C; never resolves if the handler cannot be installed
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("Cannot listen for interrupts: {e}");
        std::future::pending::<()>().await;
    }
}

fn log_run_header(config: &RunConfig) {
    log::info!("🚀 Starting rsync enumeration");
    log::info!("Target: {}", config.target);
    log::info!("Port: {}", config.port);
    log::info!("Wordlist: {}", config.wordlist.display());
    if !config.extensions.is_empty() {
        log::info!("Extensions: {}", config.extensions.join(", "));
    }
    if !config.exclude.is_empty() {
        log::info!("Exclude: {}", config.exclude.join(", "));
    }
    match &config.output {
        Some(output) => log::info!("Output: {} ({})", output.path.display(), output.format),
        None => log::info!("Output: none"),
    }
    if config.download {
        log::info!("Download: enabled ({})", config.download_dir.display());
    } else {
        log::info!("Download: disabled");
    }
    if let Some(timeout) = config.probe_timeout {
        log::debug!("Probe timeout: {:.1}s", timeout.as_secs_f64());
    }
    if let Some(timeout) = config.fetch_timeout {
        log::debug!("Download timeout: {:.1}s", timeout.as_secs_f64());
    }
    if let Some(delay) = config.delay {
        log::debug!("Delay between requests: {:.2}s", delay.as_secs_f64());
    }
    log::info!("{}", "-".repeat(BANNER_RULE_WIDTH));
}
