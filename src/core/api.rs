//! Public API for the core module.
//!
//! This module provides the stable public API for the enumeration engine:
//! - Wordlist loading and candidate generation
//! - Run configuration and profile loading
//! - The enumeration driver and its statistics
//! - Event reporting and result persistence
//!
//! Internal implementation details are not exposed through this API.

// Candidate generation
pub use super::candidates::{parse_wordlist, read_wordlist, CandidateSet, Candidates};

// Configuration
pub use super::config::{
    default_config_path, normalize_extension, normalize_extensions, CliArgs, FileConfig,
    RunConfig, DEFAULT_DOWNLOAD_DIR, DEFAULT_PORT, DEFAULT_RSYNC_BIN,
};

// Driver
pub use super::enumerate::{Enumerator, RunResult};
pub use super::stats::RunStats;

// Reporting and output
pub use super::output::{write_results, FoundReport, OutputFormat, OutputTarget};
pub use super::progress::{LogReporter, Reporter, SilentReporter};
