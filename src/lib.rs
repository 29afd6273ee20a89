//! # rsync-enum
//!
//! `rsync-enum` discovers paths exposed by an rsync daemon by testing every
//! wordlist entry (optionally combined with file extensions) with
//! `rsync --list-only`. It powers the `rsync-enum` CLI tool.
//!
//! ## Core Features
//!
//! - **Candidate Generation**: wordlist × extension expansion with exclusion filtering.
//! - **Bounded Probes**: per-probe and per-download timeouts, optional request pacing.
//! - **Optional Download**: found paths can be mirrored locally as they are discovered.
//! - **Result Files**: plain, csv or json output.
//!
//! ## Example
//!
//! ```rust,no_run
//! use rsync_enum::core::{CandidateSet, Enumerator, RunConfig, SilentReporter};
//! use rsync_enum::rsync::{RsyncFetcher, RsyncProber};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = RunConfig::new("10.0.0.5", "words.txt");
//!     let words = vec!["backup".to_string(), "www".to_string()];
//!     let candidates = CandidateSet::new(words, &[".zip".to_string()], &[], true);
//!
//!     let prober = RsyncProber::new("rsync");
//!     let fetcher = RsyncFetcher::new("rsync", "downloads");
//!     let result = Enumerator::new(&config, &prober, &fetcher, &SilentReporter)
//!         .run(&candidates)
//!         .await;
//!     for path in result.found_paths {
//!         println!("{path}");
//!     }
//! }
//! ```

pub mod commands;
pub mod core;
pub mod error;
pub mod rsync;

pub use error::{EnumError, Result};
