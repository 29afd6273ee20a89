//! Error taxonomy for enumeration runs
//!
//! Only run-level failures live here. Individual probe and fetch failures are
//! plain values (see [`crate::rsync::Failure`]) and never surface as errors.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors that terminate an enumeration run
#[derive(Error, Debug)]
pub enum EnumError {
    /// The wordlist could not be opened or read; raised before any probe
    #[error("wordlist '{}' could not be read: {source}", .path.display())]
    MissingWordlist {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The operator interrupted the run
    #[error("interrupted by user")]
    Interrupted,
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("unsupported output format '{0}' (expected plain, csv or json)")]
    UnsupportedOutputFormat(String),
    #[error("rsync executable '{0}' could not be run")]
    RsyncUnavailable(String),
    #[error("failed to write results to '{}': {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Catch-all for anything not classified above
    #[error(transparent)]
    Unclassified(#[from] anyhow::Error),
}

impl EnumError {
    /// Process exit code the binary should use for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            EnumError::Interrupted => 130,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, EnumError>;
