//! Configuration constants, the optional TOML profile, and run configuration
//!
//! Values are resolved in priority order:
//! 1. command line flags
//! 2. the TOML profile (`--config FILE`, or `<config_dir>/rsync-enum/config.toml`)
//! 3. built-in defaults

use serde::Deserialize;
use std::net::Ipv6Addr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::output::{OutputFormat, OutputTarget};
use crate::error::{EnumError, Result};

// Remote defaults
pub const DEFAULT_PORT: u16 = 873;
pub const DEFAULT_RSYNC_BIN: &str = "rsync";
pub const DEFAULT_DOWNLOAD_DIR: &str = "downloads";
pub const EXTENSION_SEPARATOR: char = '.';

// Profile lookup
pub const CONFIG_DIR_NAME: &str = "rsync-enum";
pub const CONFIG_FILE_NAME: &str = "config.toml";

// Progress bar configuration
pub const PROGRESS_CHARS: &str = "##-";
pub const PROGRESS_TEMPLATE: &str = "{msg} [{bar:40}] {pos}/{len} ({eta})";
pub const PROGRESS_MESSAGE: &str = "🔍 Enumerating";

// Display formatting constants
pub const ERROR_MESSAGE_MAX_LENGTH: usize = 80;
pub const ERROR_MESSAGE_TRUNCATE_LENGTH: usize = 77;

/// Raw values collected from the command line, before validation
#[derive(Clone, Debug, Default)]
pub struct CliArgs {
    pub target: String,
    pub wordlist: PathBuf,
    pub extensions: Vec<String>,
    pub exclude: Vec<String>,
    pub output: Option<PathBuf>,
    pub download: bool,
    pub download_dir: Option<PathBuf>,
    pub port: Option<u16>,
    pub timeout: Option<f64>,
    pub download_timeout: Option<f64>,
    pub delay: Option<f64>,
    pub format: Option<String>,
    pub verbose: bool,
    pub keep_blank: bool,
    pub save_on_interrupt: bool,
    pub rsync_bin: Option<String>,
    pub config: Option<PathBuf>,
}

/// Defaults read from a TOML profile; every field is optional
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub port: Option<u16>,
    pub timeout: Option<f64>,
    pub download_timeout: Option<f64>,
    pub delay: Option<f64>,
    pub format: Option<String>,
    pub extensions: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
    pub download_dir: Option<PathBuf>,
    pub rsync_bin: Option<String>,
    pub keep_blank: Option<bool>,
    pub save_on_interrupt: Option<bool>,
}

impl FileConfig {
    /// Parses a profile from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| EnumError::InvalidConfig(e.to_string()))
    }

    /// Loads the profile named on the command line, or the default profile if one exists.
    /// An explicitly named profile must exist; the default one is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => {
                let content = std::fs::read_to_string(path).map_err(|e| {
                    EnumError::InvalidConfig(format!("cannot read {}: {e}", path.display()))
                })?;
                Self::parse(&content)
            }
            None => match default_config_path() {
                Some(path) if path.is_file() => {
                    log::debug!("Loading profile {}", path.display());
                    let content = std::fs::read_to_string(&path).map_err(|e| {
                        EnumError::InvalidConfig(format!("cannot read {}: {e}", path.display()))
                    })?;
                    Self::parse(&content)
                }
                _ => Ok(Self::default()),
            },
        }
    }
}

/// Location of the default profile, if the platform has a config directory
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Immutable settings for one enumeration run
#[derive(Clone, Debug, PartialEq)]
pub struct RunConfig {
    pub target: String,
    pub port: u16,
    pub wordlist: PathBuf,
    /// Normalised extensions, each starting with the separator
    pub extensions: Vec<String>,
    pub exclude: Vec<String>,
    pub download: bool,
    pub download_dir: PathBuf,
    /// `None` lets a probe block indefinitely
    pub probe_timeout: Option<Duration>,
    pub fetch_timeout: Option<Duration>,
    pub delay: Option<Duration>,
    /// `None` disables persistence
    pub output: Option<OutputTarget>,
    pub verbose: bool,
    pub skip_blank: bool,
    pub save_on_interrupt: bool,
    pub rsync_bin: String,
}

impl RunConfig {
    /// Minimal configuration with built-in defaults for everything optional
    pub fn new(target: impl Into<String>, wordlist: impl Into<PathBuf>) -> Self {
        Self {
            target: target.into(),
            port: DEFAULT_PORT,
            wordlist: wordlist.into(),
            extensions: Vec::new(),
            exclude: Vec::new(),
            download: false,
            download_dir: PathBuf::from(DEFAULT_DOWNLOAD_DIR),
            probe_timeout: None,
            fetch_timeout: None,
            delay: None,
            output: None,
            verbose: false,
            skip_blank: true,
            save_on_interrupt: false,
            rsync_bin: DEFAULT_RSYNC_BIN.to_string(),
        }
    }

    /// Merges command line values over profile values and validates the result
    pub fn resolve(cli: CliArgs, file: FileConfig) -> Result<Self> {
        let target = cli.target.trim().to_string();
        if target.is_empty() {
            return Err(EnumError::InvalidConfig("target address is empty".to_string()));
        }
        if target.contains(':') && !is_ipv6_literal(&target) {
            return Err(EnumError::InvalidConfig(format!(
                "target '{target}' is not a host or IP address; pass the port with --port"
            )));
        }

        let port = cli.port.or(file.port).unwrap_or(DEFAULT_PORT);
        if port == 0 {
            return Err(EnumError::InvalidConfig("port must be between 1 and 65535".to_string()));
        }

        let extensions = if cli.extensions.is_empty() {
            file.extensions.unwrap_or_default()
        } else {
            cli.extensions
        };
        let exclude = if cli.exclude.is_empty() {
            file.exclude.unwrap_or_default()
        } else {
            cli.exclude
        };

        let format = resolve_format(cli.format.or(file.format).as_deref());
        let output = match (cli.output, format) {
            (Some(path), Some(format)) => Some(OutputTarget::new(path, format)),
            _ => None,
        };

        Ok(Self {
            target,
            port,
            wordlist: cli.wordlist,
            extensions: normalize_extensions(&extensions),
            exclude: exclude.into_iter().filter(|s| !s.is_empty()).collect(),
            download: cli.download,
            download_dir: cli
                .download_dir
                .or(file.download_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DOWNLOAD_DIR)),
            probe_timeout: parse_timeout("timeout", cli.timeout.or(file.timeout))?,
            fetch_timeout: parse_timeout(
                "download timeout",
                cli.download_timeout.or(file.download_timeout),
            )?,
            delay: parse_delay(cli.delay.or(file.delay))?,
            output,
            verbose: cli.verbose,
            skip_blank: !(cli.keep_blank || file.keep_blank.unwrap_or(false)),
            save_on_interrupt: cli.save_on_interrupt || file.save_on_interrupt.unwrap_or(false),
            rsync_bin: cli
                .rsync_bin
                .or(file.rsync_bin)
                .unwrap_or_else(|| DEFAULT_RSYNC_BIN.to_string()),
        })
    }
}

/// Parses the output format name, defaulting to plain.
/// An unknown name is logged and yields `None`, which disables persistence
/// instead of aborting the run.
fn resolve_format(name: Option<&str>) -> Option<OutputFormat> {
    match name.map(str::parse::<OutputFormat>).transpose() {
        Ok(format) => Some(format.unwrap_or_default()),
        Err(e) => {
            log::error!("❌ {e}; results will not be saved");
            None
        }
    }
}

/// Accepts bare and bracketed IPv6 addresses
fn is_ipv6_literal(host: &str) -> bool {
    let inner = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);
    inner.parse::<Ipv6Addr>().is_ok()
}

/// Prepends the separator to an extension that lacks it
pub fn normalize_extension(ext: &str) -> String {
    if ext.starts_with(EXTENSION_SEPARATOR) {
        ext.to_string()
    } else {
        format!("{EXTENSION_SEPARATOR}{ext}")
    }
}

/// Normalises every extension, dropping empty values
pub fn normalize_extensions(raw: &[String]) -> Vec<String> {
    raw.iter()
        .map(|ext| ext.trim())
        .filter(|ext| !ext.is_empty())
        .map(normalize_extension)
        .collect()
}

/// Converts a timeout in seconds; it must be finite and positive
fn parse_timeout(name: &str, seconds: Option<f64>) -> Result<Option<Duration>> {
    match seconds {
        None => Ok(None),
        Some(s) if s.is_finite() && s > 0.0 => Ok(Some(Duration::from_secs_f64(s))),
        Some(s) => Err(EnumError::InvalidConfig(format!(
            "{name} must be a positive number of seconds, got {s}"
        ))),
    }
}

/// Converts an inter-request delay in seconds; zero means no delay
fn parse_delay(seconds: Option<f64>) -> Result<Option<Duration>> {
    match seconds {
        None => Ok(None),
        Some(s) if s == 0.0 => Ok(None),
        Some(s) if s.is_finite() && s > 0.0 => Ok(Some(Duration::from_secs_f64(s))),
        Some(s) => Err(EnumError::InvalidConfig(format!(
            "delay must be zero or a positive number of seconds, got {s}"
        ))),
    }
}
