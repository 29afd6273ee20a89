//! Result persistence in plain, csv and json encodings

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::progress::Reporter;
use crate::error::{EnumError, Result};

const CSV_HEADER: &str = "Path";

/// Encoding used for the results file
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// One path per line
    #[default]
    Plain,
    /// `Path` header, one path per row
    Csv,
    /// `{"found_paths": [...]}`, pretty-printed
    Json,
}

impl OutputFormat {
    pub fn name(&self) -> &str {
        match self {
            OutputFormat::Plain => "plain",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }

    /// Encodes the found paths in this format
    pub fn serialize(&self, found_paths: &[String]) -> Result<Vec<u8>> {
        match self {
            OutputFormat::Plain => {
                let mut out = String::new();
                for path in found_paths {
                    out.push_str(path);
                    out.push('\n');
                }
                Ok(out.into_bytes())
            }
            OutputFormat::Csv => {
                let mut writer = csv::WriterBuilder::new()
                    .terminator(csv::Terminator::Any(b'\n'))
                    .from_writer(Vec::new());
                writer.write_record([CSV_HEADER]).map_err(csv_error)?;
                for path in found_paths {
                    writer.write_record([path]).map_err(csv_error)?;
                }
                writer
                    .into_inner()
                    .map_err(|e| EnumError::Unclassified(e.into_error().into()))
            }
            OutputFormat::Json => {
                let report = FoundReport {
                    found_paths: found_paths.to_vec(),
                };
                let mut out = serde_json::to_vec_pretty(&report)
                    .map_err(|e| EnumError::Unclassified(e.into()))?;
                out.push(b'\n');
                Ok(out)
            }
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputFormat {
    type Err = EnumError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" | "txt" => Ok(OutputFormat::Plain),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(EnumError::UnsupportedOutputFormat(s.to_string())),
        }
    }
}

/// JSON document layout
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct FoundReport {
    pub found_paths: Vec<String>,
}

/// Where and how results are persisted
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputTarget {
    pub path: PathBuf,
    pub format: OutputFormat,
}

impl OutputTarget {
    pub fn new(path: impl Into<PathBuf>, format: OutputFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }
}

fn csv_error(e: csv::Error) -> EnumError {
    EnumError::Unclassified(e.into())
}

/// Writes the found paths to the output target.
/// Does nothing when no target is configured or nothing was found.
/// Returns the path written, if any.
pub fn write_results(
    found_paths: &[String],
    target: Option<&OutputTarget>,
    reporter: &dyn Reporter,
) -> Result<Option<PathBuf>> {
    let Some(target) = target else {
        return Ok(None);
    };
    if found_paths.is_empty() {
        return Ok(None);
    }

    let bytes = target.format.serialize(found_paths)?;
    write_file(&target.path, &bytes)?;
    reporter.saved(&target.path, found_paths.len());
    Ok(Some(target.path.clone()))
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).map_err(|source| EnumError::Output {
        path: path.to_path_buf(),
        source,
    })
}
