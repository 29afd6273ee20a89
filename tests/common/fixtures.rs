//! Test fixtures and builders

use anyhow::Result;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use rsync_enum::core::{OutputFormat, OutputTarget, RunConfig};

/// A temporary directory holding a wordlist and any output files
pub struct TestWorkspace {
    pub temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
        })
    }

    /// Get the path to the workspace
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes a wordlist with one entry per line and returns its path
    pub fn create_wordlist(&self, entries: &[&str]) -> Result<PathBuf> {
        let path = self.path().join("words.txt");
        let mut content = entries.join("\n");
        content.push('\n');
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// Path for an output file inside the workspace (not created)
    pub fn output_path(&self, name: &str) -> PathBuf {
        self.path().join(name)
    }

    /// Run configuration pointing at this workspace's wordlist
    pub fn config(&self, entries: &[&str]) -> Result<RunConfig> {
        let wordlist = self.create_wordlist(entries)?;
        Ok(RunConfig::new("10.0.0.5", wordlist))
    }

    /// Run configuration that also saves results in the given format
    pub fn config_with_output(
        &self,
        entries: &[&str],
        name: &str,
        format: OutputFormat,
    ) -> Result<RunConfig> {
        let mut config = self.config(entries)?;
        config.output = Some(OutputTarget::new(self.output_path(name), format));
        Ok(config)
    }
}
