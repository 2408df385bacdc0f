//! Configuration file handling.
//!
//! The configuration is a plain JSON file loaded once at startup into an
//! immutable value. The orchestrator only ever reads it; nothing mutates
//! configuration for the duration of a run.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::engine::Phase;
use crate::error::RunnerError;

/// Environment variables restic accepts for repository credentials.
/// At least one must be set before any phase runs.
pub const CREDENTIAL_VARS: [&str; 3] = [
    "RESTIC_PASSWORD",
    "RESTIC_PASSWORD_FILE",
    "RESTIC_PASSWORD_COMMAND",
];

/// Runner configuration that is loaded from a JSON file.
///
/// The extra-argument lists are optional in the file; a missing list means
/// "no extra arguments for that phase", so argument assembly is always
/// unconditional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Restic repository location, passed to every invocation via `-r`.
    pub repository: String,

    /// Directories to back up, processed strictly in this order.
    #[serde(default)]
    pub directories: Vec<PathBuf>,

    /// Extra arguments appended to `restic backup` invocations.
    #[serde(default)]
    pub backup_args: Vec<String>,

    /// Extra arguments appended to the `restic forget --prune` invocation.
    #[serde(default)]
    pub prune_args: Vec<String>,

    /// Extra arguments appended to the `restic check` invocation.
    #[serde(default)]
    pub check_args: Vec<String>,
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read configuration from {:?}", path.as_ref()))?;

        let config: Self =
            serde_json::from_str(&content).context("Failed to parse configuration JSON")?;

        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.repository.trim().is_empty() {
            anyhow::bail!("Repository must be specified");
        }
        Ok(())
    }

    /// Extra arguments configured for the given phase.
    pub fn extra_args(&self, phase: Phase) -> &[String] {
        match phase {
            Phase::Backup => &self.backup_args,
            Phase::Prune => &self.prune_args,
            Phase::Check => &self.check_args,
        }
    }
}

/// Expand a leading `~` component to the user's home directory.
///
/// Paths without a leading `~`, and paths on systems with no resolvable home
/// directory, are returned unchanged.
pub fn expand_user(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

/// Ensure at least one restic credential variable is present in the process
/// environment. Absence is a fatal precondition failure.
pub fn ensure_credentials() -> crate::error::Result<()> {
    if CREDENTIAL_VARS
        .iter()
        .any(|var| std::env::var_os(var).is_some())
    {
        Ok(())
    } else {
        Err(RunnerError::credentials(
            "No password found in environment variables. See restic documentation for more info",
        ))
    }
}
