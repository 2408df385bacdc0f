//! Error handling for restic-runner.
//!
//! Centralized error types using thiserror. Fatal preconditions (missing
//! config, missing credentials) abort the run; everything the orchestrator
//! hits mid-run is logged and absorbed, never propagated across a phase
//! boundary.

use thiserror::Error;

/// Main error type for restic-runner.
#[derive(Error, Debug)]
pub enum RunnerError {
    /// IO errors (log file creation, config reads, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors (loading, parsing, validation)
    #[error("Configuration error: {0}")]
    Config(String),

    /// No restic credential found in the process environment
    #[error("Credential error: {0}")]
    Credentials(String),

    /// Engine invocation errors (spawn failures)
    #[error("Engine error: {0}")]
    Engine(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for restic-runner operations.
pub type Result<T> = std::result::Result<T, RunnerError>;

impl RunnerError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a credential error
    pub fn credentials(msg: impl Into<String>) -> Self {
        Self::Credentials(msg.into())
    }

    /// Create an engine error
    pub fn engine(msg: impl Into<String>) -> Self {
        Self::Engine(msg.into())
    }
}
