//! restic-runner library
//!
//! Orchestrates a three-phase restic workflow — backup, prune, check —
//! against a repository, driving the restic CLI one blocking invocation at
//! a time. Intended to run unattended from a scheduler; failures are logged
//! and isolated rather than aborting the run.

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod orchestrator;
pub mod status;

// Re-export main types for convenience
pub use cli::Cli;
pub use config::{ensure_credentials, expand_user, Config, CREDENTIAL_VARS};
pub use engine::{build_args, EngineOutput, EngineRunner, Phase, ResticRunner, ENGINE_BINARY};
pub use error::{Result, RunnerError};
pub use orchestrator::Orchestrator;
pub use status::{find_summary, parse_records, summary_detail, SUMMARY_KIND};
