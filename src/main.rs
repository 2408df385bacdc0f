//! restic-runner - Main entry point
//!
//! Startup order matters: logging first, then configuration, then the
//! credential precondition, then the phase sequence. Only startup failures
//! exit non-zero; per-directory and per-phase failures are logged and
//! absorbed by the orchestrator.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use restic_runner::cli::Cli;
use restic_runner::config::{ensure_credentials, expand_user, Config};
use restic_runner::engine::ResticRunner;
use restic_runner::orchestrator::Orchestrator;

/// Initialize the global tracing subscriber, appending to the given log
/// file. Parent directories are created if missing. Respects `RUST_LOG`
/// for fine-grained filtering.
fn init_logging(log_path: &Path) -> Result<()> {
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {:?}", parent))?;
    }
    let log_file = fs::File::options()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("Failed to open log file {:?}", log_path))?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Arc::new(log_file)),
        )
        .try_init()
        .ok();

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    let log_path = expand_user(&cli.log_file);
    init_logging(&log_path)?;

    let config_path = expand_user(&cli.config_file);
    if !config_path.exists() {
        anyhow::bail!("No config file found at: {}", cli.config_file.display());
    }
    let config = Config::load_from_file(&config_path)?;
    config.validate()?;

    if let Err(err) = ensure_credentials() {
        error!("{}", err);
        return Err(err.into());
    }

    info!(
        "restic-runner starting for repository {}{}",
        config.repository,
        if cli.dry_run { " (dry run)" } else { "" }
    );

    let orchestrator = Orchestrator::new(&config, ResticRunner::new(cli.dry_run));
    orchestrator.run_all();

    Ok(())
}
