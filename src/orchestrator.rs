//! Phase orchestration: backup, then prune, then check.
//!
//! The whole run is a strictly ordered sequence with unconditional forward
//! progression. Every recoverable failure (missing directory, failed
//! invocation, failed prune or check) is logged at the point it happens and
//! the run continues; nothing short of a startup precondition aborts it.

use std::time::Instant;

use tracing::{error, info};

use crate::config::{expand_user, Config};
use crate::engine::{build_args, EngineRunner, Phase};
use crate::status;

/// Drives the three phases against an immutable configuration.
///
/// Generic over the runner so tests can record invocations instead of
/// spawning restic.
pub struct Orchestrator<'a, R: EngineRunner> {
    config: &'a Config,
    runner: R,
}

impl<'a, R: EngineRunner> Orchestrator<'a, R> {
    pub fn new(config: &'a Config, runner: R) -> Self {
        Self { config, runner }
    }

    /// Run backup, prune, and check, in that order, regardless of each
    /// phase's outcome.
    pub fn run_all(&self) {
        self.backup();
        self.prune();
        self.check();
    }

    /// Back up every configured directory in order.
    ///
    /// Each directory is isolated: a missing path or a failed invocation is
    /// logged and the loop moves on. The phase "finishes" unconditionally,
    /// even if every directory failed.
    pub fn backup(&self) {
        info!("start backup");
        for dir in &self.config.directories {
            let path = expand_user(dir);
            if !path.exists() {
                error!(
                    "{} is not a valid directory and will not be backed up. \
                     Continuing with rest of directories.",
                    path.display()
                );
                continue;
            }

            let start = Instant::now();
            info!("backing up {}", path.display());
            let args = build_args(
                Phase::Backup,
                &self.config.repository,
                Some(&path),
                &self.config.backup_args,
            );

            let output = match self.runner.run(Phase::Backup, &args) {
                Ok(output) => output,
                Err(err) => {
                    error!("backup failed for {}:\n  {}", path.display(), err);
                    continue;
                }
            };

            if !output.success {
                error!(
                    "backup failed for {}:\n  {}",
                    path.display(),
                    output.stderr.trim_end()
                );
                continue;
            }

            if output.dry_run {
                continue;
            }

            match status::find_summary(&output.stdout) {
                Some(summary) => {
                    let elapsed = start.elapsed().as_secs_f64();
                    match status::summary_detail(&summary) {
                        Some(detail) => info!(
                            "successfully backed up {} in {:.2} seconds ({})",
                            path.display(),
                            elapsed,
                            detail
                        ),
                        None => info!(
                            "successfully backed up {} in {:.2} seconds",
                            path.display(),
                            elapsed
                        ),
                    }
                }
                // Zero exit without a summary record is still a success,
                // just without statistics to report.
                None => info!(
                    "backed up {} (no summary record in engine output)",
                    path.display()
                ),
            }
        }
        info!("backup finished");
    }

    /// Run the retention prune (`forget --prune`) once.
    pub fn prune(&self) {
        self.run_single(Phase::Prune, &self.config.prune_args);
    }

    /// Run the repository integrity check once.
    pub fn check(&self) {
        self.run_single(Phase::Check, &self.config.check_args);
    }

    fn run_single(&self, phase: Phase, extra: &[String]) {
        let start = Instant::now();
        info!("start {}", phase);
        let args = build_args(phase, &self.config.repository, None, extra);

        match self.runner.run(phase, &args) {
            // Command was already logged by the runner; nothing ran.
            Ok(output) if output.dry_run => {}
            Ok(output) if output.success => {
                info!("{} finished in {:.2} seconds", phase, start.elapsed().as_secs_f64());
            }
            Ok(output) => {
                error!("{} failed:\n  {}", phase, output.stderr.trim_end());
            }
            Err(err) => {
                error!("{} failed:\n  {}", phase, err);
            }
        }
    }
}
