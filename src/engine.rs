//! Restic invocation layer.
//!
//! This module is the only sanctioned way to run the backup engine. It owns
//! argument assembly for each phase and the blocking subprocess call that
//! captures stdout/stderr. The `EngineRunner` trait is the seam the
//! orchestrator is generic over, so tests can substitute a recording runner
//! without spawning anything.

use std::path::Path;
use std::process::Command;

use tracing::info;

use crate::error::{Result, RunnerError};

/// Name of the restic binary, resolved through `PATH`.
pub const ENGINE_BINARY: &str = "restic";

/// The three top-level operations, run in fixed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Phase {
    Backup,
    Prune,
    Check,
}

impl Phase {
    /// The restic subcommand for this phase. Note prune maps to `forget`;
    /// the `--prune` flag is part of the phase flags.
    pub fn subcommand(&self) -> &'static str {
        match self {
            Phase::Backup => "backup",
            Phase::Prune => "forget",
            Phase::Check => "check",
        }
    }

    /// Required flags placed directly after the subcommand.
    pub fn flags(&self) -> &'static [&'static str] {
        match self {
            Phase::Backup => &["--json"],
            Phase::Prune => &["--prune", "--json"],
            Phase::Check => &["--json"],
        }
    }
}

/// Assemble the full argument vector for one invocation:
/// `-r <repository> <subcommand> <flags...> [path] [extra...]`.
///
/// Extra arguments always come last, after the required flags and, for
/// backup, after the target path.
pub fn build_args(
    phase: Phase,
    repository: &str,
    path: Option<&Path>,
    extra: &[String],
) -> Vec<String> {
    let mut args = vec![
        "-r".to_string(),
        repository.to_string(),
        phase.subcommand().to_string(),
    ];
    args.extend(phase.flags().iter().map(|flag| flag.to_string()));
    if let Some(path) = path {
        args.push(path.display().to_string());
    }
    args.extend(extra.iter().cloned());
    args
}

/// Output from one engine invocation.
#[derive(Debug, Clone)]
pub struct EngineOutput {
    /// Standard output, lossily decoded as UTF-8.
    pub stdout: String,
    /// Standard error, lossily decoded as UTF-8.
    pub stderr: String,
    /// Exit code (None if terminated by signal).
    pub exit_code: Option<i32>,
    /// Whether the engine exited successfully (exit code 0).
    pub success: bool,
    /// Whether execution was skipped in dry-run mode.
    pub dry_run: bool,
}

/// Execution seam between the orchestrator and the engine subprocess.
pub trait EngineRunner {
    /// Run one engine invocation to completion, blocking the caller.
    ///
    /// A non-zero exit status is NOT an `Err`; it comes back as an
    /// `EngineOutput` with `success: false`. Only a failure to launch the
    /// engine at all is an error, and even that is absorbed by the
    /// orchestrator as an isolated failure.
    fn run(&self, phase: Phase, args: &[String]) -> Result<EngineOutput>;
}

impl<T: EngineRunner> EngineRunner for &T {
    fn run(&self, phase: Phase, args: &[String]) -> Result<EngineOutput> {
        (*self).run(phase, args)
    }
}

/// The real runner: spawns `restic` synchronously with captured output.
#[derive(Debug, Clone, Copy)]
pub struct ResticRunner {
    dry_run: bool,
}

impl ResticRunner {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }
}

impl EngineRunner for ResticRunner {
    fn run(&self, phase: Phase, args: &[String]) -> Result<EngineOutput> {
        // Log the exact command line for transparency
        info!("running: {} {}", ENGINE_BINARY, args.join(" "));

        if self.dry_run {
            return Ok(EngineOutput {
                stdout: format!("[DRY RUN] Skipped: {} {}\n", ENGINE_BINARY, args.join(" ")),
                stderr: String::new(),
                exit_code: Some(0),
                success: true,
                dry_run: true,
            });
        }

        let output = Command::new(ENGINE_BINARY).args(args).output().map_err(|e| {
            RunnerError::engine(format!("failed to spawn {} for {}: {}", ENGINE_BINARY, phase, e))
        })?;

        Ok(EngineOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code(),
            success: output.status.success(),
            dry_run: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::Backup.to_string(), "backup");
        assert_eq!(Phase::Prune.to_string(), "prune");
        assert_eq!(Phase::Check.to_string(), "check");
    }

    #[test]
    fn test_phase_subcommands() {
        assert_eq!(Phase::Backup.subcommand(), "backup");
        assert_eq!(Phase::Prune.subcommand(), "forget");
        assert_eq!(Phase::Check.subcommand(), "check");
    }

    #[test]
    fn test_build_args_backup() {
        let path = PathBuf::from("/home/user/docs");
        let extra = vec!["--exclude".to_string(), "*.tmp".to_string()];
        let args = build_args(Phase::Backup, "/srv/repo", Some(&path), &extra);

        assert_eq!(
            args,
            vec![
                "-r",
                "/srv/repo",
                "backup",
                "--json",
                "/home/user/docs",
                "--exclude",
                "*.tmp"
            ]
        );
    }

    #[test]
    fn test_build_args_prune() {
        let extra = vec!["--keep-daily".to_string(), "7".to_string()];
        let args = build_args(Phase::Prune, "/srv/repo", None, &extra);

        assert_eq!(
            args,
            vec!["-r", "/srv/repo", "forget", "--prune", "--json", "--keep-daily", "7"]
        );
    }

    #[test]
    fn test_build_args_check_no_extra() {
        let args = build_args(Phase::Check, "/srv/repo", None, &[]);
        assert_eq!(args, vec!["-r", "/srv/repo", "check", "--json"]);
    }

    #[test]
    fn test_dry_run_skips_execution() {
        let runner = ResticRunner::new(true);
        let args = build_args(Phase::Check, "/srv/repo", None, &[]);
        let output = runner.run(Phase::Check, &args).unwrap();

        assert!(output.dry_run);
        assert!(output.success);
        assert_eq!(output.exit_code, Some(0));
        assert!(output.stdout.contains("[DRY RUN]"));
        assert!(output.stdout.contains("check"));
    }

    #[test]
    fn test_engine_output_clone() {
        let output = EngineOutput {
            stdout: "out".to_string(),
            stderr: "err".to_string(),
            exit_code: Some(1),
            success: false,
            dry_run: false,
        };
        let cloned = output.clone();
        assert_eq!(cloned.stdout, output.stdout);
        assert_eq!(cloned.exit_code, output.exit_code);
        assert_eq!(cloned.success, output.success);
    }
}
