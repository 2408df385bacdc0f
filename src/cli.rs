use clap::Parser;
use std::path::PathBuf;

/// restic-runner - unattended backup, prune, and check orchestration
#[derive(Parser, Debug)]
#[command(name = "restic-runner")]
#[command(about = "Runs restic backup, prune, and check over configured directories")]
#[command(version)]
pub struct Cli {
    /// Absolute path to configuration file.
    #[arg(long, default_value = "~/.config/restic-runner/config.json")]
    pub config_file: PathBuf,

    /// Absolute path to location of log file.
    #[arg(long, default_value = "~/.local/share/restic-runner/restic-runner.log")]
    pub log_file: PathBuf,

    /// Dry-run mode: log the restic commands each phase would run without
    /// executing them.
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }
}
