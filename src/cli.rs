use clap::Parser;
use std::path::PathBuf;

/// devhost - provision a Linux host with Cockpit and developer services
///
/// Detects the distribution, installs Cockpit, Gitea, code-server, a database
/// and Adminer where packaged, opens the Cockpit port, and prints guidance.
/// Every step checks the host first, so re-running is safe.
#[derive(Parser, Debug)]
#[command(name = "devhost")]
#[command(about = "Provision a Linux host with Cockpit and developer services")]
#[command(version)]
pub struct Cli {
    /// Dry-run mode: show what would be executed without making changes.
    ///
    /// Mutating commands (install, enable, start, firewall rules) and file
    /// writes are skipped and logged. Read-only probes still execute so the
    /// preview reflects the host.
    #[arg(long)]
    pub dry_run: bool,

    /// Path to a JSON configuration file (all fields optional)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Skip the root privilege check (development only)
    #[arg(long)]
    pub skip_root_check: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
