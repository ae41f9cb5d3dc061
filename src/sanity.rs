//! Pre-flight sanity checks for runtime environment
//!
//! This module verifies the system environment before anything is changed:
//! - Required runtime binaries are present
//! - Running with root privileges (EUID 0)
//!
//! If any check fails, the program exits with a clear error message.

use crate::command_runner::CommandRunner;

/// Result of environment verification
#[derive(Debug)]
pub struct SanityCheckResult {
    pub missing_binaries: Vec<String>,
    pub is_root: bool,
}

impl SanityCheckResult {
    /// Returns true if all checks passed
    pub fn is_ok(&self) -> bool {
        self.missing_binaries.is_empty() && self.is_root
    }
}

/// Required runtime binaries
const REQUIRED_BINARIES: &[&str] = &[
    "systemctl", // Service management (systemd)
];

/// Optional binaries (logged if missing but don't fail)
const OPTIONAL_BINARIES: &[&str] = &[
    "firewall-cmd", // firewalld front-end
    "ufw",          // Uncomplicated Firewall
];

/// Check if running as root (EUID 0)
fn is_running_as_root() -> bool {
    nix::unistd::geteuid().is_root()
}

/// Perform all sanity checks and return the result
pub fn verify_environment<R: CommandRunner + ?Sized>(runner: &R) -> SanityCheckResult {
    let mut missing = Vec::new();

    for binary in REQUIRED_BINARIES {
        if !runner.binary_exists(binary) {
            missing.push((*binary).to_string());
        }
    }

    for binary in OPTIONAL_BINARIES {
        if !runner.binary_exists(binary) {
            tracing::debug!("Optional binary not found: {}", binary);
        }
    }

    SanityCheckResult {
        missing_binaries: missing,
        is_root: is_running_as_root(),
    }
}

/// Print a pretty error message to stderr and exit
pub fn print_error_and_exit(result: &SanityCheckResult) -> ! {
    eprintln!();
    eprintln!("╔══════════════════════════════════════════════════════════════════╗");
    eprintln!("║                 devhost - Pre-flight Check Failed                ║");
    eprintln!("╚══════════════════════════════════════════════════════════════════╝");
    eprintln!();

    if !result.is_root {
        eprintln!("❌ ERROR: Root privileges required");
        eprintln!("   devhost installs packages, enables services and edits firewall rules.");
        eprintln!();
        eprintln!("   Solution: Run with sudo or as root user:");
        eprintln!("     sudo devhost");
        eprintln!();
    }

    if !result.missing_binaries.is_empty() {
        eprintln!("❌ ERROR: Missing required binaries");
        eprintln!();
        for binary in &result.missing_binaries {
            eprintln!("   • {}", binary);
        }
        eprintln!();
        eprintln!("   devhost supports systemd-based distributions only.");
        eprintln!();
    }

    eprintln!("╔══════════════════════════════════════════════════════════════════╗");
    eprintln!("║  Fix the above issues and try again.                             ║");
    eprintln!("╚══════════════════════════════════════════════════════════════════╝");
    eprintln!();

    std::process::exit(1);
}

/// Skip root check (for development/testing)
/// Set DEVHOST_SKIP_ROOT_CHECK=1 to skip
pub fn should_skip_root_check() -> bool {
    std::env::var("DEVHOST_SKIP_ROOT_CHECK")
        .map(|v| v == "1" || v.to_lowercase() == "true")
        .unwrap_or(false)
}

/// Run pre-flight checks with optional root check skip
pub fn run_preflight_checks<R: CommandRunner + ?Sized>(runner: &R, skip_root: bool) {
    tracing::debug!("Running pre-flight sanity checks (skip_root={})...", skip_root);

    let mut result = verify_environment(runner);

    if skip_root || should_skip_root_check() {
        tracing::warn!("Root check skipped");
        result.is_root = true; // Pretend we're root
    }

    if !result.is_ok() {
        print_error_and_exit(&result);
    }

    tracing::info!("Pre-flight checks passed");
}
