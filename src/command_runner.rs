//! External command execution
//!
//! This module provides the ONLY sanctioned way to run external programs.
//! Every package-manager, systemctl and firewall call is described as an
//! [`Invocation`] and executed through a [`CommandRunner`], which gives:
//!
//! - One place where the exact command line is logged
//! - Dry-run support: mutating invocations are skipped, probes still run
//! - A seam for tests, which substitute a scripted runner

use crate::error::{ProvisionError, Result};
use std::fmt;
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// A single external program call.
///
/// `mutating` separates read-only probes (`rpm -q`, `systemctl is-active`)
/// from calls that change host state (`dnf install`, `systemctl enable`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
    pub mutating: bool,
}

impl Invocation {
    fn new<I, S>(program: &str, args: I, mutating: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            env: Vec::new(),
            mutating,
        }
    }

    /// A read-only query of host state
    pub fn probe<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(program, args, false)
    }

    /// A call that changes host state
    pub fn mutation<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(program, args, true)
    }

    /// Add an environment variable override
    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.env.push((key.to_string(), value.to_string()));
        self
    }

    /// Program followed by its arguments, space separated
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.env {
            write!(f, "{}={} ", key, value)?;
        }
        f.write_str(&self.command_line())
    }
}

/// Output from an external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Standard output.
    pub stdout: String,
    /// Standard error.
    pub stderr: String,
    /// Exit code (None if terminated by signal).
    pub exit_code: Option<i32>,
    /// Whether the command exited successfully (exit code 0).
    pub success: bool,
    /// Whether the command was skipped by dry-run mode.
    pub dry_run: bool,
}

impl CommandOutput {
    /// A successful result with the given stdout
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
            exit_code: Some(0),
            success: true,
            dry_run: false,
        }
    }

    /// A failed result with the given exit code and stderr
    pub fn failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: stderr.into(),
            exit_code: Some(exit_code),
            success: false,
            dry_run: false,
        }
    }

    /// The placeholder result for a mutation skipped in dry-run mode
    pub fn skipped(invocation: &Invocation) -> Self {
        Self {
            stdout: format!("[DRY RUN] Skipped: {}\n", invocation),
            stderr: String::new(),
            exit_code: Some(0),
            success: true,
            dry_run: true,
        }
    }

    /// Check if the command succeeded and return an error if not.
    pub fn ensure_success(&self, context: &str) -> Result<()> {
        if self.success {
            Ok(())
        } else {
            Err(ProvisionError::step_failed(
                context,
                self.exit_code.unwrap_or(-1),
                self.stderr.trim(),
            ))
        }
    }
}

/// Executes invocations against the host.
pub trait CommandRunner {
    /// Run one invocation to completion.
    ///
    /// A non-zero exit is NOT an error here: probes rely on exit codes.
    /// `Err` means the program could not be run at all.
    fn run(&mut self, invocation: &Invocation) -> Result<CommandOutput>;

    /// Whether `name` resolves to an executable on `PATH`.
    fn binary_exists(&self, name: &str) -> bool;
}

/// Runner backed by real processes.
#[derive(Debug, Default)]
pub struct SystemRunner {
    dry_run: bool,
}

impl SystemRunner {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }
}

impl CommandRunner for SystemRunner {
    fn run(&mut self, invocation: &Invocation) -> Result<CommandOutput> {
        if self.dry_run && invocation.mutating {
            info!("[DRY RUN] Skipped: {}", invocation);
            return Ok(CommandOutput::skipped(invocation));
        }

        if invocation.mutating {
            info!("run: {}", invocation);
        } else {
            debug!("probe: {}", invocation);
        }

        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .envs(invocation.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| ProvisionError::Spawn {
                program: invocation.program.clone(),
                source,
            })?;

        let result = CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code(),
            success: output.status.success(),
            dry_run: false,
        };

        debug!("{} exited with {:?}", invocation.program, result.exit_code);
        Ok(result)
    }

    fn binary_exists(&self, name: &str) -> bool {
        match which::which(name) {
            Ok(path) => {
                debug!("lookup {}: {}", name, path.display());
                true
            }
            Err(_) => {
                debug!("lookup {}: not on PATH", name);
                false
            }
        }
    }
}
