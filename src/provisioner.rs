//! Idempotent "ensure" operations
//!
//! Every operation here checks host state first and mutates only when the
//! resource is absent or inactive. Any failing mutation is returned as an
//! error and the caller stops; nothing is retried or rolled back.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::command_runner::{CommandOutput, CommandRunner, Invocation};
use crate::error::{ProvisionError, Result};
use crate::firewall::FirewallOutcome;
use crate::host::HostFs;
use crate::package_manager::PackageManager;
use crate::plan::{DropIn, Guard, SetupStep};
use crate::services;

/// What a drop-in write did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    Written,
    Unchanged,
    /// Present with other contents; left for the administrator
    Kept,
}

/// Everything the run changed or warned about
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvisionReport {
    pub installed_packages: Vec<String>,
    pub enabled_services: Vec<String>,
    pub started_services: Vec<String>,
    pub setup_steps: Vec<String>,
    pub written_files: Vec<PathBuf>,
    /// Mutations skipped by dry-run mode, in order
    pub skipped: Vec<String>,
    pub warnings: Vec<String>,
    pub firewall: Option<FirewallOutcome>,
}

impl ProvisionReport {
    /// Whether the run changed anything on the host.
    ///
    /// Always false for a dry run; see [`skipped`](Self::skipped) instead.
    pub fn changed(&self) -> bool {
        !self.installed_packages.is_empty()
            || !self.enabled_services.is_empty()
            || !self.started_services.is_empty()
            || !self.setup_steps.is_empty()
            || !self.written_files.is_empty()
            || matches!(self.firewall, Some(FirewallOutcome::Opened { .. }))
    }
}

/// Applies ensure operations through a runner.
pub struct Provisioner<'a, R: CommandRunner + ?Sized> {
    runner: &'a mut R,
    host: &'a HostFs,
    pm: PackageManager,
    dry_run: bool,
    refreshed: bool,
    report: ProvisionReport,
}

impl<'a, R: CommandRunner + ?Sized> Provisioner<'a, R> {
    pub fn new(runner: &'a mut R, host: &'a HostFs, pm: PackageManager, dry_run: bool) -> Self {
        Self {
            runner,
            host,
            pm,
            dry_run,
            refreshed: false,
            report: ProvisionReport::default(),
        }
    }

    pub fn report(&self) -> &ProvisionReport {
        &self.report
    }

    pub fn report_mut(&mut self) -> &mut ProvisionReport {
        &mut self.report
    }

    pub fn into_report(self) -> ProvisionReport {
        self.report
    }

    /// Run a read-only probe; only spawn failures are errors
    pub fn probe(&mut self, invocation: &Invocation) -> Result<CommandOutput> {
        debug_assert!(!invocation.mutating);
        self.runner.run(invocation)
    }

    /// Run a mutating step; a non-zero exit becomes [`ProvisionError::StepFailed`]
    pub fn run_step(&mut self, context: &str, invocation: &Invocation) -> Result<CommandOutput> {
        let output = self.runner.run(invocation)?;
        output.ensure_success(context)?;
        if output.dry_run {
            self.report.skipped.push(invocation.to_string());
        }
        Ok(output)
    }

    /// Run a mutating step; true if it actually changed the host
    pub fn apply(&mut self, context: &str, invocation: &Invocation) -> Result<bool> {
        Ok(!self.run_step(context, invocation)?.dry_run)
    }

    /// Record an advisory condition and continue
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!("{}", message);
        println!("  ! {}", message);
        self.report.warnings.push(message);
    }

    /// Whether a program is on PATH
    pub fn binary_exists(&self, name: &str) -> bool {
        self.runner.binary_exists(name)
    }

    pub fn is_installed(&mut self, package: &str) -> Result<bool> {
        let query = self.pm.query_installed(package);
        let output = self.probe(&query)?;
        Ok(self.pm.reports_installed(&output))
    }

    /// Install whichever of `packages` are missing.
    ///
    /// The package index is refreshed at most once per run, right before the
    /// first install that is actually needed. Returns the packages installed.
    pub fn ensure_packages(&mut self, packages: &[String]) -> Result<Vec<String>> {
        let mut missing = Vec::new();
        for package in packages {
            if self.is_installed(package)? {
                debug!("{} already installed", package);
            } else {
                missing.push(package.clone());
            }
        }

        if missing.is_empty() {
            if !packages.is_empty() {
                info!("Already installed: {}", packages.join(" "));
            }
            return Ok(missing);
        }

        if !self.refreshed {
            let refresh = self.pm.refresh();
            self.run_step("Refresh package index", &refresh)?;
            self.refreshed = true;
        }

        println!("  + installing {}", missing.join(" "));
        let install = self.pm.install(&missing);
        if self.apply(&format!("Install {}", missing.join(" ")), &install)? {
            self.report.installed_packages.extend(missing.iter().cloned());
        }
        Ok(missing)
    }

    /// Enable the unit unless it already is. Returns whether it changed.
    pub fn ensure_service_enabled(&mut self, unit: &str) -> Result<bool> {
        if services::check_enabled(&mut *self.runner, unit)? {
            debug!("{} already enabled", unit);
            return Ok(false);
        }
        if self.apply(&format!("Enable {}", unit), &services::enable(unit))? {
            println!("  + enabled {}", unit);
            self.report.enabled_services.push(unit.to_string());
        }
        Ok(true)
    }

    /// Start the unit unless it is already active. Returns whether it changed.
    pub fn ensure_service_started(&mut self, unit: &str) -> Result<bool> {
        if services::check_active(&mut *self.runner, unit)? {
            debug!("{} already active", unit);
            return Ok(false);
        }
        if self.apply(&format!("Start {}", unit), &services::start(unit))? {
            println!("  + started {}", unit);
            self.report.started_services.push(unit.to_string());
        }
        Ok(true)
    }

    pub fn ensure_service(&mut self, unit: &str) -> Result<()> {
        self.ensure_service_enabled(unit)?;
        self.ensure_service_started(unit)?;
        Ok(())
    }

    /// Whether the guard condition already holds
    pub fn guard_holds(&self, guard: &Guard) -> Result<bool> {
        match guard {
            Guard::PathExists(path) => Ok(self.host.exists(path)),
            Guard::BinaryExists(name) => Ok(self.binary_exists(name)),
        }
    }

    /// Run a setup step unless its guard holds. Returns whether it ran.
    ///
    /// A step with a `reload` unit reloads (or restarts) that unit right after.
    pub fn run_setup_step(&mut self, step: &SetupStep) -> Result<bool> {
        if self.guard_holds(&step.guard)? {
            debug!("{}: already done ({:?})", step.description, step.guard);
            return Ok(false);
        }
        println!("  + {}", step.description.to_lowercase());
        let applied = self.apply(&step.description, &step.invocation)?;
        if let Some(unit) = &step.reload {
            self.apply(&format!("Reload {}", unit), &services::reload_or_restart(unit))?;
        }
        if applied {
            self.report.setup_steps.push(step.description.clone());
        }
        Ok(true)
    }

    /// Write a drop-in file if it is absent.
    ///
    /// An identical file is left alone. A file with different contents is
    /// kept as-is with a warning.
    pub fn ensure_drop_in(&mut self, drop_in: &DropIn) -> Result<FileOutcome> {
        let path = self.host.path(&drop_in.path);
        match self.host.read_optional(&drop_in.path)? {
            Some(existing) if existing == drop_in.contents => {
                debug!("{} up to date", path.display());
                Ok(FileOutcome::Unchanged)
            }
            Some(_) => {
                self.warn(format!(
                    "{} exists with local changes; left untouched",
                    drop_in.path
                ));
                Ok(FileOutcome::Kept)
            }
            None if self.dry_run => {
                info!("[DRY RUN] Skipped: write {}", path.display());
                self.report.skipped.push(format!("write {}", drop_in.path));
                Ok(FileOutcome::Written)
            }
            None => {
                self.host
                    .write(&drop_in.path, &drop_in.contents)
                    .map_err(|e| {
                        ProvisionError::step_failed(
                            format!("Write {}", drop_in.path),
                            -1,
                            e.to_string(),
                        )
                    })?;
                info!("Wrote {}", path.display());
                println!("  + wrote {}", drop_in.path);
                self.report.written_files.push(path);
                Ok(FileOutcome::Written)
            }
        }
    }
}
