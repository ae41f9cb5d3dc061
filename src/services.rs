//! systemd unit queries and changes
//!
//! All calls go through `systemctl`. Probes use `--quiet` and rely on the
//! exit code only.

use crate::command_runner::{CommandRunner, Invocation};
use crate::error::Result;

pub fn is_enabled_query(unit: &str) -> Invocation {
    Invocation::probe("systemctl", ["is-enabled", "--quiet", unit])
}

pub fn is_active_query(unit: &str) -> Invocation {
    Invocation::probe("systemctl", ["is-active", "--quiet", unit])
}

pub fn enable(unit: &str) -> Invocation {
    Invocation::mutation("systemctl", ["enable", unit])
}

pub fn start(unit: &str) -> Invocation {
    Invocation::mutation("systemctl", ["start", unit])
}

/// Pick up configuration changes; starts the unit if it is not running
pub fn reload_or_restart(unit: &str) -> Invocation {
    Invocation::mutation("systemctl", ["reload-or-restart", unit])
}

/// Whether the unit is enabled to start at boot
pub fn check_enabled<R: CommandRunner + ?Sized>(runner: &mut R, unit: &str) -> Result<bool> {
    Ok(runner.run(&is_enabled_query(unit))?.success)
}

/// Whether the unit is currently running
pub fn check_active<R: CommandRunner + ?Sized>(runner: &mut R, unit: &str) -> Result<bool> {
    Ok(runner.run(&is_active_query(unit))?.success)
}
