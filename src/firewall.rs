//! Firewall configuration
//!
//! Opens exactly one TCP port through whichever manager is present.
//! firewalld wins over ufw when both are installed. No manager at all is an
//! advisory condition, not an error.

use tracing::{debug, info};

use crate::command_runner::{CommandRunner, Invocation};
use crate::error::Result;
use crate::provisioner::Provisioner;
use crate::types::FirewallBackend;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirewallOutcome {
    Opened { backend: FirewallBackend, port: u16 },
    AlreadyOpen { backend: FirewallBackend, port: u16 },
    /// The port would be opened; skipped by dry-run mode
    Pending { backend: FirewallBackend, port: u16 },
    /// firewalld is installed but its daemon is not running
    Inactive { backend: FirewallBackend },
    NoManager,
}

fn port_spec(port: u16) -> String {
    format!("{}/tcp", port)
}

/// Whether `ufw status` output already allows the port
pub fn ufw_rule_present(status: &str, port: u16) -> bool {
    let with_proto = port_spec(port);
    let bare = port.to_string();
    status.lines().any(|line| {
        let mut columns = line.split_whitespace();
        let Some(target) = columns.next() else {
            return false;
        };
        (target == with_proto || target == bare) && line.contains("ALLOW")
    })
}

/// Find the firewall manager on PATH, firewalld first
pub fn detect_backend<R: CommandRunner + ?Sized>(
    p: &Provisioner<'_, R>,
) -> Option<FirewallBackend> {
    let backend = [FirewallBackend::Firewalld, FirewallBackend::Ufw]
        .into_iter()
        .find(|backend| p.binary_exists(backend.binary()))?;
    debug!("Firewall manager found: {}", backend);
    Some(backend)
}

/// Open `port/tcp` unless it is already open.
pub fn ensure_port_open<R: CommandRunner + ?Sized>(
    p: &mut Provisioner<'_, R>,
    port: u16,
) -> Result<FirewallOutcome> {
    let outcome = match detect_backend(p) {
        Some(FirewallBackend::Firewalld) => firewalld(p, port)?,
        Some(FirewallBackend::Ufw) => ufw(p, port)?,
        None => {
            p.warn(format!(
                "no firewall manager found (firewalld or ufw); make sure port {} is reachable",
                port_spec(port)
            ));
            FirewallOutcome::NoManager
        }
    };
    p.report_mut().firewall = Some(outcome);
    Ok(outcome)
}

fn firewalld<R: CommandRunner + ?Sized>(
    p: &mut Provisioner<'_, R>,
    port: u16,
) -> Result<FirewallOutcome> {
    let backend = FirewallBackend::Firewalld;
    let spec = port_spec(port);

    if !p.probe(&Invocation::probe("firewall-cmd", ["--state"]))?.success {
        p.warn(format!(
            "firewalld is installed but not running; port {} was not opened",
            spec
        ));
        return Ok(FirewallOutcome::Inactive { backend });
    }

    let query = Invocation::probe(
        "firewall-cmd",
        ["--permanent".to_string(), format!("--query-port={}", spec)],
    );
    if p.probe(&query)?.success {
        info!("firewalld already allows {}", spec);
        return Ok(FirewallOutcome::AlreadyOpen { backend, port });
    }

    let applied = p.apply(
        &format!("Open {} in firewalld", spec),
        &Invocation::mutation(
            "firewall-cmd",
            ["--permanent".to_string(), format!("--add-port={}", spec)],
        ),
    )?;
    p.run_step("Reload firewalld", &Invocation::mutation("firewall-cmd", ["--reload"]))?;
    if !applied {
        return Ok(FirewallOutcome::Pending { backend, port });
    }
    println!("  + opened {} (firewalld)", spec);
    Ok(FirewallOutcome::Opened { backend, port })
}

fn ufw<R: CommandRunner + ?Sized>(
    p: &mut Provisioner<'_, R>,
    port: u16,
) -> Result<FirewallOutcome> {
    let backend = FirewallBackend::Ufw;
    let spec = port_spec(port);

    let status = p.probe(&Invocation::probe("ufw", ["status"]))?;
    if status.success && ufw_rule_present(&status.stdout, port) {
        info!("ufw already allows {}", spec);
        return Ok(FirewallOutcome::AlreadyOpen { backend, port });
    }

    let applied = p.apply(
        &format!("Open {} in ufw", spec),
        &Invocation::mutation("ufw", ["allow".to_string(), spec.clone()]),
    )?;
    if !applied {
        return Ok(FirewallOutcome::Pending { backend, port });
    }
    println!("  + opened {} (ufw)", spec);
    Ok(FirewallOutcome::Opened { backend, port })
}
