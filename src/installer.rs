//! Installer module
//!
//! Applies a resolved [`ProvisionPlan`] to the host, strictly in order:
//! each component's packages, setup steps, drop-in files and services, then
//! the firewall. The first fatal error stops the run.

use tracing::info;

use crate::command_runner::CommandRunner;
use crate::error::Result;
use crate::firewall;
use crate::host::HostFs;
use crate::plan::{ComponentPlan, ProvisionPlan};
use crate::provisioner::{ProvisionReport, Provisioner};

/// Provision every component in the plan.
pub fn provision<R: CommandRunner + ?Sized>(
    runner: &mut R,
    host: &HostFs,
    plan: &ProvisionPlan,
    dry_run: bool,
) -> Result<ProvisionReport> {
    let pm = plan.distro.package_manager();
    info!(
        "Provisioning {} via {} ({} components)",
        plan.distro,
        pm,
        plan.components.len()
    );

    let mut p = Provisioner::new(runner, host, pm, dry_run);

    for component in &plan.components {
        println!("==> {} ({})", component.title, component.kind);
        provision_component(&mut p, component)?;
    }

    if let Some(port) = plan.firewall_port {
        println!("==> Firewall");
        firewall::ensure_port_open(&mut p, port)?;
    }

    Ok(p.into_report())
}

fn provision_component<R: CommandRunner + ?Sized>(
    p: &mut Provisioner<'_, R>,
    component: &ComponentPlan,
) -> Result<()> {
    if let Some(reason) = &component.skipped {
        p.warn(format!("{} skipped: {}", component.title, reason));
        return Ok(());
    }

    p.ensure_packages(&component.packages)?;

    for step in &component.setup {
        p.run_setup_step(step)?;
    }

    for drop_in in &component.drop_ins {
        p.ensure_drop_in(drop_in)?;
    }

    for unit in &component.services {
        p.ensure_service(unit)?;
    }

    for note in &component.notes {
        p.warn(format!("{}: {}", component.title, note));
    }

    Ok(())
}
