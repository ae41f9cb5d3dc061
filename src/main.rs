//! devhost - Main entry point
//!
//! Straight-line provisioning run: pre-flight, configuration, detection,
//! plan, provision, advisory. The first fatal error ends the run with exit 1.

use std::process::ExitCode;

use anyhow::Context;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use devhost::cli::Cli;
use devhost::command_runner::SystemRunner;
use devhost::config_file::ProvisionConfig;
use devhost::host::HostFs;
use devhost::{advisory, distro, installer, plan, sanity};

/// Initialize the logger with appropriate settings
fn init_logger() {
    // RUST_LOG overrides the default level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let mut runner = SystemRunner::new(cli.dry_run);

    sanity::run_preflight_checks(&runner, cli.skip_root_check || cli.dry_run);

    let config = match &cli.config {
        Some(path) => {
            info!("Loading configuration from: {:?}", path);
            ProvisionConfig::load_from_file(path)?
        }
        None => ProvisionConfig::default(),
    };
    config.validate().context("Configuration validation failed")?;
    debug!("Configuration: {:?}", config);

    let host = HostFs::default();
    let detected = distro::detect_distro(&host)?;
    debug!("Distribution identified via {}", detected.source);
    println!("✓ Detected {} ({})", detected.name, detected.distro);

    let editor_user = config.resolve_editor_user();
    let plan = plan::resolve_plan(detected.distro, &config, editor_user.as_deref());

    if cli.dry_run {
        println!("🔍 Dry run: no changes will be made");
    }

    let report = installer::provision(&mut runner, &host, &plan, cli.dry_run)?;
    info!(
        "Run finished: {} packages installed, {} services enabled, {} started",
        report.installed_packages.len(),
        report.enabled_services.len(),
        report.started_services.len()
    );
    if cli.dry_run {
        println!("🔍 Dry run complete: {} change(s) skipped", report.skipped.len());
    } else if !report.changed() {
        println!("✓ Host already provisioned; nothing to change");
    }

    advisory::print(&plan, &report);
    Ok(())
}

/// Main application entry point
fn main() -> ExitCode {
    init_logger();
    let cli = Cli::parse_args();
    debug!("CLI arguments parsed: {:?}", cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Provisioning aborted: {:#}", e);
            eprintln!("✗ {:#}", e);
            ExitCode::from(1)
        }
    }
}
