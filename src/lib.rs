//! devhost library
//!
//! This library provides the core functionality of the host provisioner:
//! distribution detection, idempotent package/service operations, firewall
//! configuration and the post-run guidance.

pub mod advisory;
pub mod cli;
pub mod command_runner;
pub mod components;
pub mod config_file;
pub mod distro;
pub mod error;
pub mod firewall;
pub mod host;
pub mod installer;
pub mod package_manager;
pub mod plan;
pub mod provisioner;
pub mod sanity;
pub mod services;
pub mod types;

// Re-export main types for convenience
pub use command_runner::{CommandOutput, CommandRunner, Invocation, SystemRunner};
pub use config_file::ProvisionConfig;
pub use distro::{DetectedDistro, DetectionSource, OsRelease, detect_distro, parse_os_release};
pub use error::ProvisionError;
pub use firewall::FirewallOutcome;
pub use host::HostFs;
pub use installer::provision;
pub use package_manager::PackageManager;
pub use plan::{
    CONSOLE_PORT, ComponentKind, ComponentPlan, DropIn, Guard, ProvisionPlan, SetupStep,
    resolve_plan,
};
pub use provisioner::{FileOutcome, ProvisionReport, Provisioner};
pub use types::{DatabaseEngine, Distro, FirewallBackend};
