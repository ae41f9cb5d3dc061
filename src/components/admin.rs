//! Database admin web UI (Adminer).
//!
//! Only Debian and Ubuntu package Adminer. The package ships an Apache
//! snippet that must be linked into `conf-available` and enabled before
//! `/adminer/` is served; elsewhere the component is skipped.

use crate::command_runner::Invocation;
use crate::package_manager::PackageManager;
use crate::plan::{ComponentKind, ComponentPlan, Guard};

const TITLE: &str = "Adminer";

pub const APACHE_UNIT: &str = "apache2";
pub const PACKAGED_CONF: &str = "/etc/adminer/apache.conf";
pub const AVAILABLE_CONF: &str = "/etc/apache2/conf-available/adminer.conf";
pub const ENABLED_CONF: &str = "/etc/apache2/conf-enabled/adminer.conf";

pub fn plan(pm: PackageManager) -> ComponentPlan {
    match pm {
        PackageManager::Apt => ComponentPlan::new(ComponentKind::DatabaseAdmin, TITLE)
            .with_packages(&["adminer", APACHE_UNIT])
            .with_setup(
                "Link Adminer Apache config",
                Guard::PathExists(AVAILABLE_CONF.to_string()),
                Invocation::mutation("ln", ["-sf", PACKAGED_CONF, AVAILABLE_CONF]),
            )
            .with_setup_reloading(
                "Enable Adminer Apache config",
                Guard::PathExists(ENABLED_CONF.to_string()),
                Invocation::mutation("a2enconf", ["adminer"]),
                APACHE_UNIT,
            )
            .with_service(APACHE_UNIT),
        PackageManager::Dnf | PackageManager::Pacman | PackageManager::Zypper => {
            ComponentPlan::unsupported(
                ComponentKind::DatabaseAdmin,
                TITLE,
                format!("no {pm} package for Adminer; deploy it from https://www.adminer.org"),
            )
        }
    }
}
