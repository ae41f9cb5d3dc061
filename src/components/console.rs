//! Server-management console (Cockpit).
//!
//! Cockpit is packaged on every supported family and is socket-activated, so
//! enabling `cockpit.socket` is enough to serve the web UI on port 9090.

use crate::package_manager::PackageManager;
use crate::plan::{ComponentKind, ComponentPlan};

pub const PACKAGE: &str = "cockpit";
pub const SOCKET_UNIT: &str = "cockpit.socket";

/// Web service drop-in; logs idle sessions out after 15 minutes
pub const CONF_PATH: &str = "/etc/cockpit/cockpit.conf";
pub const CONF_CONTENTS: &str = "[Session]\nIdleTimeout = 15\n";

pub fn plan(_pm: PackageManager) -> ComponentPlan {
    ComponentPlan::new(ComponentKind::Console, "Cockpit")
        .with_packages(&[PACKAGE])
        .with_drop_in(CONF_PATH, CONF_CONTENTS)
        .with_service(SOCKET_UNIT)
}
