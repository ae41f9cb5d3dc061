//! Browser editor (code-server).
//!
//! Installed through the upstream install script, which picks the right
//! package format for the host. The unit is a template instantiated per user.

use crate::command_runner::Invocation;
use crate::plan::{ComponentKind, ComponentPlan, Guard};

pub const BINARY: &str = "code-server";
pub const INSTALL_SCRIPT_URL: &str = "https://code-server.dev/install.sh";

pub fn service_unit(user: &str) -> String {
    format!("code-server@{}", user)
}

pub fn plan(user: Option<&str>) -> ComponentPlan {
    let plan = ComponentPlan::new(ComponentKind::Editor, "code-server")
        .with_packages(&["curl"])
        .with_setup(
            "Install code-server",
            Guard::BinaryExists(BINARY.to_string()),
            Invocation::mutation(
                "sh",
                ["-c".to_string(), format!("curl -fsSL {} | sh", INSTALL_SCRIPT_URL)],
            ),
        );

    match user {
        Some(user) => plan.with_service(&service_unit(user)),
        None => plan.with_note(
            "no non-root user for code-server (set editor_user or run via sudo); \
             enable code-server@<user> manually",
        ),
    }
}
