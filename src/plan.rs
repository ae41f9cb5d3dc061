//! Provisioning plan resolver
//!
//! Translates the detected distribution and the configuration into an ordered
//! list of component plans: packages, guarded setup steps, drop-in files and
//! systemd units.
//!
//! # Design
//!
//! - **Pure logic**: no I/O; only resolves names
//! - **Skips are data**: a component with no branch for the distribution
//!   carries a `skipped` reason that the installer turns into a warning

use strum::Display;

use crate::command_runner::Invocation;
use crate::components;
use crate::config_file::ProvisionConfig;
use crate::types::{DatabaseEngine, Distro};

/// Port the server-management console listens on; the one opened in the firewall
pub const CONSOLE_PORT: u16 = 9090;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ComponentKind {
    #[strum(serialize = "console")]
    Console,
    #[strum(serialize = "database")]
    Database,
    #[strum(serialize = "database admin")]
    DatabaseAdmin,
    #[strum(serialize = "source control")]
    SourceControl,
    #[strum(serialize = "editor")]
    Editor,
}

/// Condition meaning "already done"
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guard {
    /// A host path exists (e.g. an initialized data directory)
    PathExists(String),
    /// A program is on PATH
    BinaryExists(String),
}

/// A one-off command run only while its guard does not hold
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupStep {
    pub description: String,
    pub guard: Guard,
    pub invocation: Invocation,
    /// Unit to reload once the step has run
    pub reload: Option<String>,
}

/// A configuration file written verbatim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropIn {
    pub path: String,
    pub contents: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentPlan {
    pub kind: ComponentKind,
    pub title: String,
    pub packages: Vec<String>,
    pub setup: Vec<SetupStep>,
    pub drop_ins: Vec<DropIn>,
    pub services: Vec<String>,
    /// Why the whole component is skipped on this distribution
    pub skipped: Option<String>,
    /// Non-fatal notes raised while resolving (e.g. a part left out)
    pub notes: Vec<String>,
}

impl ComponentPlan {
    pub fn new(kind: ComponentKind, title: &str) -> Self {
        Self {
            kind,
            title: title.to_string(),
            packages: Vec::new(),
            setup: Vec::new(),
            drop_ins: Vec::new(),
            services: Vec::new(),
            skipped: None,
            notes: Vec::new(),
        }
    }

    /// A component with no branch for the distribution
    pub fn unsupported(kind: ComponentKind, title: &str, reason: impl Into<String>) -> Self {
        Self {
            skipped: Some(reason.into()),
            ..Self::new(kind, title)
        }
    }

    pub fn with_packages(mut self, packages: &[&str]) -> Self {
        self.packages.extend(packages.iter().map(|p| p.to_string()));
        self
    }

    pub fn with_service(mut self, unit: &str) -> Self {
        self.services.push(unit.to_string());
        self
    }

    pub fn with_setup(mut self, description: &str, guard: Guard, invocation: Invocation) -> Self {
        self.setup.push(SetupStep {
            description: description.to_string(),
            guard,
            invocation,
            reload: None,
        });
        self
    }

    /// Like [`with_setup`](Self::with_setup), reloading `unit` after the step
    pub fn with_setup_reloading(
        self,
        description: &str,
        guard: Guard,
        invocation: Invocation,
        unit: &str,
    ) -> Self {
        let mut plan = self.with_setup(description, guard, invocation);
        if let Some(step) = plan.setup.last_mut() {
            step.reload = Some(unit.to_string());
        }
        plan
    }

    pub fn with_drop_in(mut self, path: &str, contents: &str) -> Self {
        self.drop_ins.push(DropIn {
            path: path.to_string(),
            contents: contents.to_string(),
        });
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn is_skipped(&self) -> bool {
        self.skipped.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionPlan {
    pub distro: Distro,
    pub components: Vec<ComponentPlan>,
    pub database: DatabaseEngine,
    /// Port to open, if the firewall step is enabled
    pub firewall_port: Option<u16>,
}

impl ProvisionPlan {
    pub fn component(&self, kind: ComponentKind) -> Option<&ComponentPlan> {
        self.components.iter().find(|c| c.kind == kind)
    }

    /// Whether the component is in the plan and not skipped
    pub fn provisions(&self, kind: ComponentKind) -> bool {
        self.component(kind).is_some_and(|c| !c.is_skipped())
    }
}

/// Resolve the plan for a distribution.
///
/// Order: console, database, database admin, source control, editor.
/// The console is always included; the rest follow the configuration.
pub fn resolve_plan(
    distro: Distro,
    config: &ProvisionConfig,
    editor_user: Option<&str>,
) -> ProvisionPlan {
    let pm = distro.package_manager();
    let mut planned = vec![
        components::console::plan(pm),
        components::database::plan(pm, config.database),
    ];

    if config.database_admin {
        planned.push(components::admin::plan(pm));
    }
    if config.source_control {
        planned.push(components::forge::plan(pm));
    }
    if config.editor {
        planned.push(components::editor::plan(editor_user));
    }

    ProvisionPlan {
        distro,
        components: planned,
        database: config.database,
        firewall_port: config.open_firewall.then_some(CONSOLE_PORT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_plan_order() {
        let plan = resolve_plan(Distro::Fedora, &ProvisionConfig::default(), Some("dev"));
        let kinds: Vec<ComponentKind> = plan.components.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ComponentKind::Console,
                ComponentKind::Database,
                ComponentKind::DatabaseAdmin,
                ComponentKind::SourceControl,
                ComponentKind::Editor,
            ]
        );
        assert_eq!(plan.firewall_port, Some(CONSOLE_PORT));
    }

    #[test]
    fn test_disabled_components_are_omitted() {
        let config = ProvisionConfig {
            source_control: false,
            editor: false,
            database_admin: false,
            open_firewall: false,
            database: DatabaseEngine::Mariadb,
            ..ProvisionConfig::default()
        };
        let plan = resolve_plan(Distro::Debian, &config, None);
        assert_eq!(plan.components.len(), 2);
        assert_eq!(plan.firewall_port, None);
        assert!(plan.provisions(ComponentKind::Database));
        assert!(!plan.provisions(ComponentKind::Editor));
    }

    #[test]
    fn test_provisions_ignores_skipped() {
        let plan = resolve_plan(Distro::Ubuntu, &ProvisionConfig::default(), None);
        // No distribution package for Gitea on apt
        assert!(plan.component(ComponentKind::SourceControl).is_some());
        assert!(!plan.provisions(ComponentKind::SourceControl));
        assert!(plan.provisions(ComponentKind::DatabaseAdmin));
    }
}
