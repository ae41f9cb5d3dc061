//! Operational and security guidance printed after a successful run.

use crate::firewall::FirewallOutcome;
use crate::plan::{CONSOLE_PORT, ComponentKind, ProvisionPlan};
use crate::provisioner::ProvisionReport;
use crate::types::DatabaseEngine;

const GITEA_PORT: u16 = 3000;
const CODE_SERVER_PORT: u16 = 8080;

/// Build the guidance text for the components that were provisioned
pub fn render(plan: &ProvisionPlan, report: &ProvisionReport) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(String::new());
    lines.push("Provisioning complete.".to_string());
    lines.push(String::new());
    lines.push("Access:".to_string());
    lines.push(format!(
        "  Cockpit      https://<this-host>:{}  (log in with a local system account)",
        CONSOLE_PORT
    ));
    if plan.provisions(ComponentKind::SourceControl) {
        lines.push(format!(
            "  Gitea        http://<this-host>:{}  (finish the web installer first)",
            GITEA_PORT
        ));
    }
    if plan.provisions(ComponentKind::Editor) {
        lines.push(format!(
            "  code-server  http://127.0.0.1:{}  (password in ~/.config/code-server/config.yaml)",
            CODE_SERVER_PORT
        ));
    }
    if plan.provisions(ComponentKind::DatabaseAdmin) {
        lines.push("  Adminer      http://<this-host>/adminer/".to_string());
    }

    lines.push(String::new());
    lines.push("Security:".to_string());
    lines.push(format!(
        "  - Restrict port {} to trusted networks; Cockpit grants full administrative access.",
        CONSOLE_PORT
    ));
    lines.push(
        "  - Replace Cockpit's self-signed certificate under /etc/cockpit/ws-certs.d/."
            .to_string(),
    );
    if plan.provisions(ComponentKind::Editor) {
        lines.push(
            "  - Keep code-server bound to localhost; reach it through an SSH tunnel or a TLS proxy."
                .to_string(),
        );
    }
    if plan.provisions(ComponentKind::Database) {
        lines.push(database_hint(plan.database).to_string());
    }
    if plan.provisions(ComponentKind::DatabaseAdmin) {
        lines.push(
            "  - Do not expose Adminer publicly; limit /adminer/ to trusted addresses.".to_string(),
        );
    }
    lines.push("  - Apply OS updates regularly.".to_string());

    if matches!(report.firewall, Some(FirewallOutcome::NoManager)) {
        lines.push(format!(
            "  - No firewall manager was found: every listening service is reachable. Port {} must be allowed explicitly once one is installed.",
            CONSOLE_PORT
        ));
    }

    if !report.warnings.is_empty() {
        lines.push(String::new());
        lines.push("Warnings:".to_string());
        for warning in &report.warnings {
            lines.push(format!("  ! {}", warning));
        }
    }

    lines.join("\n")
}

fn database_hint(engine: DatabaseEngine) -> &'static str {
    match engine {
        DatabaseEngine::Postgresql => {
            "  - Set a password for the postgres role: sudo -u postgres psql -c '\\password postgres'"
        }
        DatabaseEngine::Mariadb => {
            "  - Secure MariaDB: run mariadb-secure-installation and remove anonymous users."
        }
    }
}

/// Print the guidance to stdout
pub fn print(plan: &ProvisionPlan, report: &ProvisionReport) {
    println!("{}", render(plan, report));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config_file::ProvisionConfig;
    use crate::plan::resolve_plan;
    use crate::types::Distro;

    #[test]
    fn test_render_lists_provisioned_services_only() {
        let plan = resolve_plan(Distro::Ubuntu, &ProvisionConfig::default(), Some("dev"));
        let text = render(&plan, &ProvisionReport::default());

        assert!(text.contains("https://<this-host>:9090"));
        assert!(text.contains("code-server"));
        assert!(text.contains("Adminer"));
        // Gitea has no apt branch
        assert!(!text.contains("Gitea "));
        assert!(text.contains("postgres"));
    }

    #[test]
    fn test_render_mariadb_hint() {
        let config = ProvisionConfig {
            database: DatabaseEngine::Mariadb,
            ..ProvisionConfig::default()
        };
        let plan = resolve_plan(Distro::Arch, &config, None);
        let text = render(&plan, &ProvisionReport::default());
        assert!(text.contains("mariadb-secure-installation"));
        assert!(text.contains("Gitea "));
    }

    #[test]
    fn test_render_repeats_warnings() {
        let plan = resolve_plan(Distro::Fedora, &ProvisionConfig::default(), None);
        let report = ProvisionReport {
            warnings: vec!["Gitea skipped: no dnf package".to_string()],
            firewall: Some(FirewallOutcome::NoManager),
            ..ProvisionReport::default()
        };
        let text = render(&plan, &report);
        assert!(text.contains("Warnings:"));
        assert!(text.contains("  ! Gitea skipped: no dnf package"));
        assert!(text.contains("No firewall manager was found"));
    }
}
