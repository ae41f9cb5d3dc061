//! Source-control server (Gitea).

use crate::package_manager::PackageManager;
use crate::plan::{ComponentKind, ComponentPlan};

const TITLE: &str = "Gitea";

pub fn plan(pm: PackageManager) -> ComponentPlan {
    match pm {
        PackageManager::Pacman | PackageManager::Zypper => {
            ComponentPlan::new(ComponentKind::SourceControl, TITLE)
                .with_packages(&["gitea"])
                .with_service("gitea")
        }
        PackageManager::Apt | PackageManager::Dnf => ComponentPlan::unsupported(
            ComponentKind::SourceControl,
            TITLE,
            format!("no {pm} package for Gitea; install the binary from https://dl.gitea.com"),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gitea_packaged_on_arch_and_suse() {
        for pm in [PackageManager::Pacman, PackageManager::Zypper] {
            let plan = plan(pm);
            assert_eq!(plan.packages, vec!["gitea".to_string()]);
            assert_eq!(plan.services, vec!["gitea".to_string()]);
        }
    }

    #[test]
    fn test_gitea_skipped_on_apt() {
        let plan = plan(PackageManager::Apt);
        assert!(plan.is_skipped());
        assert!(plan.services.is_empty());
    }
}
