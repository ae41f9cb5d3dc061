//! Type-safe identifiers for devhost
//!
//! Closed sets the rest of the crate matches on exhaustively: the supported
//! distributions, database engines, and firewall managers.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::package_manager::PackageManager;

/// Supported Linux distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Distro {
    Ubuntu,
    Debian,
    Linuxmint,
    Fedora,
    Rhel,
    Centos,
    Rocky,
    Almalinux,
    Arch,
    Manjaro,
    Opensuse,
}

impl Distro {
    /// Map an os-release style identifier to a distribution.
    ///
    /// Accepts the `ID`/`ID_LIKE` values shipped by each distribution, plus the
    /// spelling variants found in lsb-release and marker files.
    pub fn from_id(id: &str) -> Option<Self> {
        let id = id.trim().trim_matches('"').to_lowercase();
        let distro = match id.as_str() {
            "ubuntu" => Self::Ubuntu,
            "debian" => Self::Debian,
            "linuxmint" | "mint" => Self::Linuxmint,
            "fedora" => Self::Fedora,
            "rhel" | "redhat" | "redhatenterpriseserver" => Self::Rhel,
            "centos" => Self::Centos,
            "rocky" => Self::Rocky,
            "almalinux" | "alma" => Self::Almalinux,
            "arch" | "archlinux" => Self::Arch,
            "manjaro" | "manjaro-arm" | "manjarolinux" => Self::Manjaro,
            "opensuse" | "opensuse-leap" | "opensuse-tumbleweed" | "suse" | "sles" => {
                Self::Opensuse
            }
            _ => return None,
        };
        Some(distro)
    }

    /// Package manager branch for this distribution
    pub fn package_manager(self) -> PackageManager {
        match self {
            Self::Ubuntu | Self::Debian | Self::Linuxmint => PackageManager::Apt,
            Self::Fedora | Self::Rhel | Self::Centos | Self::Rocky | Self::Almalinux => {
                PackageManager::Dnf
            }
            Self::Arch | Self::Manjaro => PackageManager::Pacman,
            Self::Opensuse => PackageManager::Zypper,
        }
    }
}

/// Relational database to provision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DatabaseEngine {
    #[default]
    Postgresql,
    Mariadb,
}

impl DatabaseEngine {
    /// systemd unit name
    pub fn service(self) -> &'static str {
        match self {
            Self::Postgresql => "postgresql",
            Self::Mariadb => "mariadb",
        }
    }

    /// Human-readable product name
    pub fn title(self) -> &'static str {
        match self {
            Self::Postgresql => "PostgreSQL",
            Self::Mariadb => "MariaDB",
        }
    }
}

/// Firewall manager front-end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum FirewallBackend {
    Firewalld,
    Ufw,
}

impl FirewallBackend {
    /// Binary whose presence on PATH signals this manager
    pub fn binary(self) -> &'static str {
        match self {
            Self::Firewalld => "firewall-cmd",
            Self::Ufw => "ufw",
        }
    }
}
