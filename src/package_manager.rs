//! Package manager branches
//!
//! One tagged variant per distribution family. Each variant knows how to
//! express the capabilities the provisioner needs:
//!
//! | Capability      | Apt          | Dnf            | Pacman            | Zypper            |
//! |-----------------|--------------|----------------|-------------------|-------------------|
//! | query-installed | `dpkg-query` | `rpm -q`       | `pacman -Q`       | `rpm -q`          |
//! | refresh         | `apt-get update` | `dnf makecache` | `pacman -Syu` | `zypper refresh`  |
//! | install         | `apt-get install -y` | `dnf install -y` | `pacman -S --needed` | `zypper install` |
//!
//! Nothing here runs a process; the methods only build [`Invocation`]s.

use crate::command_runner::{CommandOutput, Invocation};
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum PackageManager {
    Apt,
    Dnf,
    Pacman,
    Zypper,
}

impl PackageManager {
    /// Probe whether a single package is installed.
    pub fn query_installed(self, package: &str) -> Invocation {
        match self {
            Self::Apt => Invocation::probe("dpkg-query", ["-W", "-f=${Status}", package]),
            Self::Dnf | Self::Zypper => Invocation::probe("rpm", ["-q", package]),
            Self::Pacman => Invocation::probe("pacman", ["-Q", package]),
        }
    }

    /// Interpret the output of [`query_installed`](Self::query_installed).
    ///
    /// dpkg keeps records for removed-but-not-purged packages, so a zero exit
    /// is not enough on Apt: the status must read `install ok installed`.
    pub fn reports_installed(self, output: &CommandOutput) -> bool {
        match self {
            Self::Apt => output.success && output.stdout.contains("install ok installed"),
            Self::Dnf | Self::Pacman | Self::Zypper => output.success,
        }
    }

    /// Refresh the package index.
    ///
    /// Arch does not support partial upgrades, so its refresh is a full
    /// `-Syu` rather than `-Sy`.
    pub fn refresh(self) -> Invocation {
        match self {
            Self::Apt => Invocation::mutation("apt-get", ["update"])
                .env("DEBIAN_FRONTEND", "noninteractive"),
            Self::Dnf => Invocation::mutation("dnf", ["makecache"]),
            Self::Pacman => Invocation::mutation("pacman", ["-Syu", "--noconfirm"]),
            Self::Zypper => Invocation::mutation("zypper", ["--non-interactive", "refresh"]),
        }
    }

    /// Install packages non-interactively in one transaction.
    pub fn install(self, packages: &[String]) -> Invocation {
        let (program, flags): (&str, &[&str]) = match self {
            Self::Apt => ("apt-get", &["install", "-y"]),
            Self::Dnf => ("dnf", &["install", "-y"]),
            Self::Pacman => ("pacman", &["-S", "--needed", "--noconfirm"]),
            Self::Zypper => ("zypper", &["--non-interactive", "install"]),
        };

        let args = flags
            .iter()
            .map(|f| f.to_string())
            .chain(packages.iter().cloned());
        let invocation = Invocation::mutation(program, args);

        match self {
            Self::Apt => invocation.env("DEBIAN_FRONTEND", "noninteractive"),
            _ => invocation,
        }
    }
}
