//! Linux distribution detection
//!
//! Reads identification data from the host and yields one [`Distro`] token.
//!
//! # Sources, in order
//!
//! 1. `/etc/os-release`, falling back to `/usr/lib/os-release` (`ID`, then `ID_LIKE`)
//! 2. `/etc/lsb-release` (`DISTRIB_ID`)
//! 3. Marker files such as `/etc/arch-release` or `/etc/redhat-release`
//!
//! A source that names an unsupported identity does not stop the search; a
//! later source may still produce a supported token. Detection fails only when
//! every source has been tried.

use crate::error::{ProvisionError, Result};
use crate::host::HostFs;
use crate::types::Distro;
use std::fmt;
use tracing::{debug, info};

/// Parsed subset of an os-release file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OsRelease {
    pub id: Option<String>,
    pub id_like: Vec<String>,
    pub version_id: Option<String>,
    pub pretty_name: Option<String>,
}

/// Where the distribution identity came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectionSource {
    OsRelease(String),
    LsbRelease,
    MarkerFile(String),
}

impl fmt::Display for DetectionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OsRelease(path) | Self::MarkerFile(path) => f.write_str(path),
            Self::LsbRelease => f.write_str("/etc/lsb-release"),
        }
    }
}

/// Result of a successful detection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedDistro {
    pub distro: Distro,
    pub source: DetectionSource,
    /// Human-readable name, e.g. `PRETTY_NAME` when available
    pub name: String,
}

const OS_RELEASE_PATHS: &[&str] = &["/etc/os-release", "/usr/lib/os-release"];

/// Marker files checked last, with the identity each implies.
/// `/etc/debian_version` also exists on Ubuntu, so it comes last.
const MARKER_FILES: &[(&str, Distro)] = &[
    ("/etc/fedora-release", Distro::Fedora),
    ("/etc/redhat-release", Distro::Rhel),
    ("/etc/manjaro-release", Distro::Manjaro),
    ("/etc/arch-release", Distro::Arch),
    ("/etc/SuSE-release", Distro::Opensuse),
    ("/etc/debian_version", Distro::Debian),
];

/// Unquote a shell-style value: `"Ubuntu 24.04"` or `'x'` or bare
fn unquote(value: &str) -> &str {
    let value = value.trim();
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

/// Split `KEY=value` lines, skipping comments and blanks
fn key_values(content: &str) -> impl Iterator<Item = (&str, &str)> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim(), unquote(value)))
}

/// Parse the contents of an os-release file
pub fn parse_os_release(content: &str) -> OsRelease {
    let mut release = OsRelease::default();
    for (key, value) in key_values(content) {
        match key {
            "ID" => release.id = Some(value.to_lowercase()),
            "ID_LIKE" => {
                release.id_like = value
                    .split_whitespace()
                    .map(str::to_lowercase)
                    .collect()
            }
            "VERSION_ID" => release.version_id = Some(value.to_string()),
            "PRETTY_NAME" => release.pretty_name = Some(value.to_string()),
            _ => {}
        }
    }
    release
}

impl OsRelease {
    /// `ID` if supported, otherwise the first supported `ID_LIKE` entry
    pub fn distro(&self) -> Option<Distro> {
        self.id
            .iter()
            .chain(self.id_like.iter())
            .find_map(|id| Distro::from_id(id))
    }
}

/// Identify the distribution from `/etc/redhat-release` text
fn redhat_family(content: &str) -> Distro {
    let lower = content.to_lowercase();
    if lower.contains("rocky") {
        Distro::Rocky
    } else if lower.contains("almalinux") {
        Distro::Almalinux
    } else if lower.contains("centos") {
        Distro::Centos
    } else if lower.contains("fedora") {
        Distro::Fedora
    } else {
        Distro::Rhel
    }
}

/// Detect the running distribution.
///
/// # Errors
///
/// - [`ProvisionError::UnsupportedDistro`] if an identity was found but none
///   is in the supported set
/// - [`ProvisionError::UnknownDistro`] if no source yielded an identity
/// - [`ProvisionError::Io`] if a descriptor exists but cannot be read
pub fn detect_distro(host: &HostFs) -> Result<DetectedDistro> {
    let mut last_seen: Option<String> = None;

    for path in OS_RELEASE_PATHS {
        let Some(content) = host.read_optional(path)? else {
            continue;
        };
        let release = parse_os_release(&content);
        debug!("{}: id={:?} id_like={:?}", path, release.id, release.id_like);

        if let Some(distro) = release.distro() {
            let name = release
                .pretty_name
                .clone()
                .unwrap_or_else(|| distro.to_string());
            return Ok(found(distro, DetectionSource::OsRelease(path.to_string()), name));
        }
        if let Some(id) = release.id {
            last_seen = Some(id);
        }
        // /usr/lib/os-release is only a fallback for a missing /etc copy
        break;
    }

    if let Some(content) = host.read_optional("/etc/lsb-release")? {
        if let Some((_, id)) = key_values(&content).find(|(key, _)| *key == "DISTRIB_ID") {
            if let Some(distro) = Distro::from_id(id) {
                return Ok(found(distro, DetectionSource::LsbRelease, id.to_string()));
            }
            last_seen = Some(id.to_string());
        }
    }

    for (path, implied) in MARKER_FILES {
        let Some(content) = host.read_optional(path)? else {
            continue;
        };
        let distro = match implied {
            Distro::Rhel => redhat_family(&content),
            other => *other,
        };
        let name = content.lines().next().unwrap_or_default().trim().to_string();
        let name = if name.is_empty() { distro.to_string() } else { name };
        return Ok(found(distro, DetectionSource::MarkerFile(path.to_string()), name));
    }

    match last_seen {
        Some(id) => Err(ProvisionError::unsupported_distro(id)),
        None => Err(ProvisionError::unknown_distro(
            "no os-release, lsb-release or release marker file found",
        )),
    }
}

fn found(distro: Distro, source: DetectionSource, name: String) -> DetectedDistro {
    info!("Detected distribution {} ({}) from {}", distro, name, source);
    DetectedDistro {
        distro,
        source,
        name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const UBUNTU: &str = r#"PRETTY_NAME="Ubuntu 24.04 LTS"
NAME="Ubuntu"
VERSION_ID="24.04"
ID=ubuntu
ID_LIKE=debian
"#;

    #[test]
    fn test_parse_os_release() {
        let release = parse_os_release(UBUNTU);
        assert_eq!(release.id.as_deref(), Some("ubuntu"));
        assert_eq!(release.id_like, vec!["debian".to_string()]);
        assert_eq!(release.version_id.as_deref(), Some("24.04"));
        assert_eq!(release.pretty_name.as_deref(), Some("Ubuntu 24.04 LTS"));
    }

    #[test]
    fn test_parse_ignores_comments_and_single_quotes() {
        let release = parse_os_release("# comment\n\nID='fedora'\nVARIANT_ID=workstation\n");
        assert_eq!(release.id.as_deref(), Some("fedora"));
        assert!(release.id_like.is_empty());
        assert_eq!(release.distro(), Some(Distro::Fedora));
    }

    #[test]
    fn test_id_like_fallback() {
        let release = parse_os_release("ID=pop\nID_LIKE=\"ubuntu debian\"\n");
        assert_eq!(release.distro(), Some(Distro::Ubuntu));

        let release = parse_os_release("ID=ol\nID_LIKE=\"fedora\"\n");
        assert_eq!(release.distro(), Some(Distro::Fedora));
    }

    #[test]
    fn test_redhat_family() {
        assert_eq!(redhat_family("Rocky Linux release 9.3 (Blue Onyx)"), Distro::Rocky);
        assert_eq!(redhat_family("CentOS Stream release 9"), Distro::Centos);
        assert_eq!(
            redhat_family("Red Hat Enterprise Linux release 9.4 (Plow)"),
            Distro::Rhel
        );
    }

    #[test]
    fn test_detect_prefers_etc_os_release() {
        let dir = tempdir().unwrap();
        let host = HostFs::new(dir.path());
        host.write("/etc/os-release", UBUNTU).unwrap();
        host.write("/etc/debian_version", "trixie/sid\n").unwrap();

        let detected = detect_distro(&host).unwrap();
        assert_eq!(detected.distro, Distro::Ubuntu);
        assert_eq!(detected.name, "Ubuntu 24.04 LTS");
        assert_eq!(
            detected.source,
            DetectionSource::OsRelease("/etc/os-release".to_string())
        );
    }

    #[test]
    fn test_detect_usr_lib_fallback() {
        let dir = tempdir().unwrap();
        let host = HostFs::new(dir.path());
        host.write("/usr/lib/os-release", "ID=arch\n").unwrap();

        assert_eq!(detect_distro(&host).unwrap().distro, Distro::Arch);
    }

    #[test]
    fn test_detect_marker_after_unsupported_os_release() {
        let dir = tempdir().unwrap();
        let host = HostFs::new(dir.path());
        host.write("/etc/os-release", "ID=gentoo\n").unwrap();
        host.write("/etc/arch-release", "").unwrap();

        let detected = detect_distro(&host).unwrap();
        assert_eq!(detected.distro, Distro::Arch);
        assert_eq!(detected.name, "arch");
    }

    #[test]
    fn test_detect_unsupported() {
        let dir = tempdir().unwrap();
        let host = HostFs::new(dir.path());
        host.write("/etc/os-release", "ID=gentoo\n").unwrap();

        let err = detect_distro(&host).unwrap_err();
        assert!(matches!(err, ProvisionError::UnsupportedDistro(ref id) if id == "gentoo"));
    }

    #[test]
    fn test_detect_lsb_release() {
        let dir = tempdir().unwrap();
        let host = HostFs::new(dir.path());
        host.write(
            "/etc/lsb-release",
            "DISTRIB_ID=LinuxMint\nDISTRIB_RELEASE=21.3\nDISTRIB_CODENAME=virginia\n",
        )
        .unwrap();

        let detected = detect_distro(&host).unwrap();
        assert_eq!(detected.distro, Distro::Linuxmint);
        assert_eq!(detected.source, DetectionSource::LsbRelease);
        assert_eq!(detected.name, "LinuxMint");
    }

    #[test]
    fn test_detect_redhat_release_marker() {
        let dir = tempdir().unwrap();
        let host = HostFs::new(dir.path());
        host.write("/etc/redhat-release", "Rocky Linux release 9.3 (Blue Onyx)\n")
            .unwrap();

        let detected = detect_distro(&host).unwrap();
        assert_eq!(detected.distro, Distro::Rocky);
        assert_eq!(
            detected.source,
            DetectionSource::MarkerFile("/etc/redhat-release".to_string())
        );
        assert_eq!(detected.name, "Rocky Linux release 9.3 (Blue Onyx)");
    }

    #[test]
    fn test_detect_unsupported_lsb_id_is_reported() {
        let dir = tempdir().unwrap();
        let host = HostFs::new(dir.path());
        host.write("/etc/lsb-release", "DISTRIB_ID=Gentoo\n").unwrap();

        let err = detect_distro(&host).unwrap_err();
        assert!(matches!(err, ProvisionError::UnsupportedDistro(ref id) if id == "Gentoo"));
    }

    #[test]
    fn test_detect_nothing_found() {
        let dir = tempdir().unwrap();
        let err = detect_distro(&HostFs::new(dir.path())).unwrap_err();
        assert!(matches!(err, ProvisionError::UnknownDistro(_)));
    }
}
