//! Configuration file handling.
//!
//! The configuration is optional. Every field has a default, and the defaults
//! reproduce a plain run: all components, PostgreSQL, firewall port opened.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ProvisionError;
use crate::types::DatabaseEngine;

/// Provisioning choices that can be loaded from JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvisionConfig {
    /// Install the source-control server (Gitea)
    pub source_control: bool,
    /// Install the browser editor (code-server)
    pub editor: bool,
    /// Account code-server runs as; falls back to `SUDO_USER`
    pub editor_user: Option<String>,
    /// Relational database engine
    pub database: DatabaseEngine,
    /// Install the database admin web UI (Adminer)
    pub database_admin: bool,
    /// Open the console port in the firewall
    pub open_firewall: bool,
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            source_control: true,
            editor: true,
            editor_user: None,
            database: DatabaseEngine::default(),
            database_admin: true,
            open_firewall: true,
        }
    }
}

impl ProvisionConfig {
    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read configuration from {:?}", path.as_ref()))?;

        let config: Self =
            serde_json::from_str(&content).context("Failed to parse configuration JSON")?;

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(user) = &self.editor_user {
            validate_login_name(user)?;
        }
        Ok(())
    }

    /// Account the editor service should run as.
    ///
    /// The configured user wins; otherwise the invoking user behind `sudo`.
    /// Running directly as root yields `None`.
    pub fn resolve_editor_user(&self) -> Option<String> {
        self.editor_user.clone().or_else(|| {
            std::env::var("SUDO_USER")
                .ok()
                .filter(|u| !u.is_empty() && u != "root" && validate_login_name(u).is_ok())
        })
    }
}

/// Validate a Unix login name: 1-32 chars, `[a-z_][a-z0-9_-]*`, not root
fn validate_login_name(name: &str) -> crate::error::Result<()> {
    if name.is_empty() || name.len() > 32 {
        return Err(ProvisionError::config("Editor user must be 1-32 characters long"));
    }
    if let Some(first_char) = name.chars().next() {
        if !(first_char.is_ascii_lowercase() || first_char == '_') {
            return Err(ProvisionError::config(
                "Editor user must start with a lowercase letter or underscore",
            ));
        }
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
    {
        return Err(ProvisionError::config(
            "Editor user can only contain lowercase letters, digits, '_' and '-'",
        ));
    }
    if name == "root" {
        return Err(ProvisionError::config("Editor user must not be root"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;
    use std::io::Write;

    #[test]
    fn test_empty_object_gives_defaults() {
        let config: ProvisionConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ProvisionConfig::default());
        assert!(config.source_control && config.editor && config.database_admin);
        assert_eq!(config.database, DatabaseEngine::Postgresql);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"database": "mariadb", "editor": false, "editor_user": "dev"}}"#
        )
        .unwrap();

        let config = ProvisionConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.database, DatabaseEngine::Mariadb);
        assert!(!config.editor);
        assert_eq!(config.editor_user.as_deref(), Some("dev"));
        assert!(config.open_firewall);
    }

    #[test]
    fn test_load_rejects_unknown_engine() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"database": "oracle"}}"#).unwrap();
        assert!(ProvisionConfig::load_from_file(file.path()).is_err());
    }

    #[test]
    fn test_malformed_json_names_the_parse_step() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{\"editor\": tru").unwrap();
        let err = ProvisionConfig::load_from_file(file.path()).unwrap_err();
        assert_eq!(err.to_string(), "Failed to parse configuration JSON");
        assert!(err.chain().count() > 1);
    }

    #[test]
    fn test_validate_editor_user() {
        let mut config = ProvisionConfig::default();
        assert!(config.validate().is_ok());

        for good in ["dev", "_svc", "build-bot", "a1"] {
            config.editor_user = Some(good.to_string());
            assert!(config.validate().is_ok(), "{good} should be accepted");
        }
        let too_long = "x".repeat(33);
        for bad in ["", "root", "Dev", "1dev", "dev;rm", too_long.as_str()] {
            config.editor_user = Some(bad.to_string());
            assert!(config.validate().is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_configured_editor_user_wins() {
        let config = ProvisionConfig {
            editor_user: Some("dev".to_string()),
            ..ProvisionConfig::default()
        };
        assert_eq!(config.resolve_editor_user().as_deref(), Some("dev"));
    }
}
