//! Error handling module for devhost
//!
//! Provides centralized error handling with proper error types using thiserror.
//! Every error here is fatal: the run stops at the first one.

use thiserror::Error;

/// Main error type for the provisioner
#[derive(Error, Debug)]
pub enum ProvisionError {
    /// The external program could not be started at all
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// A mutating step exited non-zero
    #[error("{step} failed (exit code {code}): {stderr}")]
    StepFailed {
        step: String,
        code: i32,
        stderr: String,
    },

    /// No descriptor or marker file yielded an identity
    #[error("Unable to identify the Linux distribution: {0}")]
    UnknownDistro(String),

    /// An identity was found but there is no package-manager branch for it
    #[error("Unsupported distribution: {0}")]
    UnsupportedDistro(String),

    /// Configuration errors (loading, parsing, validation)
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for provisioning operations
pub type Result<T> = std::result::Result<T, ProvisionError>;

impl ProvisionError {
    /// Create a step failure from its context, exit code and captured stderr
    pub fn step_failed(step: impl Into<String>, code: i32, stderr: impl Into<String>) -> Self {
        Self::StepFailed {
            step: step.into(),
            code,
            stderr: stderr.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an unknown-distribution error
    pub fn unknown_distro(msg: impl Into<String>) -> Self {
        Self::UnknownDistro(msg.into())
    }

    /// Create an unsupported-distribution error
    pub fn unsupported_distro(msg: impl Into<String>) -> Self {
        Self::UnsupportedDistro(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProvisionError::config("invalid editor user");
        assert_eq!(err.to_string(), "Configuration error: invalid editor user");

        let err =
            ProvisionError::step_failed("Install cockpit", 100, "E: Unable to locate package");
        assert_eq!(
            err.to_string(),
            "Install cockpit failed (exit code 100): E: Unable to locate package"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ProvisionError = io_err.into();
        assert!(matches!(err, ProvisionError::Io(_)));
    }

    #[test]
    fn test_spawn_error_names_program() {
        let err = ProvisionError::Spawn {
            program: "apt-get".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "No such file"),
        };
        assert!(err.to_string().starts_with("Failed to run apt-get"));
    }
}
