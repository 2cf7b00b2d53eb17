//! Error types for pano-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from pano-core
    #[error(transparent)]
    Core(#[from] pano_core::Error),

    /// Error from pano-remote
    #[error(transparent)]
    Remote(#[from] pano_remote::Error),

    /// Error from pano-fs
    #[error(transparent)]
    Fs(#[from] pano_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// YAML rendering error
    #[error("Could not render YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Interactive prompt error
    #[error("Interactive prompt error: {0}")]
    Dialoguer(#[from] dialoguer::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_error_displays_its_message() {
        let error = CliError::user("No companies have been found");
        assert_eq!(error.to_string(), "No companies have been found");
    }

    #[test]
    fn core_errors_keep_their_remediation() {
        let error: CliError = pano_core::Error::ContextNotFound {
            path: "pano.yaml".into(),
        }
        .into();
        assert!(error.to_string().contains("Run pano init"));
    }
}
