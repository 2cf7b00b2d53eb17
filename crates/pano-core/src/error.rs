//! Error types for pano-core

use std::path::PathBuf;

/// Result type for pano-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in pano-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// User configuration file is missing and no credentials are set in the environment
    #[error("Config file ({}) not found. Run pano configure to create it.", .path.display())]
    ConfigNotFound { path: PathBuf },

    /// Repository context file is missing from the working directory
    #[error("Context file (pano.yaml) not found in current working directory. Run pano init to create it.")]
    ContextNotFound { path: PathBuf },

    /// Configuration is present but incomplete
    #[error("Invalid configuration in {}: {message}", .path.display())]
    InvalidConfig { path: PathBuf, message: String },

    /// No stored connection has the given name
    #[error("Connection with name \"{name}\" was not found.")]
    ConnectionNotFound { name: String },

    /// A stored connection already has the given name
    #[error("Connection with name \"{name}\" already exists.")]
    ConnectionExists { name: String },

    /// The home directory could not be determined
    #[error("Could not determine the home directory")]
    NoHomeDir,

    /// Two entities with the same identity in one state
    #[error("Duplicate {kind} {key} in {origin}")]
    DuplicateIdentity {
        kind: &'static str,
        key: String,
        origin: String,
    },

    /// A document parsed cleanly but is semantically invalid
    #[error("Invalid document {}: {message}", .path.display())]
    InvalidDocument { path: PathBuf, message: String },

    /// An action could not be applied to the local repository
    #[error("Cannot apply '{action}': {reason}")]
    ActionRejected { action: String, reason: String },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from pano-fs
    #[error(transparent)]
    Fs(#[from] pano_fs::Error),

    /// Entity model error from pano-model
    #[error(transparent)]
    Model(#[from] pano_model::Error),
}

impl Error {
    /// True for errors that the user fixes by running a setup command.
    pub fn is_setup_error(&self) -> bool {
        matches!(self, Self::ConfigNotFound { .. } | Self::ContextNotFound { .. })
    }
}
