//! Constants for the on-disk layout of a model repository.
//!
//! ```text
//! <root>/
//!   pano.yaml                     # context document
//!   fields/<slug>.field.yaml      # company-scoped field definitions
//!   scanned/<model>.model.yaml    # scan output, never a package
//!   <package>/
//!     dataset.yaml
//!     <model_name>.model.yaml
//!     fields/<slug>.field.yaml    # dataset-scoped field definitions
//! ```

use std::path::Path;

/// Well-known file and directory names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanoPath {
    /// Dataset descriptor inside every package directory
    DatasetFile,
    /// Per-repository context document
    ContextFile,
    /// Field definitions directory (root or package scoped)
    FieldsDir,
    /// Output directory of `pano scan`
    ScannedDir,
    /// User-level configuration directory under `$HOME`
    ConfigDir,
    /// User-level configuration document inside [`PanoPath::ConfigDir`]
    ConfigFile,
}

impl PanoPath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DatasetFile => "dataset.yaml",
            Self::ContextFile => "pano.yaml",
            Self::FieldsDir => "fields",
            Self::ScannedDir => "scanned",
            Self::ConfigDir => ".pano",
            Self::ConfigFile => "config.yaml",
        }
    }

    /// Directories at the repository root that are never packages.
    pub fn is_system_dir(name: &str) -> bool {
        name.starts_with('.') || name == Self::FieldsDir.as_str() || name == Self::ScannedDir.as_str()
    }
}

impl AsRef<Path> for PanoPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for PanoPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for PanoPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Compound extensions of entity documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileExtension {
    Model,
    Field,
}

impl FileExtension {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Model => ".model.yaml",
            Self::Field => ".field.yaml",
        }
    }

    /// File name for a document named `stem`.
    pub fn file_name(&self, stem: &str) -> String {
        format!("{}{}", stem, self.as_str())
    }

    /// Strip the extension from a file name, if it carries it.
    pub fn strip<'a>(&self, file_name: &'a str) -> Option<&'a str> {
        file_name
            .strip_suffix(self.as_str())
            .filter(|stem| !stem.is_empty())
    }
}
