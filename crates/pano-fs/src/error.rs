//! Error types for pano-fs

use std::path::PathBuf;

/// Result type for pano-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in pano-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid {format} file - {message}{}\n  in {}", line_suffix(.line), .path.display())]
    Parse {
        path: PathBuf,
        format: String,
        message: String,
        line: Option<usize>,
    },

    #[error("Failed to serialize {format} document for {path}: {message}")]
    Serialize {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Unsupported document format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True when the underlying cause is a missing file or directory.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

fn line_suffix(line: &Option<usize>) -> String {
    match line {
        Some(line) => format!("\n  on line {}", line),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_mentions_line_and_path() {
        let error = Error::Parse {
            path: PathBuf::from("sales/orders.model.yaml"),
            format: "YAML".into(),
            message: "mapping values are not allowed here".into(),
            line: Some(3),
        };

        let display = error.to_string();
        assert!(display.contains("on line 3"), "got: {}", display);
        assert!(display.contains("sales/orders.model.yaml"), "got: {}", display);
    }

    #[test]
    fn parse_error_without_line() {
        let error = Error::Parse {
            path: PathBuf::from("pano.yaml"),
            format: "YAML".into(),
            message: "missing field `company_slug`".into(),
            line: None,
        };

        assert!(!error.to_string().contains("on line"));
    }

    #[test]
    fn not_found_detection() {
        let missing = Error::io(
            "missing.yaml",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        let denied = Error::io(
            "denied.yaml",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope"),
        );

        assert!(missing.is_not_found());
        assert!(!denied.is_not_found());
    }
}
