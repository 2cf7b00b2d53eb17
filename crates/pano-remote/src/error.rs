//! Error types for pano-remote

/// Result type for pano-remote operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur talking to the remote catalog
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport-level failure (connection, TLS, timeout, body decoding)
    #[error("HTTP request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The catalog answered with a non-success status
    #[error("{method} {url} returned {status}: {message}{}", request_suffix(.request_id))]
    Status {
        method: String,
        url: String,
        status: u16,
        message: String,
        request_id: Option<String>,
    },

    /// Client credentials were rejected
    #[error("Authentication failed: {message}{}", request_suffix(.request_id))]
    Auth {
        message: String,
        request_id: Option<String>,
    },

    /// A response body did not have the expected shape
    #[error("Unexpected response from {url}: {message}")]
    InvalidResponse { url: String, message: String },

    /// Data connection to scan does not exist
    #[error("Data connection {source_id} not found. Has it been connected?")]
    SourceNotFound { source_id: String },

    /// A metadata job finished with a failure status
    #[error("Metadata job {job_id} ({job}) failed")]
    JobFailed { job_id: String, job: String },

    /// A metadata job did not finish in time
    #[error("Metadata job {job_id} ({job}) did not finish within {seconds}s")]
    Timeout {
        job_id: String,
        job: String,
        seconds: u64,
    },

    /// A background worker panicked or was cancelled
    #[error("Worker failed: {message}")]
    Worker { message: String },

    /// Invalid client settings
    #[error("Invalid setting {name}: {message}")]
    Settings { name: String, message: String },

    /// Error from pano-core
    #[error(transparent)]
    Core(#[from] pano_core::Error),

    /// JSON serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Request id assigned by the catalog, when the response carried one.
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Self::Status { request_id, .. } | Self::Auth { request_id, .. } => request_id.as_deref(),
            _ => None,
        }
    }

    /// True for a 404 answer.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }

    /// True for a 401 answer.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: 401, .. })
    }
}

fn request_suffix(request_id: &Option<String>) -> String {
    match request_id {
        Some(id) => format!(" (RequestId: {})", id),
        None => String::new(),
    }
}
