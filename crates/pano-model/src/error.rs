//! Error types for pano-model

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid {kind} document: {source}")]
    Document {
        kind: &'static str,
        #[source]
        source: serde_yaml::Error,
    },
}
