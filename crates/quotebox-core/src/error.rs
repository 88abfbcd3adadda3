use thiserror::Error;

/// Everything that can go wrong while managing quotes
///
/// None of these are fatal: an operation that fails leaves the collection
/// exactly as it was.
#[derive(Error, Debug)]
pub enum Error {
    /// Empty text or category on a manual add
    #[error("{0}")]
    Validation(String),

    /// Unparsable import file or stored payload
    #[error("Malformed file: {0}")]
    MalformedData(String),

    #[error("Failed to sync with server: {0}")]
    RemoteSync(String),

    #[error("Storage operation failed: {0}")]
    CacheError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<quotebox_cache::CacheError> for Error {
    fn from(err: quotebox_cache::CacheError) -> Self {
        Error::CacheError(err.to_string())
    }
}

impl From<quotebox_api::ApiError> for Error {
    fn from(err: quotebox_api::ApiError) -> Self {
        Error::RemoteSync(err.to_string())
    }
}
