//! Infrastructure error types and conversions into the domain error

use thiserror::Error;
use timeloom_domain::TimeLoomError;

/// Errors raised by the file-backed stores.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl From<StorageError> for TimeLoomError {
    fn from(err: StorageError) -> Self {
        Self::Storage(err.to_string())
    }
}
