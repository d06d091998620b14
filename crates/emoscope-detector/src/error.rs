//! Detector client errors.

use thiserror::Error;

/// Result type for detector operations.
pub type DetectorResult<T> = Result<T, DetectorError>;

/// Errors from the external analysis service boundary.
#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Detector request failed: {0}")]
    RequestFailed(String),

    #[error("Unusable detector response: {0}")]
    InvalidResponse(String),

    #[error("Frame encoding failed: {0}")]
    Encode(String),
}

impl DetectorError {
    /// Whether a retry might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            DetectorError::Network(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            DetectorError::RequestFailed(_) => true,
            DetectorError::InvalidResponse(_) | DetectorError::Encode(_) => false,
        }
    }
}
