use thiserror::Error;

/// Errors that can occur when calling a generative model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// HTTP request failed at the transport level.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Request timed out.
    #[error("model request timed out after {0}s")]
    Timeout(u64),

    /// The API returned a non-success status.
    #[error("model API error: {0}")]
    Api(String),

    /// The response body could not be interpreted.
    #[error("failed to parse model response: {0}")]
    Parse(String),

    /// Client configuration error (bad endpoint, missing key).
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ModelError {
    /// Returns `true` if the error is transient and the call may succeed
    /// on retry.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Timeout(_) | Self::Api(_))
    }
}
