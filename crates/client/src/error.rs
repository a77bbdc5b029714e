//! Client-side error taxonomy.
//!
//! Four groups, each handled differently by callers:
//! validation (blocked locally, no request was made), authentication
//! (session already reset by the client), backend business errors (message
//! surfaced verbatim), and transport failures (retry-suggesting messaging).

/// Errors surfaced by [`crate::ApiClient`] and the view layers above it.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// A local validation failure. No network call was made.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The server returned 401. The stored session has already been
    /// cleared by the time this error is observed.
    #[error("Session is no longer valid")]
    Unauthorized,

    /// The server rejected the request with a business error. `message` is
    /// the backend's `error` field, verbatim.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Human-readable message from the response body.
        message: String,
    },

    /// The HTTP request itself failed (connect, DNS, TLS, timeout) or the
    /// response body could not be decoded.
    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),
}

impl ClientError {
    /// Whether retrying the same call might succeed (transport-level
    /// failures only; validation and business errors will repeat).
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClientError::Network(_))
    }
}
