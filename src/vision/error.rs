use thiserror::Error;

#[derive(Debug, Error)]
/// Failures at the reasoning/embedding service boundary.
pub enum VisionError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {message}")]
    ClientBuildFailed {
        /// Error message.
        message: String,
    },

    /// The request never produced a response (connect failure, timeout).
    #[error("request to {endpoint} failed: {message}")]
    RequestFailed {
        /// API endpoint suffix.
        endpoint: &'static str,
        /// Error message.
        message: String,
    },

    /// The service answered with a non-success status.
    #[error("{endpoint} returned HTTP {status}")]
    UpstreamStatus {
        /// API endpoint suffix.
        endpoint: &'static str,
        /// HTTP status code.
        status: u16,
    },

    /// The response body did not match the expected shape.
    #[error("malformed {endpoint} response: {message}")]
    MalformedResponse {
        /// API endpoint suffix.
        endpoint: &'static str,
        /// What failed to parse.
        message: String,
    },
}
