use thiserror::Error;

/// The primary error type for all fallible operations in this crate.
#[derive(Debug, Error)]
pub enum EnvError {
    /// The HTTP transport failed (connection refused, timeout, reset, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A provided URL could not be parsed.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The server returned an unsuccessful HTTP status code.
    #[error("Unexpected response status: {status} at {url}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The URL that returned the error.
        url: String,
    },

    /// The response body was not valid JSON.
    #[error("Malformed JSON body: {0}")]
    Json(#[from] serde_json::Error),

    /// The payload was valid JSON but not in the expected shape.
    #[error("Data format unexpected or missing field: {0}")]
    Data(String),

    /// The caller supplied parameters that cannot form a request.
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),
}

impl EnvError {
    /// Whether this error came from the wire: a transport failure, a non-2xx
    /// status or a body that is not JSON.
    ///
    /// A JSON body with the wrong shape is [`EnvError::Data`]; it still fails its
    /// attempt when the request checks payload shape.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Status { .. } | Self::Json(_))
    }
}
