//! Error types for sdi-api.

use thiserror::Error;

/// Failures of a remote call. A backend answering `status: false` is not an
/// error at this level; callers inspect the reply.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection, DNS, TLS or I/O failure before a response arrived.
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// The server answered with a non-2xx status.
    #[error("{url} answered HTTP {code}")]
    Status { url: String, code: u16, body: String },

    /// The response body was not the expected JSON shape.
    #[error("cannot decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: std::io::Error,
    },

    /// Request body serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ApiError {
    pub(crate) fn from_ureq(url: &str, err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(code, response) => ApiError::Status {
                url: url.to_string(),
                code,
                body: response.into_string().unwrap_or_default(),
            },
            ureq::Error::Transport(transport) => ApiError::Transport {
                url: url.to_string(),
                message: transport.to_string(),
            },
        }
    }
}
