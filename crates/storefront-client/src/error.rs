//! Client error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("API returned error: {status} - {message}")]
    Upstream { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ClientError {
    /// Whether the API rejected the request itself (4xx), as opposed to
    /// being unreachable or failing internally
    pub fn is_client_rejection(&self) -> bool {
        matches!(self, ClientError::Upstream { status, .. } if (400..500).contains(status))
    }
}
