//! Transport failures surfaced through [`ClientResponse`](crate::ClientResponse)

use opsgen_transport::{CodecError, GraphQLError};
use thiserror::Error;

/// Result type for client setup and internal request plumbing
pub type ClientResult<T> = Result<T, ClientError>;

/// Why an operation produced no data
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    /// Connect, send, or body read failed
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-2xx status
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    /// The server answered 2xx but reported errors in the body
    #[error("upstream error: {message}")]
    Upstream {
        message: String,
        errors: Vec<GraphQLError>,
    },

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("failed to encode request: {0}")]
    Encode(String),

    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),

    /// The caller's abort signal fired before a response arrived
    #[error("operation aborted")]
    Aborted,
}

impl ClientError {
    /// True for failures that happened before the server saw the request
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ClientError::Encode(_) | ClientError::InvalidConfig(_) | ClientError::Aborted
        )
    }
}

impl From<CodecError> for ClientError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::Decode(msg) => ClientError::Decode(msg),
            CodecError::Encode(msg) => ClientError::Encode(msg),
            CodecError::InvalidUrl(msg) => ClientError::InvalidConfig(msg),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}
