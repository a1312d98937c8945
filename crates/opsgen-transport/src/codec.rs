//! Body codec for the operations exchange

use crate::{RequestBody, ResponseBody};
use bytes::Bytes;
use thiserror::Error;

/// Longest payload excerpt quoted in a decode error
const EXCERPT_LEN: usize = 64;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("cannot encode request body: {0}")]
    Encode(String),

    #[error("cannot decode response body: {0}")]
    Decode(String),

    #[error("invalid operation URL: {0}")]
    InvalidUrl(String),
}

/// Encodes request bodies and decodes response payloads
///
/// Implementations are shared by every request a client sends, so they must
/// be stateless or internally synchronized.
pub trait Codec: Send + Sync {
    /// Value sent as the `Content-Type` request header
    fn content_type(&self) -> &'static str;

    fn encode_request(&self, body: &RequestBody) -> Result<Bytes, CodecError>;

    /// Decode a response or a single streamed event
    ///
    /// Returns `Ok(None)` for a payload that is empty or only whitespace.
    fn decode_response(&self, payload: &[u8]) -> Result<Option<ResponseBody>, CodecError>;
}

/// JSON bodies via serde_json
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl JsonCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Codec for JsonCodec {
    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn encode_request(&self, body: &RequestBody) -> Result<Bytes, CodecError> {
        serde_json::to_vec(body)
            .map(Bytes::from)
            .map_err(|e| CodecError::Encode(e.to_string()))
    }

    fn decode_response(&self, payload: &[u8]) -> Result<Option<ResponseBody>, CodecError> {
        if payload.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        serde_json::from_slice(payload)
            .map(Some)
            .map_err(|e| CodecError::Decode(format!("{e} in {:?}", excerpt(payload))))
    }
}

fn excerpt(payload: &[u8]) -> String {
    let text = String::from_utf8_lossy(&payload[..payload.len().min(EXCERPT_LEN)]);
    if payload.len() > EXCERPT_LEN {
        format!("{text}...")
    } else {
        text.into_owned()
    }
}
