//! Per-call options

use crate::abort::AbortSignal;
use serde::Serialize;

/// One operation invocation: name, input and call options
#[derive(Debug, Clone)]
pub struct OperationRequest {
    /// Operation path, e.g. `users/update`
    pub operation: String,
    pub input: Option<serde_json::Value>,
    /// Answer a subscription with a single response (`wg_subscribe_once`)
    pub subscribe_once: bool,
    /// Stream live query updates (`wg_live`)
    pub live_query: bool,
    pub abort: Option<AbortSignal>,
}

impl OperationRequest {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            input: None,
            subscribe_once: false,
            live_query: false,
            abort: None,
        }
    }

    /// Create from an operation name and a serializable input
    pub fn from_typed<T: Serialize>(operation: impl Into<String>, input: &T) -> Result<Self, serde_json::Error> {
        Ok(Self::new(operation).with_input(serde_json::to_value(input)?))
    }

    pub fn with_input(mut self, input: serde_json::Value) -> Self {
        self.input = Some(input);
        self
    }

    pub fn subscribe_once(mut self) -> Self {
        self.subscribe_once = true;
        self
    }

    pub fn live_query(mut self) -> Self {
        self.live_query = true;
        self
    }

    pub fn with_abort(mut self, signal: AbortSignal) -> Self {
        self.abort = Some(signal);
        self
    }
}
