//! Request and response bodies for `POST /operations/<name>`

use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// Request metadata carried next to the input
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestMeta {
    /// Opaque caller context forwarded to server-side hooks
    #[serde(default)]
    pub client_request_context: serde_json::Value,
}

/// Body of every operation request: `{input?, meta: {clientRequestContext}}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestBody {
    /// Operation variables; omitted for operations without input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<serde_json::Value>,

    #[serde(default)]
    pub meta: RequestMeta,
}

impl RequestBody {
    pub fn new(input: Option<serde_json::Value>, client_request_context: serde_json::Value) -> Self {
        Self {
            input,
            meta: RequestMeta {
                client_request_context,
            },
        }
    }

    /// Create from a serializable input
    pub fn from_typed<T: Serialize>(
        input: &T,
        client_request_context: serde_json::Value,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self::new(Some(serde_json::to_value(input)?), client_request_context))
    }

    /// Deserialize the input to a typed value
    pub fn input_as<T: DeserializeOwned>(&self) -> Result<Option<T>, serde_json::Error> {
        match &self.input {
            Some(v) => Ok(Some(T::deserialize(v)?)),
            None => Ok(None),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(data)
    }
}

/// A GraphQL-style error entry returned by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQLError {
    pub message: String,

    /// Response path of the failing field; segments are names or list indices
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Value>,
}

impl GraphQLError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: Vec::new(),
            extensions: None,
        }
    }
}

/// Body of an operation response (or one streamed event): `{data?, error?, errors?}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    /// Single error value (string or object) reported by the operations layer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<GraphQLError>,
}

impl ResponseBody {
    /// Create a successful response
    pub fn success(data: serde_json::Value) -> Self {
        Self {
            data: Some(data),
            ..Self::default()
        }
    }

    /// Create a response carrying GraphQL-style errors
    pub fn with_errors(errors: Vec<GraphQLError>) -> Self {
        Self {
            errors,
            ..Self::default()
        }
    }

    /// True when the server reported no error of either shape
    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.errors.is_empty()
    }

    /// Human-readable summary of the reported errors, if any
    pub fn error_message(&self) -> Option<String> {
        if !self.errors.is_empty() {
            let messages: Vec<&str> = self.errors.iter().map(|e| e.message.as_str()).collect();
            return Some(messages.join("; "));
        }
        self.error.as_ref().map(|err| match err {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Object(map) => match map.get("message") {
                Some(serde_json::Value::String(s)) => s.clone(),
                _ => err.to_string(),
            },
            other => other.to_string(),
        })
    }

    /// Deserialize the data to a typed value
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<Option<T>, serde_json::Error> {
        match &self.data {
            Some(v) => Ok(Some(T::deserialize(v)?)),
            None => Ok(None),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(data)
    }
}
