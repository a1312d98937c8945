//! Result of a single operation call or subscription event

use crate::error::{ClientError, ClientResult};
use opsgen_transport::ResponseBody;
use serde::de::DeserializeOwned;

/// Either data or a structured error; expected failures never escape as `Err`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientResponse {
    pub data: Option<serde_json::Value>,
    pub error: Option<ClientError>,
}

impl ClientResponse {
    pub fn success(data: Option<serde_json::Value>) -> Self {
        Self { data, error: None }
    }

    pub fn failure(error: ClientError) -> Self {
        Self {
            data: None,
            error: Some(error),
        }
    }

    /// Fold a decoded body into data or an upstream error
    pub fn from_body(body: ResponseBody) -> Self {
        match body.error_message() {
            Some(message) => Self {
                // Partial data is kept alongside the error
                data: body.data,
                error: Some(ClientError::Upstream {
                    message,
                    errors: body.errors,
                }),
            },
            None => Self::success(body.data),
        }
    }

    pub fn from_result(result: ClientResult<Option<serde_json::Value>>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(err) => Self::failure(err),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Deserialize the data into a typed model
    pub fn data_as<T: DeserializeOwned>(&self) -> ClientResult<Option<T>> {
        match &self.data {
            Some(v) => T::deserialize(v)
                .map(Some)
                .map_err(|e| ClientError::Decode(e.to_string())),
            None => Ok(None),
        }
    }

    pub fn into_result(self) -> ClientResult<Option<serde_json::Value>> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.data),
        }
    }
}
