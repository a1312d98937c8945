//! Operations client configuration

use crate::error::{ClientError, ClientResult};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use url::Url;

/// Default deployment address of a local operations server
pub const DEFAULT_BASE_URL: &str = "http://localhost:9991";

/// Configuration for an [`OperationsClient`](crate::OperationsClient)
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Deployment root; operations live under `<base_url>/operations/`
    pub base_url: Url,
    /// Headers sent with every request
    pub headers: HeaderMap,
    /// Forwarded to the server as `meta.clientRequestContext`; `{}` by default
    pub client_request_context: serde_json::Value,
    /// Prebuilt HTTP client (None = a fresh default client)
    pub http_client: Option<reqwest::Client>,
    /// Buffered events per subscription before the reader applies backpressure
    pub channel_capacity: usize,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let base_url =
            Url::parse(base_url).map_err(|e| ClientError::InvalidConfig(format!("base URL {base_url:?}: {e}")))?;
        Ok(Self::from_url(base_url))
    }

    pub fn from_url(base_url: Url) -> Self {
        Self {
            base_url,
            headers: HeaderMap::new(),
            client_request_context: serde_json::Value::Object(serde_json::Map::new()),
            http_client: None,
            channel_capacity: 32,
        }
    }

    /// Add a header sent with every request
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> ClientResult<Self> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| ClientError::InvalidConfig(format!("invalid header name: {e}")))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| ClientError::InvalidConfig(format!("invalid header value: {e}")))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers.extend(headers);
        self
    }

    pub fn with_client_request_context(mut self, context: serde_json::Value) -> Self {
        self.client_request_context = context;
        self
    }

    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }
}
