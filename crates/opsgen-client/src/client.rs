//! The operations client

use crate::abort::{AbortSignal, wait_optional};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::request::OperationRequest;
use crate::response::ClientResponse;
use crate::subscription::{Registration, Registry, Subscription};
use futures_util::StreamExt;
use opsgen_core::SubscriptionState;
use opsgen_transport::{Codec, EventFramer, JsonCodec, QueryFlag, RequestBody, operation_url};
use reqwest::header::{CONTENT_TYPE, HeaderMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use url::Url;

/// Client for `POST <base_url>/operations/<name>`
///
/// Cloning shares the subscription registry; [`with_headers`](Self::with_headers)
/// does not.
#[derive(Debug, Clone)]
pub struct OperationsClient {
    http: reqwest::Client,
    base_url: Url,
    headers: HeaderMap,
    client_request_context: serde_json::Value,
    channel_capacity: usize,
    codec: JsonCodec,
    subscriptions: Registry,
    next_id: Arc<AtomicU64>,
}

impl OperationsClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            http: config.http_client.unwrap_or_default(),
            base_url: config.base_url,
            headers: config.headers,
            client_request_context: config.client_request_context,
            channel_capacity: config.channel_capacity,
            codec: JsonCodec::new(),
            subscriptions: Arc::default(),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Connect to a deployment with default settings
    pub fn connect(base_url: &str) -> ClientResult<Self> {
        Ok(Self::new(ClientConfig::new(base_url)?))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// New client with `headers` added on top of this client's headers
    ///
    /// The original client is untouched and the new one starts with no open
    /// subscriptions.
    pub fn with_headers(&self, headers: HeaderMap) -> Self {
        let mut merged = self.headers.clone();
        merged.extend(headers);
        Self {
            headers: merged,
            subscriptions: Arc::default(),
            next_id: Arc::new(AtomicU64::new(1)),
            ..self.clone()
        }
    }

    /// Run a query and return its data or error
    pub async fn query(&self, request: OperationRequest) -> ClientResponse {
        self.call("query", request).await
    }

    /// Run a mutation and return its data or error
    pub async fn mutate(&self, request: OperationRequest) -> ClientResponse {
        self.call("mutation", request).await
    }

    /// Start a subscription
    ///
    /// With [`subscribe_once`](OperationRequest::subscribe_once) the sequence
    /// yields exactly one response. Otherwise it streams until the server closes
    /// the connection or the subscription is canceled.
    ///
    /// Outside a Tokio runtime the subscription yields a single
    /// [`ClientError::InvalidConfig`] event and completes.
    pub fn subscribe(&self, request: OperationRequest) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let registration = Registration::new();
        let (sender, receiver) = mpsc::channel(self.channel_capacity);
        let operation = request.operation.clone();

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(err) => {
                warn!(operation = %operation, id, error = %err, "subscribe called outside a Tokio runtime");
                let event = ClientResponse::failure(ClientError::InvalidConfig(format!(
                    "subscribe requires a Tokio runtime: {err}"
                )));
                registration.transition(SubscriptionState::Streaming);
                // Capacity is at least one, so the buffer has room
                let _ = sender.try_send(event);
                registration.transition(SubscriptionState::Completed);
                return Subscription::new(id, operation, receiver, registration, self.subscriptions.clone());
            }
        };

        self.subscriptions.insert(id, registration.clone());
        debug!(operation = %operation, id, "subscription registered");

        let client = self.clone();
        let task_registration = registration.clone();
        runtime.spawn(async move {
            client.drive(id, request, sender, task_registration).await;
        });

        Subscription::new(id, operation, receiver, registration, self.subscriptions.clone())
    }

    /// Cancel every subscription open at the time of the call
    ///
    /// Returns how many were canceled. Subscriptions started afterwards are
    /// unaffected.
    pub fn cancel_subscriptions(&self) -> usize {
        let ids: Vec<u64> = self.subscriptions.iter().map(|entry| *entry.key()).collect();
        let mut canceled = 0;
        for id in ids {
            if let Some((_, registration)) = self.subscriptions.remove(&id) {
                registration.cancel();
                canceled += 1;
            }
        }
        if canceled > 0 {
            info!(count = canceled, "canceled subscriptions");
        }
        canceled
    }

    /// Number of subscriptions still registered
    pub fn open_subscriptions(&self) -> usize {
        self.subscriptions.len()
    }

    async fn call(&self, kind: &'static str, request: OperationRequest) -> ClientResponse {
        let mut abort = request.abort.clone();
        if abort.as_ref().is_some_and(AbortSignal::is_aborted) {
            return ClientResponse::failure(ClientError::Aborted);
        }

        let response = tokio::select! {
            biased;
            _ = wait_optional(&mut abort) => ClientResponse::failure(ClientError::Aborted),
            response = self.fetch(&request, &[]) => response,
        };

        match &response.error {
            Some(err) => warn!(operation = %request.operation, kind, error = %err, "operation failed"),
            None => debug!(operation = %request.operation, kind, "operation succeeded"),
        }
        response
    }

    async fn send(&self, request: &OperationRequest, flags: &[QueryFlag]) -> ClientResult<reqwest::Response> {
        let url = operation_url(&self.base_url, &request.operation, flags)?;
        let body = RequestBody::new(request.input.clone(), self.client_request_context.clone());
        let payload = self.codec.encode_request(&body)?;

        debug!(operation = %request.operation, url = %url, "sending operation request");
        let response = self
            .http
            .post(url)
            .headers(self.headers.clone())
            .header(CONTENT_TYPE, self.codec.content_type())
            .body(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn fetch(&self, request: &OperationRequest, flags: &[QueryFlag]) -> ClientResponse {
        let response = match self.send(request, flags).await {
            Ok(response) => response,
            Err(err) => return ClientResponse::failure(err),
        };
        match response.bytes().await {
            Ok(bytes) => self.decode(&bytes),
            Err(err) => ClientResponse::failure(err.into()),
        }
    }

    fn decode(&self, bytes: &[u8]) -> ClientResponse {
        match self.codec.decode_response(bytes) {
            Ok(Some(body)) => ClientResponse::from_body(body),
            Ok(None) => ClientResponse::success(None),
            Err(err) => ClientResponse::failure(err.into()),
        }
    }

    async fn drive(
        self,
        id: u64,
        request: OperationRequest,
        sender: mpsc::Sender<ClientResponse>,
        registration: Registration,
    ) {
        let mut own = registration.signal();
        let mut caller = request.abort.clone();

        let canceled = tokio::select! {
            biased;
            _ = own.wait() => true,
            _ = wait_optional(&mut caller) => true,
            _ = self.pump(&request, &sender, &registration) => false,
        };

        if canceled {
            registration.transition(SubscriptionState::Canceled);
            debug!(operation = %request.operation, id, "subscription canceled");
        } else {
            registration.transition(SubscriptionState::Completed);
            debug!(operation = %request.operation, id, "subscription completed");
        }
        self.subscriptions.remove(&id);
    }

    async fn pump(&self, request: &OperationRequest, sender: &mpsc::Sender<ClientResponse>, registration: &Registration) {
        if request.subscribe_once {
            let response = self.fetch(request, &[QueryFlag::SubscribeOnce]).await;
            emit(sender, registration, response).await;
            return;
        }

        let flags: &[QueryFlag] = if request.live_query { &[QueryFlag::Live] } else { &[] };
        let response = match self.send(request, flags).await {
            Ok(response) => response,
            Err(err) => {
                warn!(operation = %request.operation, error = %err, "subscription failed to start");
                emit(sender, registration, ClientResponse::failure(err)).await;
                return;
            }
        };

        let mut body = response.bytes_stream();
        let mut framer = EventFramer::new();
        while let Some(chunk) = body.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(err) => {
                    warn!(operation = %request.operation, error = %err, "subscription stream broke");
                    emit(sender, registration, ClientResponse::failure(err.into())).await;
                    return;
                }
            };
            for event in framer.push(&chunk) {
                if !emit(sender, registration, self.decode(&event)).await {
                    return;
                }
            }
        }
        if let Some(rest) = framer.finish() {
            emit(sender, registration, self.decode(&rest)).await;
        }
    }
}

/// Hand one event to the reader; false once the reader is gone
async fn emit(sender: &mpsc::Sender<ClientResponse>, registration: &Registration, event: ClientResponse) -> bool {
    registration.transition(SubscriptionState::Streaming);
    sender.send(event).await.is_ok()
}
