//! opsgen-client - Runtime client for deployed operations
//!
//! This crate provides:
//! - [`OperationsClient`] for query, mutate and subscribe over HTTP
//! - [`Subscription`] a cancelable, lazy sequence of responses
//! - [`AbortHandle`] / [`AbortSignal`] for caller-driven cancellation
//!
//! Expected failures (network, non-2xx, upstream errors) never surface as
//! `Err`: every call returns a [`ClientResponse`] carrying either data or a
//! [`ClientError`].
//!
//! # Example
//!
//! ```rust,no_run
//! use opsgen_client::prelude::*;
//! use serde_json::json;
//!
//! # async fn run() -> ClientResult<()> {
//! let client = OperationsClient::connect("http://localhost:9991")?;
//! let response = client
//!     .mutate(OperationRequest::new("users/update").with_input(json!({"id": "1", "name": "Jens"})))
//!     .await;
//! match response.error {
//!     None => println!("updated: {:?}", response.data),
//!     Some(err) => eprintln!("failed: {err}"),
//! }
//! # Ok(())
//! # }
//! ```

mod abort;
mod client;
mod config;
mod error;
mod request;
mod response;
mod subscription;

pub use abort::{AbortHandle, AbortSignal};
pub use client::OperationsClient;
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::{ClientError, ClientResult};
pub use opsgen_core::SubscriptionState;
pub use request::OperationRequest;
pub use response::ClientResponse;
pub use subscription::Subscription;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        AbortHandle, AbortSignal, ClientConfig, ClientError, ClientResponse, ClientResult, OperationRequest,
        OperationsClient, Subscription, SubscriptionState,
    };
}
