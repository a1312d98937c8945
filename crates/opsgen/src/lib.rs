//! # opsgen
//!
//! Typed clients for an operations API, generated from JSON Schemas.
//!
//! opsgen has two halves:
//! - Generation: walk each operation's variables and response schemas and
//!   emit Go and TypeScript models plus a client surface
//! - Runtime: an async [`OperationsClient`] that issues queries, mutations,
//!   and streaming subscriptions against `/operations/<name>`
//!
//! ## Generating
//!
//! ```rust,no_run
//! use opsgen::prelude::*;
//!
//! # fn main() -> GenerationResult<()> {
//! let config = GenerationConfig::from_file("operations.json")?;
//! let roots = opsgen::codegen::templates_for(
//!     &[TargetLanguage::Go, TargetLanguage::TypeScript],
//!     &GoTemplateConfig::new("api"),
//!     &TypeScriptTemplateConfig::default(),
//! );
//! let files = TemplateExecutor::new(Formatter::new()).execute(&config, &roots)?;
//! write_outputs(std::path::Path::new("generated"), &files)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Calling operations
//!
//! ```rust,no_run
//! use opsgen::prelude::*;
//!
//! # async fn run() -> ClientResult<()> {
//! let client = OperationsClient::connect("http://localhost:9991")?;
//! let response = client
//!     .mutate(OperationRequest::new("users/update").with_input(serde_json::json!({ "id": "1" })))
//!     .await;
//!
//! let mut updates = client.subscribe(OperationRequest::new("users/changed"));
//! while let Some(event) = updates.next().await {
//!     println!("{:?}", event.data);
//! }
//! # drop(response);
//! # Ok(())
//! # }
//! ```
//!
//! ## Crate Organization
//!
//! - [`opsgen_core`] - Schema, operation, and output types
//! - [`opsgen_codegen`] - Visitor, type mapper, templates, executor, formatter
//! - [`opsgen_transport`] - Wire envelopes, URL routing, event framing
//! - [`opsgen_client`] - The async operations client
//! - [`opsgen_logging`] - Tracing setup and host log callbacks

// Re-export core types
pub use opsgen_core::{
    ExecutionEngine, GenerationConfig, GenerationError, GenerationResult, LogLevel, Operation,
    OperationKind, OutputFile, SchemaNode, SubscriptionState,
};

// Re-export the client surface
pub use opsgen_client::{
    AbortHandle, AbortSignal, ClientConfig, ClientError, ClientResponse, ClientResult,
    DEFAULT_BASE_URL, OperationRequest, OperationsClient, Subscription,
};

pub use opsgen_logging::{LogCallback, LogCallbackManager, LogRecord, init_logging};

/// Code generation
pub mod codegen {
    pub use opsgen_codegen::*;
}

/// Wire format
pub mod transport {
    pub use opsgen_transport::*;
}

// Re-export common dependencies that client users need
pub use serde;
pub use serde_json;
pub use tokio;
pub use tracing;

/// Prelude module for convenient imports.
///
/// Use `use opsgen::prelude::*;` to import commonly used types.
pub mod prelude {
    pub use opsgen_client::prelude::*;
    pub use opsgen_codegen::prelude::*;

    pub use serde::{Deserialize, Serialize};
}
