//! opsgen-logging - Tracing setup for the generator and client
//!
//! This crate provides:
//! - [`init_logging`] installing a stderr formatter plus the callback layer
//! - [`CallbackLayer`] forwarding events to a host-supplied [`LogCallback`]
//! - [`ReloadHandle`] for changing verbosity at runtime
//!
//! Embedding build pipelines register a callback to receive generator
//! warnings (missing formatters, degraded types) as structured records.

mod callback;
mod layer;
mod reload;

pub use callback::{LogCallback, LogCallbackManager, LogRecord};
pub use layer::{CallbackLayer, init_logging};
pub use opsgen_core::LogLevel;
pub use reload::{LoggingError, ReloadHandle};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{CallbackLayer, LogCallback, LogCallbackManager, LogLevel, LogRecord, init_logging};
}
