//! Tracing layer that forwards events to the host callback

use crate::callback::{LogCallbackManager, LogRecord};
use crate::reload::{LoggingError, ReloadHandle, level_filter};
use opsgen_core::LogLevel;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;

/// Forwards every event at or above the manager's level as a [`LogRecord`]
#[derive(Debug)]
pub struct CallbackLayer {
    manager: &'static LogCallbackManager,
}

impl CallbackLayer {
    /// Create a layer using the global callback manager
    pub fn new() -> Self {
        Self {
            manager: LogCallbackManager::global(),
        }
    }

    pub fn with_manager(manager: &'static LogCallbackManager) -> Self {
        Self { manager }
    }

    fn convert_level(level: &Level) -> LogLevel {
        match *level {
            Level::TRACE => LogLevel::Trace,
            Level::DEBUG => LogLevel::Debug,
            Level::INFO => LogLevel::Info,
            Level::WARN => LogLevel::Warn,
            Level::ERROR => LogLevel::Error,
        }
    }
}

impl Default for CallbackLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Layer<S> for CallbackLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let level = Self::convert_level(metadata.level());

        // Skip the field walk when nobody is listening
        if !self.manager.is_enabled(level) || !self.manager.has_callback() {
            return;
        }

        let mut visitor = RecordVisitor::default();
        event.record(&mut visitor);

        self.manager.log(&LogRecord {
            level,
            target: metadata.target().to_string(),
            message: visitor.message.unwrap_or_default(),
            fields: visitor.fields,
        });
    }
}

#[derive(Default)]
struct RecordVisitor {
    message: Option<String>,
    fields: Vec<(String, String)>,
}

impl RecordVisitor {
    fn push(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.message = Some(value);
        } else {
            self.fields.push((field.name().to_string(), value));
        }
    }
}

impl Visit for RecordVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.push(field, format!("{value:?}"));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, value.to_string());
    }
}

/// Install the global subscriber: level filter, stderr formatter, callback layer
///
/// The level can be changed later through [`ReloadHandle::global`].
pub fn init_logging(level: LogLevel) -> Result<(), LoggingError> {
    use tracing_subscriber::prelude::*;

    let (filter, handle) = tracing_subscriber::reload::Layer::new(level_filter(level));
    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(CallbackLayer::new());

    tracing::subscriber::set_global_default(subscriber).map_err(|_| LoggingError::AlreadyInitialized)?;

    LogCallbackManager::global().set_level(level);
    ReloadHandle::global().set_handle(handle);
    Ok(())
}
