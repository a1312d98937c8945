//! Dynamic log level reloading

use crate::callback::LogCallbackManager;
use once_cell::sync::OnceCell;
use opsgen_core::LogLevel;
use parking_lot::Mutex;
use thiserror::Error;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::reload;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoggingError {
    #[error("a global tracing subscriber is already installed")]
    AlreadyInitialized,

    #[error("logging has not been initialized")]
    NotInitialized,

    #[error("failed to reload filter: {0}")]
    Reload(String),
}

/// Handle for changing the active level filter after startup
pub struct ReloadHandle {
    handle: Mutex<Option<reload::Handle<LevelFilter, tracing_subscriber::Registry>>>,
}

impl ReloadHandle {
    pub fn new() -> Self {
        Self {
            handle: Mutex::new(None),
        }
    }

    /// Get the global reload handle
    pub fn global() -> &'static ReloadHandle {
        static INSTANCE: OnceCell<ReloadHandle> = OnceCell::new();
        INSTANCE.get_or_init(ReloadHandle::new)
    }

    pub fn set_handle(&self, handle: reload::Handle<LevelFilter, tracing_subscriber::Registry>) {
        *self.handle.lock() = Some(handle);
    }

    pub fn is_initialized(&self) -> bool {
        self.handle.lock().is_some()
    }

    /// Switch the filter and the host callback threshold to `level`
    pub fn reload_level(&self, level: LogLevel) -> Result<(), LoggingError> {
        let guard = self.handle.lock();
        let handle = guard.as_ref().ok_or(LoggingError::NotInitialized)?;
        handle
            .reload(level_filter(level))
            .map_err(|e| LoggingError::Reload(e.to_string()))?;
        LogCallbackManager::global().set_level(level);
        Ok(())
    }
}

impl Default for ReloadHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ReloadHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReloadHandle")
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

pub(crate) fn level_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::Trace => LevelFilter::TRACE,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Off => LevelFilter::OFF,
    }
}
