//! Host log callback management

use once_cell::sync::OnceCell;
use opsgen_core::LogLevel;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

/// A log event as delivered to the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub level: LogLevel,
    /// Module path of the emitting code
    pub target: String,
    pub message: String,
    /// Structured fields other than `message`, in emission order
    pub fields: Vec<(String, String)>,
}

impl LogRecord {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }
}

/// Host callback invoked for every enabled event
pub type LogCallback = Arc<dyn Fn(&LogRecord) + Send + Sync>;

static CALLBACK_MANAGER: OnceCell<LogCallbackManager> = OnceCell::new();

/// Holder of the host callback and its level threshold
pub struct LogCallbackManager {
    callback: RwLock<Option<LogCallback>>,
    level: AtomicU8,
}

impl LogCallbackManager {
    pub fn new() -> Self {
        Self {
            callback: RwLock::new(None),
            level: AtomicU8::new(LogLevel::Info as u8),
        }
    }

    /// Get the global callback manager instance
    pub fn global() -> &'static LogCallbackManager {
        CALLBACK_MANAGER.get_or_init(LogCallbackManager::new)
    }

    pub fn set_callback(&self, callback: Option<LogCallback>) {
        *self.callback.write() = callback;
    }

    pub fn has_callback(&self) -> bool {
        self.callback.read().is_some()
    }

    pub fn set_level(&self, level: LogLevel) {
        self.level.store(level as u8, Ordering::SeqCst);
    }

    pub fn level(&self) -> LogLevel {
        LogLevel::from_u8(self.level.load(Ordering::SeqCst))
    }

    pub fn is_enabled(&self, level: LogLevel) -> bool {
        level != LogLevel::Off && level >= self.level()
    }

    /// Invoke the callback if set and the record's level is enabled
    pub fn log(&self, record: &LogRecord) {
        if !self.is_enabled(record.level) {
            return;
        }
        // Release the lock before calling out; the callback may log again
        let callback = self.callback.read().clone();
        if let Some(callback) = callback {
            callback(record);
        }
    }
}

impl Default for LogCallbackManager {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LogCallbackManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogCallbackManager")
            .field("level", &self.level())
            .field("has_callback", &self.has_callback())
            .finish()
    }
}
