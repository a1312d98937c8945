//! opsgen-core - Operation model, schema types, and error taxonomy
//!
//! This crate provides the foundational types shared by the generator and the
//! runtime client:
//! - [`GenerationConfig`] the immutable input of a generation run
//! - [`Operation`] and [`SchemaNode`] describing what gets generated
//! - [`OutputFile`] the unit a template emits
//! - [`GenerationError`] for the generation error taxonomy
//! - [`SubscriptionState`] for the runtime subscription state machine

mod config;
mod error;
mod lifecycle;
mod operation;
mod output;
mod schema;

pub use config::GenerationConfig;
pub use error::{GenerationError, GenerationResult};
pub use lifecycle::SubscriptionState;
pub use operation::{ExecutionEngine, Operation, OperationKind};
pub use output::OutputFile;
pub use schema::{DEFINITIONS_PREFIX, SchemaNode, SchemaType, TypeSet};

/// Log levels shared by the logging bridge and the CLI
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    Off = 5,
}

impl LogLevel {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => LogLevel::Trace,
            1 => LogLevel::Debug,
            2 => LogLevel::Info,
            3 => LogLevel::Warn,
            4 => LogLevel::Error,
            _ => LogLevel::Off,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "TRACE"),
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
            LogLevel::Off => write!(f, "OFF"),
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "off" => Ok(LogLevel::Off),
            other => Err(GenerationError::Config(format!("unknown log level: {other}"))),
        }
    }
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        ExecutionEngine, GenerationConfig, GenerationError, GenerationResult, LogLevel,
        Operation, OperationKind, OutputFile, SchemaNode, SubscriptionState,
    };
}
