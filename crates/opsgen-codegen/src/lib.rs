//! opsgen-codegen - Client code generation from operation schemas
//!
//! This crate turns a [`GenerationConfig`](opsgen_core::GenerationConfig) into
//! source files for one or more target languages.
//!
//! # Architecture
//!
//! ```text
//! GenerationConfig
//!     ↓
//!  [TemplateExecutor] ── resolves dependencies, runs templates in parallel
//!     ↓                    each template drives SchemaWalker + TypeMapper
//!  merge by path (dependency order, first non-empty header)
//!     ↓
//!  [Formatter] ── gofmt / prettier, best effort
//!     ↓
//!  Vec<OutputFile>
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use opsgen_codegen::prelude::*;
//!
//! # fn main() -> opsgen_core::GenerationResult<()> {
//! let config = GenerationConfig::from_file("operations.json")?;
//! let executor = TemplateExecutor::new(Formatter::new());
//! let files = executor.execute(&config, &golang_templates(GoTemplateConfig::default()))?;
//! write_outputs(std::path::Path::new("generated"), &files)?;
//! # Ok(())
//! # }
//! ```

pub mod executor;
pub mod formatter;
pub mod mapper;
pub mod naming;
pub mod template;
pub mod templates;
pub mod visitor;

pub use executor::{TemplateExecutor, merge, write_outputs};
pub use formatter::{CommandTool, ExternalTool, Formatter, ToolError, linefy};
pub use mapper::{MappedField, TargetLanguage, TypeMapper};
pub use template::{Template, TemplateRef};
pub use templates::{GoTemplateConfig, TypeScriptTemplateConfig, golang_templates, typescript_templates};
pub use visitor::{FieldContext, LeafKind, SchemaEvent, SchemaKind, SchemaVisitor, SchemaWalker, TypeRef};

/// Root templates for every requested target, in declaration order
pub fn templates_for(targets: &[TargetLanguage], go: &GoTemplateConfig, typescript: &TypeScriptTemplateConfig) -> Vec<TemplateRef> {
    targets
        .iter()
        .flat_map(|target| match target {
            TargetLanguage::Go => golang_templates(go.clone()),
            TargetLanguage::TypeScript => typescript_templates(typescript.clone()),
        })
        .collect()
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Formatter, GoTemplateConfig, TargetLanguage, Template, TemplateExecutor, TemplateRef,
        TypeScriptTemplateConfig, golang_templates, typescript_templates, write_outputs,
    };
    pub use opsgen_core::prelude::*;
}
