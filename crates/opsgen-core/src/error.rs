//! Error types for code generation

use thiserror::Error;

/// Result type alias for generation operations
pub type GenerationResult<T> = Result<T, GenerationError>;

/// Error type for a generation run
///
/// Fatal variants abort the run. [`GenerationError::UnrepresentableType`] and
/// [`GenerationError::FormatterMissing`] are recoverable: producers log them and
/// degrade instead of returning them.
#[derive(Error, Debug)]
pub enum GenerationError {
    /// A named `$ref` with no matching definition
    #[error("unresolved reference: {name}")]
    UnresolvedReference { name: String },

    /// An inline composite type the target language cannot name
    #[error("unrepresentable type for field '{field}': {description}")]
    UnrepresentableType { field: String, description: String },

    /// An execution engine without a response-schema extraction rule
    #[error("unhandled execution engine '{engine}' for operation {operation}")]
    UnhandledExecutionEngine { operation: String, engine: String },

    /// The external formatter ran and rejected the generated content
    #[error("failed to format {path}:\n{annotated}\n\n{diagnostics}")]
    FormatterFailure {
        path: String,
        annotated: String,
        diagnostics: String,
    },

    /// The external formatter is not installed
    #[error("formatter '{tool}' is not installed")]
    FormatterMissing { tool: String },

    /// Template dependencies form a cycle
    #[error("cyclic template dependency: {}", cycle.join(" -> "))]
    CyclicTemplateDependency { cycle: Vec<String> },

    /// Two operations share a name
    #[error("duplicate operation name: {0}")]
    DuplicateOperation(String),

    /// A template failed to generate
    #[error("template {template} failed: {source}")]
    TemplateFailed {
        template: String,
        #[source]
        source: Box<GenerationError>,
    },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error while reading input or writing output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GenerationError {
    /// Returns a stable numeric code for the error kind
    pub fn error_code(&self) -> u32 {
        match self {
            GenerationError::UnresolvedReference { .. } => 1,
            GenerationError::UnrepresentableType { .. } => 2,
            GenerationError::UnhandledExecutionEngine { .. } => 3,
            GenerationError::FormatterFailure { .. } => 4,
            GenerationError::FormatterMissing { .. } => 5,
            GenerationError::CyclicTemplateDependency { .. } => 6,
            GenerationError::DuplicateOperation(_) => 7,
            GenerationError::TemplateFailed { .. } => 8,
            GenerationError::Config(_) => 9,
            GenerationError::Serialization(_) => 10,
            GenerationError::Io(_) => 11,
        }
    }

    /// Whether generation can continue after this error by degrading output
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            GenerationError::UnrepresentableType { .. } | GenerationError::FormatterMissing { .. }
        )
    }

    /// Wrap this error with the id of the template that produced it
    pub fn in_template(self, template: impl Into<String>) -> Self {
        GenerationError::TemplateFailed {
            template: template.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, unwrapping template context
    pub fn root_cause(&self) -> &GenerationError {
        match self {
            GenerationError::TemplateFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

impl From<serde_json::Error> for GenerationError {
    fn from(err: serde_json::Error) -> Self {
        GenerationError::Serialization(err.to_string())
    }
}
