//! Template abstraction

use opsgen_core::{GenerationConfig, GenerationResult, OutputFile};
use std::sync::Arc;

/// Shared handle to a template
pub type TemplateRef = Arc<dyn Template>;

/// A unit of generation
///
/// Templates are pure: the same configuration yields byte-identical output,
/// and nothing is shared between instances, so the executor runs them in
/// parallel.
pub trait Template: Send + Sync {
    /// Stable identity, including any configuration that changes output
    fn id(&self) -> String;

    /// Produce this template's contribution
    fn generate(&self, config: &GenerationConfig) -> GenerationResult<Vec<OutputFile>>;

    /// Templates whose output must precede this one's on shared paths
    fn dependencies(&self) -> Vec<TemplateRef> {
        Vec::new()
    }
}

impl std::fmt::Debug for dyn Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Template").field("id", &self.id()).finish()
    }
}
