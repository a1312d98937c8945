//! Generation input

use crate::error::{GenerationError, GenerationResult};
use crate::operation::{Operation, OperationKind};
use crate::schema::SchemaNode;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// Everything a generation run needs
///
/// Read-only for the duration of a run. Templates borrow it and never mutate it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Operations in declaration order
    #[serde(default)]
    pub operations: Vec<Operation>,

    /// Shared named schema fragments
    #[serde(default)]
    pub definitions: BTreeMap<String, SchemaNode>,

    /// Base URL baked into generated clients
    #[serde(rename = "deploymentBaseURL", default = "default_base_url")]
    pub deployment_base_url: String,
}

fn default_base_url() -> String {
    "http://localhost:9991".to_string()
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(default_base_url())
    }
}

impl GenerationConfig {
    /// Create an empty configuration for a deployment
    pub fn new(deployment_base_url: impl Into<String>) -> Self {
        Self {
            operations: Vec::new(),
            definitions: BTreeMap::new(),
            deployment_base_url: deployment_base_url.into(),
        }
    }

    /// Add an operation
    pub fn with_operation(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    /// Add a shared definition
    pub fn with_definition(mut self, name: impl Into<String>, node: SchemaNode) -> Self {
        self.definitions.insert(name.into(), node);
        self
    }

    /// Parse a configuration from JSON bytes
    ///
    /// Empty input yields the default configuration.
    pub fn from_json(bytes: &[u8]) -> GenerationResult<Self> {
        if bytes.is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Read and parse a configuration file
    pub fn from_file(path: impl AsRef<Path>) -> GenerationResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            GenerationError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_json(&bytes)
    }

    /// Check operation names are unique and every named reference resolves
    pub fn validate(&self) -> GenerationResult<()> {
        let mut seen = HashSet::new();
        for op in &self.operations {
            if !seen.insert(op.name.as_str()) {
                return Err(GenerationError::DuplicateOperation(op.name.clone()));
            }
        }

        for op in &self.operations {
            for schema in [&op.variables_schema, &op.response_schema] {
                for name in schema.named_references() {
                    if self.lookup_definition(schema, name).is_none() {
                        return Err(GenerationError::UnresolvedReference {
                            name: name.to_string(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Operations of one kind, in declaration order
    pub fn operations_of(&self, kind: OperationKind) -> impl Iterator<Item = &Operation> {
        self.operations.iter().filter(move |op| op.kind == kind)
    }

    /// Look up an operation by name
    pub fn operation(&self, name: &str) -> Option<&Operation> {
        self.operations.iter().find(|op| op.name == name)
    }

    /// Resolve a definition name against a schema's own definitions, then the
    /// shared ones
    pub fn lookup_definition<'a>(&'a self, local: &'a SchemaNode, name: &str) -> Option<&'a SchemaNode> {
        local
            .definitions
            .get(name)
            .or_else(|| self.definitions.get(name))
    }
}
