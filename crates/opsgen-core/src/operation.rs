//! Operation descriptions

use crate::error::{GenerationError, GenerationResult};
use crate::schema::SchemaNode;
use serde::{Deserialize, Serialize};

/// What an operation does on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationKind::Query => write!(f, "query"),
            OperationKind::Mutation => write!(f, "mutation"),
            OperationKind::Subscription => write!(f, "subscription"),
        }
    }
}

/// Engine that executes an operation on the server
///
/// Unknown engine names are kept verbatim so that generation can report them
/// instead of failing to load the config.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ExecutionEngine {
    NodeJs,
    GraphQl,
    Other(String),
}

impl From<String> for ExecutionEngine {
    fn from(value: String) -> Self {
        match value.as_str() {
            "nodejs" => ExecutionEngine::NodeJs,
            "graphql" => ExecutionEngine::GraphQl,
            _ => ExecutionEngine::Other(value),
        }
    }
}

impl From<ExecutionEngine> for String {
    fn from(value: ExecutionEngine) -> Self {
        value.to_string()
    }
}

impl std::fmt::Display for ExecutionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionEngine::NodeJs => write!(f, "nodejs"),
            ExecutionEngine::GraphQl => write!(f, "graphql"),
            ExecutionEngine::Other(name) => write!(f, "{name}"),
        }
    }
}

/// A named query, mutation, or subscription with typed input and output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Operation path, e.g. `users/update`
    pub name: String,

    pub kind: OperationKind,

    pub execution_engine: ExecutionEngine,

    #[serde(default)]
    pub variables_schema: SchemaNode,

    #[serde(default)]
    pub response_schema: SchemaNode,

    #[serde(default)]
    pub requires_authentication: bool,

    #[serde(default)]
    pub is_live_query: bool,
}

impl Operation {
    /// Create an operation with empty schemas
    pub fn new(name: impl Into<String>, kind: OperationKind, engine: ExecutionEngine) -> Self {
        Self {
            name: name.into(),
            kind,
            execution_engine: engine,
            variables_schema: SchemaNode::object(),
            response_schema: SchemaNode::object(),
            requires_authentication: false,
            is_live_query: false,
        }
    }

    /// Set the input schema
    pub fn with_variables(mut self, schema: SchemaNode) -> Self {
        self.variables_schema = schema;
        self
    }

    /// Set the response schema
    pub fn with_response(mut self, schema: SchemaNode) -> Self {
        self.response_schema = schema;
        self
    }

    /// Mark the operation as requiring an authenticated user
    pub fn with_authentication(mut self, required: bool) -> Self {
        self.requires_authentication = required;
        self
    }

    /// Mark a query as available as a live query
    pub fn with_live_query(mut self, live: bool) -> Self {
        self.is_live_query = live;
        self
    }

    /// Whether the operation takes any input
    pub fn has_input(&self) -> bool {
        self.variables_schema.has_properties()
    }

    /// Schema of the `data` part of a response
    ///
    /// Node.js operations return the data directly; GraphQL operations wrap it
    /// in the `data` property of the response.
    pub fn response_data_schema(&self) -> GenerationResult<Option<&SchemaNode>> {
        match &self.execution_engine {
            ExecutionEngine::NodeJs => Ok(Some(&self.response_schema)),
            ExecutionEngine::GraphQl => Ok(self.response_schema.properties.get("data")),
            ExecutionEngine::Other(engine) => Err(GenerationError::UnhandledExecutionEngine {
                operation: self.name.clone(),
                engine: engine.clone(),
            }),
        }
    }
}
