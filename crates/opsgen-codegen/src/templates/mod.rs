//! Built-in templates for Go and TypeScript clients.
//!
//! # Dependencies
//!
//! ```text
//! GoInputModels     → GoModelsBase                                        ===> models.go
//! GoResponseModels  → GoModelsBase + GoResponseDataModels + GoDefinitionModels ===> models.go
//! GoClient          → none                                                ===> client.go
//! TsClient          → TsModels                                            ===> client.ts, models.ts
//! ```

pub mod go;
pub mod typescript;

pub use go::{
    GoClient, GoDefinitionModels, GoInputModels, GoModelsBase, GoResponseDataModels, GoResponseModels,
    GoTemplateConfig, golang_templates,
};
pub use typescript::{TsClient, TsModels, TypeScriptTemplateConfig, typescript_templates};

use crate::visitor::SchemaKind;
use opsgen_core::{GenerationConfig, SchemaNode};
use std::collections::BTreeMap;

/// First line of every generated file
pub const GENERATED_NOTICE: &str = "// Code generated by opsgen. DO NOT EDIT.";

/// Definitions visible while walking a schema owned by `owner`
///
/// The owner's own definitions shadow the shared ones.
pub(crate) fn definition_scope(config: &GenerationConfig, owner: &SchemaNode) -> BTreeMap<String, SchemaNode> {
    let mut scope = owner.definitions.clone();
    for (name, node) in &config.definitions {
        scope.entry(name.clone()).or_insert_with(|| node.clone());
    }
    scope
}

/// Property name of the single field in an [`alias_schema`] wrapper
const ALIAS_FIELD: &str = "value";

/// Definitions that are not objects render as a named type alias
pub(crate) fn is_alias(node: &SchemaNode) -> bool {
    SchemaKind::of(node) != SchemaKind::Object
}

/// Wrap `node` as the only required property of an object
///
/// Walking the wrapper yields exactly one top-level field whose mapped type
/// is the alias target.
pub(crate) fn alias_schema(node: &SchemaNode) -> SchemaNode {
    let mut wrapper = SchemaNode::object().with_property(ALIAS_FIELD, node.clone(), true);
    wrapper.definitions = node.definitions.clone();
    wrapper
}

/// Every named definition across the run, first occurrence winning
///
/// Variables schemas are searched first, then response schemas, then the
/// shared definitions.
pub(crate) fn collect_definitions(config: &GenerationConfig) -> BTreeMap<String, SchemaNode> {
    let mut definitions = BTreeMap::new();
    let owners = config
        .operations
        .iter()
        .map(|op| &op.variables_schema)
        .chain(config.operations.iter().map(|op| &op.response_schema));
    for owner in owners {
        for (name, node) in &owner.definitions {
            definitions.entry(name.clone()).or_insert_with(|| node.clone());
        }
    }
    for (name, node) in &config.definitions {
        definitions.entry(name.clone()).or_insert_with(|| node.clone());
    }
    definitions
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use opsgen_core::{ExecutionEngine, Operation, OperationKind};

    #[test]
    fn collect_definitions___first_occurrence_wins() {
        let first = Operation::new("a", OperationKind::Query, ExecutionEngine::NodeJs)
            .with_variables(SchemaNode::object().with_definition("User", SchemaNode::string()));
        let second = Operation::new("b", OperationKind::Query, ExecutionEngine::NodeJs)
            .with_variables(SchemaNode::object().with_definition("User", SchemaNode::number()))
            .with_response(SchemaNode::object().with_definition("Post", SchemaNode::object()));
        let config = GenerationConfig::default()
            .with_operation(first)
            .with_operation(second)
            .with_definition("User", SchemaNode::boolean())
            .with_definition("Tag", SchemaNode::string());

        let defs = collect_definitions(&config);

        assert_eq!(defs.keys().collect::<Vec<_>>(), vec!["Post", "Tag", "User"]);
        assert_eq!(defs["User"], SchemaNode::string());
    }

    #[test]
    fn is_alias___only_objects_keep_struct_form() {
        assert!(is_alias(&SchemaNode::string()));
        assert!(is_alias(&SchemaNode::array(SchemaNode::object())));
        assert!(is_alias(&SchemaNode::reference("User")));
        assert!(!is_alias(&SchemaNode::object()));
        assert!(!is_alias(&SchemaNode::default().with_property("id", SchemaNode::string(), true)));
    }

    #[test]
    fn alias_schema___single_required_field_keeps_definitions() {
        let node = SchemaNode::reference("Inner").with_definition("Inner", SchemaNode::string());

        let wrapper = alias_schema(&node);

        assert_eq!(wrapper.properties.len(), 1);
        assert!(wrapper.is_required(ALIAS_FIELD));
        assert!(wrapper.definitions.contains_key("Inner"));
    }

    #[test]
    fn definition_scope___owner_shadows_shared() {
        let owner = SchemaNode::object().with_definition("User", SchemaNode::string());
        let config = GenerationConfig::default()
            .with_definition("User", SchemaNode::number())
            .with_definition("Tag", SchemaNode::string());

        let scope = definition_scope(&config, &owner);

        assert_eq!(scope["User"], SchemaNode::string());
        assert!(scope.contains_key("Tag"));
    }
}
