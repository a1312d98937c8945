//! JSON Schema subset consumed by the generator
//!
//! Only the keywords that drive code generation are modelled. Unknown keywords
//! are ignored on deserialization; the generator does not validate schemas.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Prefix of a named reference (`#/definitions/<Name>`)
pub const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// Primitive JSON Schema type names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Number,
    Integer,
    Boolean,
    Object,
    Array,
    Null,
}

/// The `type` keyword: a single name or a list of names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeSet {
    Single(SchemaType),
    Many(Vec<SchemaType>),
}

impl TypeSet {
    /// First non-null type, if any
    pub fn primary(&self) -> Option<SchemaType> {
        match self {
            TypeSet::Single(SchemaType::Null) => None,
            TypeSet::Single(ty) => Some(*ty),
            TypeSet::Many(types) => types.iter().copied().find(|ty| *ty != SchemaType::Null),
        }
    }

    /// Whether `null` is one of the accepted types
    pub fn is_nullable(&self) -> bool {
        match self {
            TypeSet::Single(ty) => *ty == SchemaType::Null,
            TypeSet::Many(types) => types.contains(&SchemaType::Null),
        }
    }
}

/// A JSON Schema node
///
/// Properties and definitions are kept in name order so every traversal of the
/// same schema is identical.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaNode {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<TypeSet>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, SchemaNode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaNode>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<serde_json::Value>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub definitions: BTreeMap<String, SchemaNode>,

    #[serde(rename = "anyOf", default, skip_serializing_if = "Vec::is_empty")]
    pub any_of: Vec<SchemaNode>,

    #[serde(rename = "oneOf", default, skip_serializing_if = "Vec::is_empty")]
    pub one_of: Vec<SchemaNode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SchemaNode {
    /// Create a node of a single type
    pub fn of_type(ty: SchemaType) -> Self {
        Self {
            schema_type: Some(TypeSet::Single(ty)),
            ..Self::default()
        }
    }

    /// Create an empty object node
    pub fn object() -> Self {
        Self::of_type(SchemaType::Object)
    }

    /// Create a string node
    pub fn string() -> Self {
        Self::of_type(SchemaType::String)
    }

    /// Create a number node
    pub fn number() -> Self {
        Self::of_type(SchemaType::Number)
    }

    /// Create a boolean node
    pub fn boolean() -> Self {
        Self::of_type(SchemaType::Boolean)
    }

    /// Create an array node with the given item schema
    pub fn array(items: SchemaNode) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::of_type(SchemaType::Array)
        }
    }

    /// Create a named reference to `#/definitions/<name>`
    pub fn reference(name: &str) -> Self {
        Self {
            reference: Some(format!("{DEFINITIONS_PREFIX}{name}")),
            ..Self::default()
        }
    }

    /// Add a property, marking it required if requested
    pub fn with_property(mut self, name: impl Into<String>, node: SchemaNode, required: bool) -> Self {
        let name = name.into();
        if required && !self.required.contains(&name) {
            self.required.push(name.clone());
        }
        self.properties.insert(name, node);
        self
    }

    /// Add a named definition
    pub fn with_definition(mut self, name: impl Into<String>, node: SchemaNode) -> Self {
        self.definitions.insert(name.into(), node);
        self
    }

    /// Restrict a node to a list of allowed values
    pub fn with_enum(mut self, values: Vec<serde_json::Value>) -> Self {
        self.enum_values = values;
        self
    }

    /// The first non-null type
    pub fn primary_type(&self) -> Option<SchemaType> {
        self.schema_type.as_ref().and_then(TypeSet::primary)
    }

    /// Whether `name` is listed in this node's `required` set
    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }

    /// Whether this node has at least one property
    pub fn has_properties(&self) -> bool {
        !self.properties.is_empty()
    }

    /// Definition name for a `#/definitions/<Name>` reference
    ///
    /// Returns `None` for nodes without a reference and for references in any
    /// other form (JSON pointers into properties, external documents).
    pub fn named_reference(&self) -> Option<&str> {
        self.reference
            .as_deref()
            .and_then(|r| r.strip_prefix(DEFINITIONS_PREFIX))
            .filter(|name| !name.is_empty() && !name.contains('/'))
    }

    /// Every named reference reachable from this node, depth first
    pub fn named_references(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_references(&mut out);
        out
    }

    fn collect_references<'a>(&'a self, out: &mut Vec<&'a str>) {
        if let Some(name) = self.named_reference() {
            out.push(name);
        }
        for node in self.properties.values() {
            node.collect_references(out);
        }
        if let Some(items) = &self.items {
            items.collect_references(out);
        }
        for node in self.definitions.values() {
            node.collect_references(out);
        }
        for node in self.any_of.iter().chain(self.one_of.iter()) {
            node.collect_references(out);
        }
    }
}
