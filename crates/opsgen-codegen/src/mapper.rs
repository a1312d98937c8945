//! Type mappings for Go and TypeScript code generation.
//!
//! The mapper turns a visited field into target syntax: identifier, type,
//! and the serialization tag. The tag always keeps the schema's property name
//! verbatim; only the identifier is re-cased.
//!
//! # Type Mappings
//!
//! | Schema | Go (required) | Go (optional) | TypeScript |
//! |--------|---------------|---------------|------------|
//! | `string` | `string` | `*string` | `string` / `name?: string` |
//! | `number` / `integer` | `float64` | `*float64` | `number` |
//! | `boolean` | `bool` | `*bool` | `boolean` |
//! | any | `interface{}` | `interface{}` | `any` |
//! | `#/definitions/User` | `User` | `*User` | `User` |
//! | array of `T` | `[]T` | `[]T` | `T[]` |
//! | anonymous composite | `interface{}` | `interface{}` | `any` |

use crate::naming::{go_identifier, quote, ts_property_key};
use crate::visitor::{FieldContext, LeafKind, SchemaKind, TypeRef};
use opsgen_core::GenerationError;
use serde_json::Value;

/// Languages the mapper knows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetLanguage {
    Go,
    TypeScript,
}

impl std::fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetLanguage::Go => write!(f, "go"),
            TargetLanguage::TypeScript => write!(f, "typescript"),
        }
    }
}

/// A field rendered for a target language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedField {
    /// Identifier or property key as it appears in source
    pub identifier: String,
    /// Complete type syntax, or the opening of an inline struct
    pub type_syntax: String,
    /// Wire name of the field
    pub tag: String,
    /// Whether the target marks the field optional on the key (`name?:`)
    pub optional_key: bool,
}

impl MappedField {
    /// `\tName *string `json:"name,omitempty"``
    pub fn go_line(&self) -> String {
        format!("{} {} `json:\"{},omitempty\"`", self.identifier, self.type_syntax, self.tag)
    }

    /// `name?: string;`
    pub fn ts_line(&self) -> String {
        let marker = if self.optional_key { "?" } else { "" };
        format!("{}{marker}: {};", self.identifier, self.type_syntax)
    }
}

/// Per-language rules for turning schema kinds into type syntax
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeMapper {
    target: TargetLanguage,
}

impl TypeMapper {
    pub fn new(target: TargetLanguage) -> Self {
        Self { target }
    }

    pub fn target(&self) -> TargetLanguage {
        self.target
    }

    /// Map a leaf field
    ///
    /// Anonymous custom types cannot be named in either target; they degrade
    /// to the dynamic type and are logged.
    pub fn map_leaf(&self, leaf: &LeafKind<'_>, field: FieldContext<'_>) -> MappedField {
        let (base, dynamic) = match leaf {
            LeafKind::CustomType(TypeRef::Anonymous(description)) => {
                let err = GenerationError::UnrepresentableType {
                    field: field.name.to_string(),
                    description: description.clone(),
                };
                tracing::warn!(target_language = %self.target, error = %err, "degrading to dynamic type");
                (self.dynamic_type().to_string(), true)
            }
            LeafKind::Any => (self.dynamic_type().to_string(), true),
            other => (self.base_type(other), false),
        };
        self.wrap(base, dynamic, leaf.kind(), field)
    }

    /// Opening of an inline object field (`Name *struct {` / `name?: {`)
    pub fn open_object(&self, field: FieldContext<'_>) -> MappedField {
        let opening = match self.target {
            TargetLanguage::Go => "struct {",
            TargetLanguage::TypeScript => "{",
        };
        let mut mapped = self.wrap(opening.to_string(), false, SchemaKind::Object, field);
        if self.target == TargetLanguage::TypeScript {
            // The array suffix belongs after the closing brace
            mapped.type_syntax = opening.to_string();
        }
        mapped
    }

    /// Closing of an inline object field, without indentation
    pub fn close_object(&self, field: FieldContext<'_>) -> String {
        match self.target {
            TargetLanguage::Go => format!("}} `json:\"{},omitempty\"`", field.name),
            TargetLanguage::TypeScript if field.is_array => "}[];".to_string(),
            TargetLanguage::TypeScript => "};".to_string(),
        }
    }

    /// Identifier for a named definition
    pub fn type_name(&self, name: &str) -> String {
        match self.target {
            TargetLanguage::Go => go_identifier(name),
            TargetLanguage::TypeScript => name.replace(|c: char| !c.is_alphanumeric() && c != '_', "_"),
        }
    }

    fn dynamic_type(&self) -> &'static str {
        match self.target {
            TargetLanguage::Go => "interface{}",
            TargetLanguage::TypeScript => "any",
        }
    }

    fn base_type(&self, leaf: &LeafKind<'_>) -> String {
        match (self.target, leaf) {
            (TargetLanguage::Go, LeafKind::String { .. }) => "string".to_string(),
            (TargetLanguage::Go, LeafKind::Number) => "float64".to_string(),
            (TargetLanguage::Go, LeafKind::Boolean) => "bool".to_string(),
            (TargetLanguage::TypeScript, LeafKind::String { enum_values }) if !enum_values.is_empty() => {
                enum_union(enum_values)
            }
            (TargetLanguage::TypeScript, LeafKind::String { .. }) => "string".to_string(),
            (TargetLanguage::TypeScript, LeafKind::Number) => "number".to_string(),
            (TargetLanguage::TypeScript, LeafKind::Boolean) => "boolean".to_string(),
            (_, LeafKind::CustomType(TypeRef::Named(name))) => self.type_name(name),
            (_, LeafKind::Any | LeafKind::CustomType(TypeRef::Anonymous(_))) => {
                self.dynamic_type().to_string()
            }
        }
    }

    fn wrap(&self, base: String, dynamic: bool, kind: SchemaKind, field: FieldContext<'_>) -> MappedField {
        match self.target {
            TargetLanguage::Go => {
                let type_syntax = if field.is_array {
                    format!("[]{base}")
                } else if field.is_required || dynamic {
                    base
                } else {
                    format!("*{base}")
                };
                MappedField {
                    identifier: go_identifier(field.name),
                    type_syntax,
                    tag: field.name.to_string(),
                    optional_key: false,
                }
            }
            TargetLanguage::TypeScript => {
                let type_syntax = if field.is_array {
                    if base.contains(' ') && kind != SchemaKind::Object {
                        format!("({base})[]")
                    } else {
                        format!("{base}[]")
                    }
                } else {
                    base
                };
                MappedField {
                    identifier: ts_property_key(field.name),
                    type_syntax,
                    tag: field.name.to_string(),
                    optional_key: !field.is_required,
                }
            }
        }
    }
}

/// `"A" | "B"` for a list of enum values
fn enum_union(values: &[Value]) -> String {
    values
        .iter()
        .map(|v| match v {
            Value::String(s) => quote(s),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" | ")
}
