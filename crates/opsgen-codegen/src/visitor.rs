//! Depth-first schema traversal.
//!
//! [`SchemaWalker::walk`] turns a [`SchemaNode`] tree into a flat sequence of
//! [`SchemaEvent`]s. Composite kinds (root, object, array) produce paired
//! enter/leave events; leaf kinds produce a single event. Visitors match on
//! the event enum, so adding a kind is a compile error in every visitor.
//!
//! Named references are never inlined: the walker checks that the name
//! resolves and reports it as a [`LeafKind::CustomType`].

use opsgen_core::{GenerationError, GenerationResult, SchemaNode, SchemaType};
use serde_json::Value;
use std::collections::BTreeMap;

/// Closed set of node kinds the generator understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaKind {
    Root,
    Object,
    Array,
    String,
    Number,
    Boolean,
    Any,
    CustomType,
}

impl SchemaKind {
    /// Classify a non-root node
    ///
    /// `$ref` and composites win over `type`; `properties` without a `type`
    /// still count as an object.
    pub fn of(node: &SchemaNode) -> Self {
        if node.reference.is_some() || !node.any_of.is_empty() || !node.one_of.is_empty() {
            return SchemaKind::CustomType;
        }
        match node.primary_type() {
            Some(SchemaType::Object) => SchemaKind::Object,
            Some(SchemaType::Array) => SchemaKind::Array,
            Some(SchemaType::String) => SchemaKind::String,
            Some(SchemaType::Number | SchemaType::Integer) => SchemaKind::Number,
            Some(SchemaType::Boolean) => SchemaKind::Boolean,
            Some(SchemaType::Null) => SchemaKind::Any,
            None if node.has_properties() => SchemaKind::Object,
            None => SchemaKind::Any,
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, SchemaKind::Root | SchemaKind::Object | SchemaKind::Array)
    }
}

/// Position of a node relative to its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldContext<'a> {
    /// Property name in the parent; empty for the root
    pub name: &'a str,
    /// Listed in the immediate parent's `required` set
    pub is_required: bool,
    /// Reached through an `items` edge; nested arrays collapse into one flag
    pub is_array: bool,
}

impl<'a> FieldContext<'a> {
    pub fn root() -> Self {
        Self {
            name: "",
            is_required: true,
            is_array: false,
        }
    }

    pub fn field(name: &'a str, is_required: bool) -> Self {
        Self {
            name,
            is_required,
            is_array: false,
        }
    }

    fn in_array(self) -> Self {
        Self {
            is_array: true,
            ..self
        }
    }
}

/// Target of a custom type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef<'a> {
    /// `#/definitions/<Name>` that resolves
    Named(&'a str),
    /// Inline composite or unsupported reference form, with a description
    Anonymous(String),
}

/// Leaf node payloads
#[derive(Debug, Clone, PartialEq)]
pub enum LeafKind<'a> {
    String { enum_values: &'a [Value] },
    Number,
    Boolean,
    Any,
    CustomType(TypeRef<'a>),
}

impl LeafKind<'_> {
    pub fn kind(&self) -> SchemaKind {
        match self {
            LeafKind::String { .. } => SchemaKind::String,
            LeafKind::Number => SchemaKind::Number,
            LeafKind::Boolean => SchemaKind::Boolean,
            LeafKind::Any => SchemaKind::Any,
            LeafKind::CustomType(_) => SchemaKind::CustomType,
        }
    }
}

/// Composite node kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeKind {
    Root,
    Object,
    Array,
}

/// One step of a traversal
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaEvent<'a> {
    Enter {
        kind: CompositeKind,
        field: FieldContext<'a>,
        node: &'a SchemaNode,
    },
    Leave {
        kind: CompositeKind,
        field: FieldContext<'a>,
        node: &'a SchemaNode,
    },
    Leaf {
        leaf: LeafKind<'a>,
        field: FieldContext<'a>,
        node: &'a SchemaNode,
    },
}

/// Receiver of traversal events
pub trait SchemaVisitor {
    fn visit(&mut self, event: SchemaEvent<'_>);
}

impl<F> SchemaVisitor for F
where
    F: FnMut(SchemaEvent<'_>),
{
    fn visit(&mut self, event: SchemaEvent<'_>) {
        self(event)
    }
}

/// Drives a visitor over a schema, resolving named references
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaWalker<'d> {
    shared: Option<&'d BTreeMap<String, SchemaNode>>,
}

impl<'d> SchemaWalker<'d> {
    /// Walker that resolves references against the root's own definitions only
    pub fn new() -> Self {
        Self { shared: None }
    }

    /// Fall back to shared definitions when the root does not define a name
    pub fn with_shared_definitions(definitions: &'d BTreeMap<String, SchemaNode>) -> Self {
        Self {
            shared: Some(definitions),
        }
    }

    /// Walk `root`, emitting root enter/leave around its properties
    ///
    /// A root without properties produces only the enter/leave pair.
    pub fn walk<'a, V>(&self, root: &'a SchemaNode, visitor: &mut V) -> GenerationResult<()>
    where
        V: SchemaVisitor + ?Sized,
    {
        let field = FieldContext::root();
        visitor.visit(SchemaEvent::Enter {
            kind: CompositeKind::Root,
            field,
            node: root,
        });
        self.walk_properties(root, root, visitor)?;
        visitor.visit(SchemaEvent::Leave {
            kind: CompositeKind::Root,
            field,
            node: root,
        });
        Ok(())
    }

    fn walk_properties<'a, V>(
        &self,
        root: &'a SchemaNode,
        parent: &'a SchemaNode,
        visitor: &mut V,
    ) -> GenerationResult<()>
    where
        V: SchemaVisitor + ?Sized,
    {
        for (name, child) in &parent.properties {
            let field = FieldContext::field(name, parent.is_required(name));
            self.walk_node(root, child, field, visitor)?;
        }
        Ok(())
    }

    fn walk_node<'a, V>(
        &self,
        root: &'a SchemaNode,
        node: &'a SchemaNode,
        field: FieldContext<'a>,
        visitor: &mut V,
    ) -> GenerationResult<()>
    where
        V: SchemaVisitor + ?Sized,
    {
        let leaf = match SchemaKind::of(node) {
            SchemaKind::Object => {
                visitor.visit(SchemaEvent::Enter {
                    kind: CompositeKind::Object,
                    field,
                    node,
                });
                self.walk_properties(root, node, visitor)?;
                visitor.visit(SchemaEvent::Leave {
                    kind: CompositeKind::Object,
                    field,
                    node,
                });
                return Ok(());
            }
            SchemaKind::Array => {
                visitor.visit(SchemaEvent::Enter {
                    kind: CompositeKind::Array,
                    field,
                    node,
                });
                let item_field = field.in_array();
                match node.items.as_deref() {
                    Some(items) => self.walk_node(root, items, item_field, visitor)?,
                    None => visitor.visit(SchemaEvent::Leaf {
                        leaf: LeafKind::Any,
                        field: item_field,
                        node,
                    }),
                }
                visitor.visit(SchemaEvent::Leave {
                    kind: CompositeKind::Array,
                    field,
                    node,
                });
                return Ok(());
            }
            SchemaKind::String => LeafKind::String {
                enum_values: &node.enum_values,
            },
            SchemaKind::Number => LeafKind::Number,
            SchemaKind::Boolean => LeafKind::Boolean,
            SchemaKind::Any | SchemaKind::Root => LeafKind::Any,
            SchemaKind::CustomType => LeafKind::CustomType(self.type_ref(root, node)?),
        };
        visitor.visit(SchemaEvent::Leaf { leaf, field, node });
        Ok(())
    }

    fn type_ref<'a>(&self, root: &'a SchemaNode, node: &'a SchemaNode) -> GenerationResult<TypeRef<'a>> {
        if let Some(name) = node.named_reference() {
            let resolved = root.definitions.contains_key(name)
                || self.shared.is_some_and(|defs| defs.contains_key(name));
            if !resolved {
                return Err(GenerationError::UnresolvedReference {
                    name: name.to_string(),
                });
            }
            return Ok(TypeRef::Named(name));
        }
        let description = match &node.reference {
            Some(reference) => format!("{{$ref: {reference}}}"),
            None if !node.any_of.is_empty() => format!("{{anyOf: {} variants}}", node.any_of.len()),
            None => format!("{{oneOf: {} variants}}", node.one_of.len()),
        };
        Ok(TypeRef::Anonymous(description))
    }
}
