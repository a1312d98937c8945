//! TypeScript model and client generation.

use super::{GENERATED_NOTICE, alias_schema, collect_definitions, definition_scope, is_alias};
use crate::mapper::{TargetLanguage, TypeMapper};
use crate::naming::{operation_type_name, quote};
use crate::template::{Template, TemplateRef};
use crate::visitor::{CompositeKind, SchemaEvent, SchemaVisitor, SchemaWalker};
use opsgen_core::{GenerationConfig, GenerationResult, Operation, OperationKind, OutputFile, SchemaNode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

const MODELS_PATH: &str = "models.ts";

/// Options for the TypeScript templates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeScriptTemplateConfig {
    /// Base name of the client file (`<module_name>.ts`)
    #[serde(default = "default_module_name")]
    pub module_name: String,
}

fn default_module_name() -> String {
    "client".to_string()
}

impl Default for TypeScriptTemplateConfig {
    fn default() -> Self {
        Self {
            module_name: default_module_name(),
        }
    }
}

fn header() -> String {
    format!("{GENERATED_NOTICE}\n\n")
}

/// Root templates for a complete TypeScript client
pub fn typescript_templates(config: TypeScriptTemplateConfig) -> Vec<TemplateRef> {
    vec![Arc::new(TsClient::new(config))]
}

struct TsInterfaceWriter {
    mapper: TypeMapper,
    name: String,
    /// Emit `export type <name> = T;` from the single root field
    alias: bool,
    out: String,
    depth: usize,
}

impl TsInterfaceWriter {
    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.out.push('\t');
        }
        self.out.push_str(text);
        self.out.push('\n');
    }
}

impl SchemaVisitor for TsInterfaceWriter {
    fn visit(&mut self, event: SchemaEvent<'_>) {
        match event {
            SchemaEvent::Enter {
                kind: CompositeKind::Root,
                ..
            } if self.alias => {
                self.out.push_str(&format!("export type {} = ", self.name));
                self.depth = 0;
            }
            SchemaEvent::Leave {
                kind: CompositeKind::Root,
                ..
            } if self.alias => {}
            SchemaEvent::Enter {
                kind: CompositeKind::Object,
                ..
            } if self.alias && self.depth == 0 => {
                self.out.push_str("{\n");
                self.depth = 1;
            }
            SchemaEvent::Leave {
                kind: CompositeKind::Object,
                field,
                ..
            } if self.alias && self.depth == 1 => {
                self.depth = 0;
                let closing = self.mapper.close_object(field);
                self.out.push_str(&closing);
                self.out.push('\n');
            }
            SchemaEvent::Leaf { leaf, field, .. } if self.alias && self.depth == 0 => {
                let mapped = self.mapper.map_leaf(&leaf, field);
                self.out.push_str(&format!("{};\n", mapped.type_syntax));
            }
            SchemaEvent::Enter {
                kind: CompositeKind::Root,
                ..
            } => {
                self.out.push_str(&format!("export interface {} {{\n", self.name));
                self.depth = 1;
            }
            SchemaEvent::Leave {
                kind: CompositeKind::Root,
                ..
            } => {
                self.depth = 0;
                self.out.push_str("}\n");
            }
            SchemaEvent::Enter {
                kind: CompositeKind::Object,
                field,
                ..
            } => {
                let opened = self.mapper.open_object(field);
                self.line(opened.ts_line().trim_end_matches(';'));
                self.depth += 1;
            }
            SchemaEvent::Leave {
                kind: CompositeKind::Object,
                field,
                ..
            } => {
                self.depth = self.depth.saturating_sub(1);
                let closing = self.mapper.close_object(field);
                self.line(&closing);
            }
            SchemaEvent::Enter {
                kind: CompositeKind::Array,
                ..
            }
            | SchemaEvent::Leave {
                kind: CompositeKind::Array,
                ..
            } => {}
            SchemaEvent::Leaf { leaf, field, .. } => {
                let mapped = self.mapper.map_leaf(&leaf, field);
                self.line(&mapped.ts_line());
            }
        }
    }
}

fn ts_interface(walker: &SchemaWalker<'_>, schema: &SchemaNode, name: &str) -> GenerationResult<String> {
    render(walker, schema, name, false)
}

/// An interface for object definitions, a type alias for everything else
fn ts_definition(walker: &SchemaWalker<'_>, node: &SchemaNode, name: &str) -> GenerationResult<String> {
    if is_alias(node) {
        render(walker, &alias_schema(node), name, true)
    } else {
        render(walker, node, name, false)
    }
}

fn render(walker: &SchemaWalker<'_>, schema: &SchemaNode, name: &str, alias: bool) -> GenerationResult<String> {
    let mapper = TypeMapper::new(TargetLanguage::TypeScript);
    let mut writer = TsInterfaceWriter {
        name: mapper.type_name(name),
        mapper,
        alias,
        out: String::new(),
        depth: 0,
    };
    walker.walk(schema, &mut writer)?;
    Ok(writer.out)
}

/// Interfaces for inputs, response data, and named definitions
#[derive(Debug, Clone, Default)]
pub struct TsModels;

impl Template for TsModels {
    fn id(&self) -> String {
        "typescript.models".to_string()
    }

    fn generate(&self, config: &GenerationConfig) -> GenerationResult<Vec<OutputFile>> {
        let mut parts = vec![
            "export interface GraphQLError {\n\tmessage: string;\n\tpath?: ReadonlyArray<string | number>;\n}\n"
                .to_string(),
        ];

        let definitions = collect_definitions(config);
        let shared = SchemaWalker::with_shared_definitions(&definitions);
        for (name, node) in &definitions {
            parts.push(ts_definition(&shared, node, name)?);
        }

        let inputs = SchemaWalker::with_shared_definitions(&config.definitions);
        for op in config.operations.iter().filter(|op| op.has_input()) {
            let name = format!("{}Input", operation_type_name(&op.name));
            parts.push(ts_interface(&inputs, &op.variables_schema, &name)?);
        }

        for op in &config.operations {
            let type_name = operation_type_name(&op.name);
            let data_type = match op.response_data_schema()? {
                Some(data) => {
                    let scope = definition_scope(config, &op.response_schema);
                    let walker = SchemaWalker::with_shared_definitions(&scope);
                    parts.push(ts_interface(&walker, data, &format!("{type_name}ResponseData"))?);
                    format!("{type_name}ResponseData")
                }
                None => "unknown".to_string(),
            };
            parts.push(format!(
                "export interface {type_name}Response {{\n\tdata?: {data_type};\n\terrors?: ReadonlyArray<GraphQLError>;\n}}\n"
            ));
        }

        Ok(vec![OutputFile::new(MODELS_PATH, parts.join("\n")).with_header(header())])
    }
}

/// Operation metadata and typed operation maps
#[derive(Debug, Clone, Default)]
pub struct TsClient {
    config: TypeScriptTemplateConfig,
}

impl TsClient {
    pub fn new(config: TypeScriptTemplateConfig) -> Self {
        Self { config }
    }
}

/// One entry of an operation map, collecting the model types it references
fn operation_entry(
    op: &Operation,
    live_marker: Option<&str>,
    imports: &mut BTreeSet<String>,
) -> GenerationResult<String> {
    let type_name = operation_type_name(&op.name);
    let input = if op.has_input() {
        imports.insert(format!("{type_name}Input"));
        format!("input: {type_name}Input;")
    } else {
        "input?: undefined;".to_string()
    };
    let data = match op.response_data_schema()? {
        Some(_) => {
            imports.insert(format!("{type_name}ResponseData"));
            format!("{type_name}ResponseData")
        }
        None => "unknown".to_string(),
    };

    let mut entry = format!(
        "\t{key}: {{\n\t\t{input}\n\t\tdata: {data};\n\t\trequiresAuthentication: {auth};\n",
        key = quote(&op.name),
        auth = op.requires_authentication,
    );
    if let Some(marker) = live_marker {
        entry.push_str(&format!("\t\tliveQuery: {marker};\n"));
    }
    entry.push_str("\t};\n");
    Ok(entry)
}

fn operation_map<'a>(
    name: &str,
    operations: impl Iterator<Item = &'a Operation>,
    live_marker: impl Fn(&Operation) -> Option<&'static str>,
    imports: &mut BTreeSet<String>,
) -> GenerationResult<String> {
    let mut out = format!("export type {name} = {{\n");
    for op in operations {
        out.push_str(&operation_entry(op, live_marker(op), imports)?);
    }
    out.push_str("};\n");
    Ok(out)
}

impl Template for TsClient {
    fn id(&self) -> String {
        format!("typescript.client[{}]", self.config.module_name)
    }

    fn generate(&self, config: &GenerationConfig) -> GenerationResult<Vec<OutputFile>> {
        let mut imports = BTreeSet::new();

        let queries = operation_map(
            "Queries",
            config.operations_of(OperationKind::Query),
            |op| op.is_live_query.then_some("boolean"),
            &mut imports,
        )?;
        let mutations = operation_map(
            "Mutations",
            config.operations_of(OperationKind::Mutation),
            |_| None,
            &mut imports,
        )?;
        let subscriptions = operation_map(
            "Subscriptions",
            config.operations_of(OperationKind::Subscription),
            |_| None,
            &mut imports,
        )?;
        let live_queries = operation_map(
            "LiveQueries",
            config
                .operations_of(OperationKind::Query)
                .filter(|op| op.is_live_query),
            |_| Some("true"),
            &mut imports,
        )?;

        let mut content = String::new();
        if !imports.is_empty() {
            let names: Vec<_> = imports.into_iter().collect();
            content.push_str(&format!("import type {{ {} }} from \"./models\";\n\n", names.join(", ")));
        }

        content.push_str(&format!(
            "export const defaultClientConfig = {{\n\tbaseURL: {},\n}} as const;\n\n",
            quote(&config.deployment_base_url)
        ));

        content.push_str(
            "export interface OperationMetadata {\n\t[operationName: string]: {\n\t\trequiresAuthentication: boolean;\n\t};\n}\n\n",
        );
        content.push_str("export const operationMetadata: OperationMetadata = {\n");
        for op in &config.operations {
            content.push_str(&format!(
                "\t{}: {{\n\t\trequiresAuthentication: {},\n\t}},\n",
                quote(&op.name),
                op.requires_authentication
            ));
        }
        content.push_str("};\n\n");

        for map in [queries, mutations, subscriptions, live_queries] {
            content.push_str(&map);
            content.push('\n');
        }

        content.push_str(
            "export interface Operations {\n\tqueries: Queries;\n\tmutations: Mutations;\n\tsubscriptions: Subscriptions;\n\tliveQueries: LiveQueries;\n}\n",
        );

        let path = format!("{}.ts", self.config.module_name);
        Ok(vec![OutputFile::new(path, content).with_header(header())])
    }

    fn dependencies(&self) -> Vec<TemplateRef> {
        vec![Arc::new(TsModels)]
    }
}

#[cfg(test)]
#[path = "typescript/typescript_tests.rs"]
mod typescript_tests;
