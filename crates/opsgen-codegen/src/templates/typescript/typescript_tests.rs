#![allow(non_snake_case)]

use super::*;
use opsgen_core::ExecutionEngine;
use serde_json::json;

fn users_update() -> Operation {
    Operation::new("users/update", OperationKind::Mutation, ExecutionEngine::NodeJs)
        .with_variables(
            SchemaNode::object()
                .with_property("id", SchemaNode::string(), true)
                .with_property("name", SchemaNode::string(), true)
                .with_property("bio", SchemaNode::string(), false),
        )
        .with_response(SchemaNode::object().with_property("id", SchemaNode::string(), true))
        .with_authentication(true)
}

fn users_get_live() -> Operation {
    Operation::new("users/get", OperationKind::Query, ExecutionEngine::NodeJs)
        .with_response(SchemaNode::object().with_property("name", SchemaNode::string(), false))
        .with_live_query(true)
}

#[test]
fn TsModels___users_update___optional_marker_only_on_bio() {
    let config = GenerationConfig::default().with_operation(users_update());

    let files = TsModels.generate(&config).unwrap();

    assert_eq!(files[0].path, "models.ts");
    assert!(files[0].content.contains(
        "export interface Users_updateInput {\n\tbio?: string;\n\tid: string;\n\tname: string;\n}\n"
    ));
    assert!(files[0].content.contains("export interface Users_updateResponseData {\n\tid: string;\n}\n"));
    assert!(files[0].content.contains("export interface GraphQLError {"));
}

#[test]
fn TsModels___nested_enum_and_definitions() {
    let schema: SchemaNode = serde_json::from_value(json!({
        "type": "object",
        "properties": {
            "role": { "type": "string", "enum": ["ADMIN", "USER"] },
            "items": {
                "type": "array",
                "items": { "type": "object", "properties": { "sku": { "type": "string" } } }
            },
            "owner": { "$ref": "#/definitions/User" },
            "first-name": { "type": "string" }
        },
        "required": ["role"],
        "definitions": {
            "User": { "type": "object", "properties": { "email": { "type": "string" } } }
        }
    }))
    .unwrap();
    let op = Operation::new("orders/create", OperationKind::Mutation, ExecutionEngine::NodeJs).with_variables(schema);
    let config = GenerationConfig::default().with_operation(op);

    let out = &TsModels.generate(&config).unwrap()[0].content;

    assert!(out.contains("\trole: \"ADMIN\" | \"USER\";\n"));
    assert!(out.contains("\titems?: {\n\t\tsku?: string;\n\t}[];\n"));
    assert!(out.contains("\towner?: User;\n"));
    assert!(out.contains("\t\"first-name\"?: string;\n"));
    assert!(out.contains("export interface User {\n\temail?: string;\n}\n"));
}

#[test]
fn TsModels___enum_definition___literal_union_alias() {
    let op = Operation::new("users/get", OperationKind::Query, ExecutionEngine::NodeJs)
        .with_response(SchemaNode::object().with_property("status", SchemaNode::reference("Status"), true));
    let config = GenerationConfig::default()
        .with_operation(op)
        .with_definition("Status", SchemaNode::string().with_enum(vec![json!("ACTIVE"), json!("BANNED")]));

    let out = &TsModels.generate(&config).unwrap()[0].content;

    assert!(out.contains("export type Status = \"ACTIVE\" | \"BANNED\";\n"));
    assert!(!out.contains("export interface Status"));
    assert!(out.contains("\tstatus: Status;\n"));
}

#[test]
fn TsModels___scalar_and_array_definitions() {
    let config = GenerationConfig::default()
        .with_definition("Score", SchemaNode::number())
        .with_definition("Tags", SchemaNode::array(SchemaNode::string()))
        .with_definition(
            "Roles",
            SchemaNode::array(SchemaNode::string().with_enum(vec![json!("ADMIN"), json!("USER")])),
        )
        .with_definition(
            "Lines",
            SchemaNode::array(SchemaNode::object().with_property("sku", SchemaNode::string(), true)),
        );

    let out = &TsModels.generate(&config).unwrap()[0].content;

    assert!(out.contains("export type Score = number;\n"));
    assert!(out.contains("export type Tags = string[];\n"));
    assert!(out.contains("export type Roles = (\"ADMIN\" | \"USER\")[];\n"));
    assert!(out.contains("export type Lines = {\n\tsku: string;\n}[];\n"));
}

#[test]
fn TsModels___response_without_data_is_unknown() {
    let op = Operation::new("ping", OperationKind::Query, ExecutionEngine::GraphQl);
    let config = GenerationConfig::default().with_operation(op);

    let out = &TsModels.generate(&config).unwrap()[0].content;

    assert!(out.contains("export interface PingResponse {\n\tdata?: unknown;"));
    assert!(!out.contains("PingResponseData"));
}

#[test]
fn TsClient___operation_maps_and_metadata() {
    let config = GenerationConfig::new("https://api.example.com")
        .with_operation(users_update())
        .with_operation(users_get_live());

    let files = TsClient::default().generate(&config).unwrap();

    assert_eq!(files[0].path, "client.ts");
    let out = &files[0].content;
    assert!(out.starts_with(
        "import type { Users_getResponseData, Users_updateInput, Users_updateResponseData } from \"./models\";\n"
    ));
    assert!(out.contains("baseURL: \"https://api.example.com\","));
    assert!(out.contains("\t\"users/update\": {\n\t\trequiresAuthentication: true,\n\t},\n"));
    assert!(out.contains(
        "export type Mutations = {\n\t\"users/update\": {\n\t\tinput: Users_updateInput;\n\t\tdata: Users_updateResponseData;\n\t\trequiresAuthentication: true;\n\t};\n};\n"
    ));
    assert!(out.contains(
        "export type LiveQueries = {\n\t\"users/get\": {\n\t\tinput?: undefined;\n\t\tdata: Users_getResponseData;\n\t\trequiresAuthentication: false;\n\t\tliveQuery: true;\n\t};\n};\n"
    ));
    assert!(out.contains("\t\tliveQuery: boolean;\n"));
    assert!(out.contains("export type Subscriptions = {\n};\n"));
}

#[test]
fn TsClient___module_name_sets_file_name() {
    let client = TsClient::new(TypeScriptTemplateConfig {
        module_name: "api".into(),
    });

    let files = client.generate(&GenerationConfig::default()).unwrap();

    assert_eq!(files[0].path, "api.ts");
    assert!(!files[0].content.contains("import type"));
    assert_eq!(client.id(), "typescript.client[api]");
}

#[test]
fn typescript_templates___client_depends_on_models() {
    let roots = typescript_templates(TypeScriptTemplateConfig::default());

    assert_eq!(roots.len(), 1);
    let deps: Vec<_> = roots[0].dependencies().iter().map(|t| t.id()).collect();
    assert_eq!(deps, vec!["typescript.models"]);
}
