//! End-to-end generation through the executor

#![allow(non_snake_case)]

use opsgen_codegen::prelude::*;
use opsgen_codegen::{CommandTool, TargetLanguage, templates_for};
use opsgen_core::{ExecutionEngine, GenerationError, OperationKind};
use std::sync::Arc;

fn users_update() -> Operation {
    Operation::new("users/update", OperationKind::Mutation, ExecutionEngine::NodeJs)
        .with_variables(
            SchemaNode::object()
                .with_property("id", SchemaNode::string(), true)
                .with_property("name", SchemaNode::string(), true)
                .with_property("bio", SchemaNode::string(), false),
        )
        .with_response(SchemaNode::object().with_property("id", SchemaNode::string(), true))
}

fn config() -> GenerationConfig {
    GenerationConfig::new("http://localhost:9991").with_operation(users_update())
}

fn find<'a>(files: &'a [OutputFile], path: &str) -> &'a OutputFile {
    files
        .iter()
        .find(|f| f.path == path)
        .unwrap_or_else(|| panic!("missing {path}"))
}

#[test]
fn golang_templates___models_merged_in_dependency_order() {
    let executor = TemplateExecutor::new(Formatter::disabled());

    let files = executor
        .execute(&config(), &golang_templates(GoTemplateConfig::default()))
        .unwrap();

    let paths: Vec<_> = files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec!["client.go", "models.go"]);

    let models = find(&files, "models.go");
    assert_eq!(
        models.header.as_deref(),
        Some("// Code generated by opsgen. DO NOT EDIT.\npackage client\n\n")
    );
    let base = models.content.find("type GraphQLError struct").unwrap();
    let input = models.content.find("type Users_updateInput struct").unwrap();
    let data = models.content.find("type Users_updateResponseData struct").unwrap();
    let response = models.content.find("type Users_updateResponse struct").unwrap();
    assert!(base < input && input < data && data < response);
    assert_eq!(models.content.matches("type GraphQLError struct").count(), 1);
}

#[test]
fn typescript_templates___models_and_client() {
    let executor = TemplateExecutor::new(Formatter::disabled());

    let files = executor
        .execute(&config(), &typescript_templates(TypeScriptTemplateConfig::default()))
        .unwrap();

    let paths: Vec<_> = files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec!["client.ts", "models.ts"]);
    assert!(find(&files, "models.ts").content.contains("\tbio?: string;\n\tid: string;\n\tname: string;\n"));
}

#[test]
fn templates_for___combines_targets() {
    let roots = templates_for(
        &[TargetLanguage::Go, TargetLanguage::TypeScript],
        &GoTemplateConfig::default(),
        &TypeScriptTemplateConfig::default(),
    );
    let executor = TemplateExecutor::new(Formatter::disabled());

    let files = executor.execute(&config(), &roots).unwrap();

    assert_eq!(files.len(), 4);
}

#[test]
fn Formatter___missing_tool___generation_still_succeeds() {
    let formatter = Formatter::disabled().with_tool("go", Arc::new(CommandTool::new("opsgen-missing-gofmt")));
    let unformatted = TemplateExecutor::new(Formatter::disabled())
        .execute(&config(), &golang_templates(GoTemplateConfig::default()))
        .unwrap();

    let files = TemplateExecutor::new(formatter)
        .execute(&config(), &golang_templates(GoTemplateConfig::default()))
        .unwrap();

    assert_eq!(files, unformatted);
}

#[test]
fn TemplateExecutor___unknown_engine___aborts_with_template_name() {
    let op = Operation::new("legacy/op", OperationKind::Query, ExecutionEngine::Other("soap".into()));
    let config = GenerationConfig::default().with_operation(op);

    let result = TemplateExecutor::new(Formatter::disabled())
        .execute(&config, &golang_templates(GoTemplateConfig::default()));

    let err = result.unwrap_err();
    assert!(matches!(err, GenerationError::TemplateFailed { .. }));
    assert!(matches!(
        err.root_cause(),
        GenerationError::UnhandledExecutionEngine { engine, .. } if engine == "soap"
    ));
}

#[test]
fn TemplateExecutor___unresolved_reference___aborts() {
    let op = Operation::new("users/get", OperationKind::Query, ExecutionEngine::NodeJs)
        .with_variables(SchemaNode::object().with_property("user", SchemaNode::reference("Missing"), true));
    let config = GenerationConfig::default().with_operation(op);

    let err = TemplateExecutor::new(Formatter::disabled())
        .execute(&config, &golang_templates(GoTemplateConfig::default()))
        .unwrap_err();

    assert!(matches!(err.root_cause(), GenerationError::UnresolvedReference { name } if name == "Missing"));
}
