//! Go client generation.

use super::{GENERATED_NOTICE, alias_schema, collect_definitions, definition_scope, is_alias};
use crate::mapper::{TargetLanguage, TypeMapper};
use crate::naming::{go_identifier, operation_type_name, quote, to_pascal_case};
use crate::template::{Template, TemplateRef};
use crate::visitor::{CompositeKind, SchemaEvent, SchemaVisitor, SchemaWalker};
use opsgen_core::{GenerationConfig, GenerationResult, Operation, OperationKind, OutputFile, SchemaNode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const MODELS_PATH: &str = "models.go";
const CLIENT_PATH: &str = "client.go";

/// Options shared by the Go templates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoTemplateConfig {
    /// Go package the files are generated into
    #[serde(default = "default_package_name")]
    pub package_name: String,
}

fn default_package_name() -> String {
    "client".to_string()
}

impl Default for GoTemplateConfig {
    fn default() -> Self {
        Self {
            package_name: default_package_name(),
        }
    }
}

impl GoTemplateConfig {
    pub fn new(package_name: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
        }
    }

    fn header(&self) -> String {
        format!("{GENERATED_NOTICE}\npackage {}\n\n", self.package_name)
    }
}

/// Root templates for a complete Go client
pub fn golang_templates(config: GoTemplateConfig) -> Vec<TemplateRef> {
    vec![
        Arc::new(GoInputModels::new(config.clone())),
        Arc::new(GoResponseModels::new(config.clone())),
        Arc::new(GoClient::new(config)),
    ]
}

/// Renders one Go struct per walked schema
///
/// In alias mode the root holds a single field whose type becomes the
/// declared type (`type Status string`).
struct GoStructWriter {
    mapper: TypeMapper,
    name: String,
    with_errors: bool,
    alias: bool,
    out: String,
    depth: usize,
}

impl GoStructWriter {
    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.out.push('\t');
        }
        self.out.push_str(text);
        self.out.push('\n');
    }
}

impl SchemaVisitor for GoStructWriter {
    fn visit(&mut self, event: SchemaEvent<'_>) {
        match event {
            SchemaEvent::Enter {
                kind: CompositeKind::Root,
                ..
            } if self.alias => {
                self.out.push_str(&format!("type {} ", self.name));
                self.depth = 0;
            }
            SchemaEvent::Leave {
                kind: CompositeKind::Root,
                ..
            } if self.alias => {}
            SchemaEvent::Enter {
                kind: CompositeKind::Object,
                field,
                ..
            } if self.alias && self.depth == 0 => {
                let opened = self.mapper.open_object(field);
                self.out.push_str(&format!("{}\n", opened.type_syntax));
                self.depth = 1;
            }
            SchemaEvent::Leave {
                kind: CompositeKind::Object,
                ..
            } if self.alias && self.depth == 1 => {
                self.depth = 0;
                self.out.push_str("}\n");
            }
            SchemaEvent::Leaf { leaf, field, .. } if self.alias && self.depth == 0 => {
                let mapped = self.mapper.map_leaf(&leaf, field);
                self.out.push_str(&format!("{}\n", mapped.type_syntax));
            }
            SchemaEvent::Enter {
                kind: CompositeKind::Root,
                ..
            } => {
                self.out.push_str(&format!("type {} struct {{\n", self.name));
                self.depth = 1;
            }
            SchemaEvent::Leave {
                kind: CompositeKind::Root,
                ..
            } => {
                if self.with_errors {
                    self.line("Errors []GraphQLError `json:\"errors,omitempty\"`");
                }
                self.depth = 0;
                self.out.push_str("}\n");
            }
            SchemaEvent::Enter {
                kind: CompositeKind::Object,
                field,
                ..
            } => {
                let opened = self.mapper.open_object(field);
                self.line(&format!("{} {}", opened.identifier, opened.type_syntax));
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
                self.line(&mapped.go_line());
            }
        }
    }
}

/// Render `schema` as `type <name> struct { ... }`
fn go_struct(walker: &SchemaWalker<'_>, schema: &SchemaNode, name: &str, with_errors: bool) -> GenerationResult<String> {
    let mut writer = GoStructWriter {
        mapper: TypeMapper::new(TargetLanguage::Go),
        name: go_identifier(name),
        with_errors,
        alias: false,
        out: String::new(),
        depth: 0,
    };
    walker.walk(schema, &mut writer)?;
    Ok(writer.out)
}

/// Render a named definition: a struct for objects, `type <name> T` otherwise
fn go_definition(walker: &SchemaWalker<'_>, node: &SchemaNode, name: &str) -> GenerationResult<String> {
    if !is_alias(node) {
        return go_struct(walker, node, name, false);
    }
    let mut writer = GoStructWriter {
        mapper: TypeMapper::new(TargetLanguage::Go),
        name: go_identifier(name),
        with_errors: false,
        alias: true,
        out: String::new(),
        depth: 0,
    };
    walker.walk(&alias_schema(node), &mut writer)?;
    Ok(writer.out)
}

/// Declarations are separated by a blank line, and the trailing blank line
/// keeps contributions from different templates apart after merging.
fn models_file(content: Vec<String>, header: Option<String>) -> Vec<OutputFile> {
    let mut body = content.join("\n");
    if !body.is_empty() {
        body.push('\n');
    }
    let file = OutputFile::new(MODELS_PATH, body);
    vec![match header {
        Some(header) => file.with_header(header),
        None => file,
    }]
}

/// `GraphQLError`, shared by every response model
#[derive(Debug, Clone, Default)]
pub struct GoModelsBase;

impl Template for GoModelsBase {
    fn id(&self) -> String {
        "go.models_base".to_string()
    }

    fn generate(&self, _config: &GenerationConfig) -> GenerationResult<Vec<OutputFile>> {
        let content = "type GraphQLError struct {\n\tMessage string `json:\"message\"`\n\tPath []interface{} `json:\"path,omitempty\"`\n}\n";
        Ok(models_file(vec![content.to_string()], None))
    }
}

/// `<Op>Input` for every operation that takes input
#[derive(Debug, Clone, Default)]
pub struct GoInputModels {
    config: GoTemplateConfig,
}

impl GoInputModels {
    pub fn new(config: GoTemplateConfig) -> Self {
        Self { config }
    }
}

impl Template for GoInputModels {
    fn id(&self) -> String {
        format!("go.input_models[{}]", self.config.package_name)
    }

    fn generate(&self, config: &GenerationConfig) -> GenerationResult<Vec<OutputFile>> {
        let walker = SchemaWalker::with_shared_definitions(&config.definitions);
        let content = config
            .operations
            .iter()
            .filter(|op| op.has_input())
            .map(|op| {
                let name = format!("{}Input", operation_type_name(&op.name));
                go_struct(&walker, &op.variables_schema, &name, false)
            })
            .collect::<GenerationResult<Vec<_>>>()?;
        Ok(models_file(content, Some(self.config.header())))
    }

    fn dependencies(&self) -> Vec<TemplateRef> {
        vec![Arc::new(GoModelsBase)]
    }
}

/// `<Op>ResponseData` for every operation with a data schema
#[derive(Debug, Clone, Default)]
pub struct GoResponseDataModels {
    config: GoTemplateConfig,
}

impl GoResponseDataModels {
    pub fn new(config: GoTemplateConfig) -> Self {
        Self { config }
    }
}

impl Template for GoResponseDataModels {
    fn id(&self) -> String {
        format!("go.response_data_models[{}]", self.config.package_name)
    }

    fn generate(&self, config: &GenerationConfig) -> GenerationResult<Vec<OutputFile>> {
        let mut content = Vec::new();
        for op in &config.operations {
            let Some(data) = op.response_data_schema()? else {
                continue;
            };
            let scope = definition_scope(config, &op.response_schema);
            let walker = SchemaWalker::with_shared_definitions(&scope);
            let name = format!("{}ResponseData", operation_type_name(&op.name));
            content.push(go_struct(&walker, data, &name, false)?);
        }
        Ok(models_file(content, Some(self.config.header())))
    }
}

/// One struct per named definition
#[derive(Debug, Clone, Default)]
pub struct GoDefinitionModels {
    config: GoTemplateConfig,
}

impl GoDefinitionModels {
    pub fn new(config: GoTemplateConfig) -> Self {
        Self { config }
    }
}

impl Template for GoDefinitionModels {
    fn id(&self) -> String {
        format!("go.definition_models[{}]", self.config.package_name)
    }

    fn generate(&self, config: &GenerationConfig) -> GenerationResult<Vec<OutputFile>> {
        let definitions = collect_definitions(config);
        let walker = SchemaWalker::with_shared_definitions(&definitions);
        let content = definitions
            .iter()
            .map(|(name, node)| go_definition(&walker, node, name))
            .collect::<GenerationResult<Vec<_>>>()?;
        Ok(models_file(content, Some(self.config.header())))
    }
}

/// `<Op>Response { Data, Errors }` for every operation
#[derive(Debug, Clone, Default)]
pub struct GoResponseModels {
    config: GoTemplateConfig,
}

impl GoResponseModels {
    pub fn new(config: GoTemplateConfig) -> Self {
        Self { config }
    }
}

impl Template for GoResponseModels {
    fn id(&self) -> String {
        format!("go.response_models[{}]", self.config.package_name)
    }

    fn generate(&self, config: &GenerationConfig) -> GenerationResult<Vec<OutputFile>> {
        let walker = SchemaWalker::new();
        let mut content = Vec::new();
        for op in &config.operations {
            let type_name = operation_type_name(&op.name);
            let schema = match op.response_data_schema()? {
                Some(_) => {
                    let data_name = format!("{type_name}ResponseData");
                    SchemaNode::object()
                        .with_property("data", SchemaNode::reference(&data_name), false)
                        .with_definition(data_name, SchemaNode::object())
                }
                None => SchemaNode::object().with_property("data", SchemaNode::default(), false),
            };
            content.push(go_struct(&walker, &schema, &format!("{type_name}Response"), true)?);
        }
        Ok(models_file(content, Some(self.config.header())))
    }

    fn dependencies(&self) -> Vec<TemplateRef> {
        vec![
            Arc::new(GoModelsBase),
            Arc::new(GoResponseDataModels::new(self.config.clone())),
            Arc::new(GoDefinitionModels::new(self.config.clone())),
        ]
    }
}

/// Typed HTTP client with one method per operation
#[derive(Debug, Clone, Default)]
pub struct GoClient {
    config: GoTemplateConfig,
}

impl GoClient {
    pub fn new(config: GoTemplateConfig) -> Self {
        Self { config }
    }
}

const CLIENT_RUNTIME: &str = r#"type Client struct {
	baseURL    string
	httpClient *http.Client
	headers    map[string]string
}

// NewClient creates a client. An empty baseURL uses DefaultBaseURL and a nil
// httpClient uses http.DefaultClient.
func NewClient(baseURL string, httpClient *http.Client) *Client {
	if baseURL == "" {
		baseURL = DefaultBaseURL
	}
	if httpClient == nil {
		httpClient = http.DefaultClient
	}
	return &Client{baseURL: baseURL, httpClient: httpClient, headers: map[string]string{}}
}

// WithHeaders returns a copy of the client that sends additional headers.
func (c *Client) WithHeaders(headers map[string]string) *Client {
	merged := make(map[string]string, len(c.headers)+len(headers))
	for k, v := range c.headers {
		merged[k] = v
	}
	for k, v := range headers {
		merged[k] = v
	}
	return &Client{baseURL: c.baseURL, httpClient: c.httpClient, headers: merged}
}

type requestBody struct {
	Input interface{}            `json:"input,omitempty"`
	Meta  map[string]interface{} `json:"meta"`
}

func (c *Client) send(ctx context.Context, operation string, flag string, input interface{}) (*http.Response, error) {
	body, err := json.Marshal(requestBody{
		Input: input,
		Meta:  map[string]interface{}{"clientRequestContext": map[string]interface{}{}},
	})
	if err != nil {
		return nil, err
	}
	url := c.baseURL + "/operations/" + operation
	if flag != "" {
		url += "?" + flag
	}
	req, err := http.NewRequestWithContext(ctx, http.MethodPost, url, bytes.NewReader(body))
	if err != nil {
		return nil, err
	}
	req.Header.Set("Content-Type", "application/json")
	for k, v := range c.headers {
		req.Header.Set(k, v)
	}
	res, err := c.httpClient.Do(req)
	if err != nil {
		return nil, err
	}
	if res.StatusCode < 200 || res.StatusCode > 299 {
		res.Body.Close()
		return nil, fmt.Errorf("%s: unexpected status %d", operation, res.StatusCode)
	}
	return res, nil
}

func (c *Client) do(ctx context.Context, operation string, input interface{}, out interface{}) error {
	res, err := c.send(ctx, operation, "", input)
	if err != nil {
		return err
	}
	defer res.Body.Close()
	return json.NewDecoder(res.Body).Decode(out)
}

func (c *Client) stream(ctx context.Context, operation string, flag string, input interface{}, next func(*json.Decoder) error) error {
	res, err := c.send(ctx, operation, flag, input)
	if err != nil {
		return err
	}
	defer res.Body.Close()
	decoder := json.NewDecoder(res.Body)
	for decoder.More() {
		if err := next(decoder); err != nil {
			return err
		}
	}
	return nil
}
"#;

impl GoClient {
    fn request_method(&self, prefix: &str, op: &Operation) -> String {
        let type_name = operation_type_name(&op.name);
        let (param, arg) = input_param(op, &type_name);
        format!(
            "func (c *Client) {prefix}{method}(ctx context.Context{param}) (*{type_name}Response, error) {{\n\
             \tvar out {type_name}Response\n\
             \tif err := c.do(ctx, {path}, {arg}, &out); err != nil {{\n\
             \t\treturn nil, err\n\
             \t}}\n\
             \treturn &out, nil\n\
             }}\n",
            method = to_pascal_case(&op.name),
            path = quote(&op.name),
        )
    }

    fn stream_method(&self, prefix: &str, flag: &str, op: &Operation) -> String {
        let type_name = operation_type_name(&op.name);
        let (param, arg) = input_param(op, &type_name);
        format!(
            "func (c *Client) {prefix}{method}(ctx context.Context{param}, handler func(*{type_name}Response)) error {{\n\
             \treturn c.stream(ctx, {path}, {flag}, {arg}, func(decoder *json.Decoder) error {{\n\
             \t\tvar out {type_name}Response\n\
             \t\tif err := decoder.Decode(&out); err != nil {{\n\
             \t\t\treturn err\n\
             \t\t}}\n\
             \t\thandler(&out)\n\
             \t\treturn nil\n\
             \t}})\n\
             }}\n",
            method = to_pascal_case(&op.name),
            path = quote(&op.name),
            flag = quote(flag),
        )
    }
}

/// Parameter declaration and call argument for an operation's input
fn input_param(op: &Operation, type_name: &str) -> (String, String) {
    if op.has_input() {
        (format!(", input {type_name}Input"), "input".to_string())
    } else {
        (String::new(), "nil".to_string())
    }
}

impl Template for GoClient {
    fn id(&self) -> String {
        format!("go.client[{}]", self.config.package_name)
    }

    fn generate(&self, config: &GenerationConfig) -> GenerationResult<Vec<OutputFile>> {
        let mut content = String::new();
        content.push_str("import (\n\t\"bytes\"\n\t\"context\"\n\t\"encoding/json\"\n\t\"fmt\"\n\t\"net/http\"\n)\n\n");
        content.push_str("// DefaultBaseURL is the deployment this client was generated for.\n");
        content.push_str(&format!("const DefaultBaseURL = {}\n\n", quote(&config.deployment_base_url)));
        content.push_str(CLIENT_RUNTIME);

        for op in config.operations_of(OperationKind::Query) {
            content.push('\n');
            content.push_str(&self.request_method("Query", op));
            if op.is_live_query {
                content.push('\n');
                content.push_str(&self.stream_method("LiveQuery", "wg_live", op));
            }
        }
        for op in config.operations_of(OperationKind::Mutation) {
            content.push('\n');
            content.push_str(&self.request_method("Mutate", op));
        }
        for op in config.operations_of(OperationKind::Subscription) {
            content.push('\n');
            content.push_str(&self.stream_method("Subscribe", "", op));
        }

        Ok(vec![OutputFile::new(CLIENT_PATH, content).with_header(self.config.header())])
    }
}
