//! Best-effort formatting through external tools.
//!
//! A missing tool is a warning and the content passes through unchanged. A
//! tool that runs and fails is fatal: the error carries the generated content
//! with line numbers next to the tool's diagnostics.

use opsgen_core::{GenerationError, GenerationResult};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::Arc;
use thiserror::Error;

/// Failure modes of an external tool run
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("{tool} exited with {status}: {stderr}")]
    Failed {
        tool: String,
        status: String,
        stderr: String,
    },

    #[error("I/O error running {tool}: {source}")]
    Io {
        tool: String,
        #[source]
        source: std::io::Error,
    },
}

/// A formatter process the generator can call
pub trait ExternalTool: Send + Sync {
    fn name(&self) -> &str;

    /// Whether the tool can be invoked at all
    fn available(&self) -> bool;

    /// Format `content`, returning the formatted text
    fn run(&self, content: &str) -> Result<String, ToolError>;
}

/// An external program fed through stdin/stdout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTool {
    program: String,
    args: Vec<String>,
}

impl CommandTool {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append an argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn gofmt() -> Self {
        Self::new("gofmt")
    }

    pub fn prettier_typescript() -> Self {
        Self::new("prettier").arg("--parser").arg("typescript")
    }
}

impl ExternalTool for CommandTool {
    fn name(&self) -> &str {
        &self.program
    }

    fn available(&self) -> bool {
        which::which(&self.program).is_ok()
    }

    fn run(&self, content: &str) -> Result<String, ToolError> {
        let io_err = |source: std::io::Error| ToolError::Io {
            tool: self.program.clone(),
            source,
        };

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => ToolError::NotFound(self.program.clone()),
                _ => io_err(e),
            })?;

        // Write from a separate thread so a full stdout pipe cannot block us
        let writer = child.stdin.take().map(|mut stdin| {
            let input = content.as_bytes().to_vec();
            std::thread::spawn(move || stdin.write_all(&input))
        });

        let output = child.wait_with_output().map_err(io_err)?;
        let written = match writer.map(|handle| handle.join()) {
            None => Ok(()),
            Some(Ok(result)) => result,
            Some(Err(_)) => Err(std::io::Error::other("stdin writer panicked")),
        };

        // A tool that exits early closes stdin; its status explains more than EPIPE
        if !output.status.success() {
            return Err(ToolError::Failed {
                tool: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        written.map_err(io_err)?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Routes generated files to formatters by extension
#[derive(Clone)]
pub struct Formatter {
    tools: BTreeMap<String, Arc<dyn ExternalTool>>,
}

impl Default for Formatter {
    fn default() -> Self {
        Self::disabled()
            .with_tool("go", Arc::new(CommandTool::gofmt()))
            .with_tool("ts", Arc::new(CommandTool::prettier_typescript()))
    }
}

impl std::fmt::Debug for Formatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tools: BTreeMap<&str, &str> = self
            .tools
            .iter()
            .map(|(ext, tool)| (ext.as_str(), tool.name()))
            .collect();
        f.debug_struct("Formatter").field("tools", &tools).finish()
    }
}

impl Formatter {
    /// `gofmt` for `.go`, `prettier` for `.ts`
    pub fn new() -> Self {
        Self::default()
    }

    /// A formatter that passes everything through
    pub fn disabled() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    /// Use `tool` for files ending in `.<extension>`
    pub fn with_tool(mut self, extension: impl Into<String>, tool: Arc<dyn ExternalTool>) -> Self {
        self.tools.insert(extension.into(), tool);
        self
    }

    pub fn is_enabled(&self) -> bool {
        !self.tools.is_empty()
    }

    /// Format the content of `path`
    pub fn format(&self, path: &str, content: &str) -> GenerationResult<String> {
        let Some(tool) = Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| self.tools.get(ext))
        else {
            return Ok(content.to_string());
        };

        if !tool.available() {
            self.warn_missing(path, tool.name());
            return Ok(content.to_string());
        }

        match tool.run(content) {
            Ok(formatted) => {
                tracing::debug!(path, tool = tool.name(), "formatted");
                Ok(formatted)
            }
            Err(ToolError::NotFound(_)) => {
                self.warn_missing(path, tool.name());
                Ok(content.to_string())
            }
            Err(ToolError::Failed { stderr, .. }) => Err(GenerationError::FormatterFailure {
                path: path.to_string(),
                annotated: linefy(content),
                diagnostics: stderr,
            }),
            Err(err @ ToolError::Io { .. }) => Err(GenerationError::FormatterFailure {
                path: path.to_string(),
                annotated: linefy(content),
                diagnostics: err.to_string(),
            }),
        }
    }

    fn warn_missing(&self, path: &str, tool: &str) {
        let err = GenerationError::FormatterMissing {
            tool: tool.to_string(),
        };
        tracing::warn!(path, error = %err, "leaving output unformatted; install {tool} to prettify generated code");
    }
}

/// Prefix every line with its 1-based number
///
/// Lines are split on `\r?\n` and joined with `\n`.
pub fn linefy(content: &str) -> String {
    content
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .enumerate()
        .map(|(idx, line)| format!("{}: {line}", idx + 1))
        .collect::<Vec<_>>()
        .join("\n")
}
