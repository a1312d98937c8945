//! Generated files

use serde::{Deserialize, Serialize};

/// One file produced by a template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputFile {
    /// Path relative to the output directory
    pub path: String,

    /// File body without the header
    pub content: String,

    /// Header emitted once at the top of the file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
}

impl OutputFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            header: None,
        }
    }

    /// Attach a header
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    /// The header if present and non-empty
    pub fn non_empty_header(&self) -> Option<&str> {
        self.header.as_deref().filter(|h| !h.is_empty())
    }

    /// Header followed by content
    pub fn rendered(&self) -> String {
        match self.non_empty_header() {
            Some(header) => format!("{header}{}", self.content),
            None => self.content.clone(),
        }
    }
}
