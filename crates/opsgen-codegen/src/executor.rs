//! Template graph resolution, execution, and output merging.
//!
//! Execution order is a depth-first post-order over `dependencies()`: every
//! template runs after the templates it depends on, and siblings keep the
//! order they were declared in. Templates are generated in parallel, but
//! outputs are merged in that fixed order, so the result never depends on
//! which template finished first.

use crate::formatter::Formatter;
use crate::template::TemplateRef;
use opsgen_core::{GenerationConfig, GenerationError, GenerationResult, OutputFile};
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

/// Runs templates and merges their output by path
#[derive(Debug, Clone, Default)]
pub struct TemplateExecutor {
    formatter: Formatter,
}

impl TemplateExecutor {
    pub fn new(formatter: Formatter) -> Self {
        Self { formatter }
    }

    pub fn formatter(&self) -> &Formatter {
        &self.formatter
    }

    /// The transitive closure of `roots` in execution order
    ///
    /// Each template appears once, keyed by [`Template::id`](crate::Template::id).
    pub fn resolve(&self, roots: &[TemplateRef]) -> GenerationResult<Vec<TemplateRef>> {
        let mut marks = HashMap::new();
        let mut stack = Vec::new();
        let mut order = Vec::new();
        for root in roots {
            visit(root, &mut marks, &mut stack, &mut order)?;
        }
        Ok(order)
    }

    /// Generate, merge, and format the output of `roots` and their dependencies
    ///
    /// `config` is validated first, so duplicate operation names and unresolved
    /// references fail before any template runs. Returned files are sorted by path.
    pub fn execute(&self, config: &GenerationConfig, roots: &[TemplateRef]) -> GenerationResult<Vec<OutputFile>> {
        config.validate()?;
        let order = self.resolve(roots)?;
        tracing::debug!(
            templates = order.len(),
            order = ?order.iter().map(|t| t.id()).collect::<Vec<_>>(),
            "resolved template graph"
        );

        let results: Vec<GenerationResult<Vec<OutputFile>>> = order
            .par_iter()
            .map(|template| {
                let id = template.id();
                let files = template.generate(config).map_err(|e| e.in_template(&id))?;
                tracing::debug!(template = %id, files = files.len(), "template generated");
                Ok(files)
            })
            .collect();

        let mut contributions = Vec::with_capacity(results.len());
        for result in results {
            contributions.push(result?);
        }

        let merged = merge(contributions.into_iter().flatten());

        let formatted: Vec<GenerationResult<OutputFile>> = merged
            .into_par_iter()
            .map(|mut file| {
                file.content = self.formatter.format(&file.path, &file.content)?;
                Ok(file)
            })
            .collect();

        let files = formatted.into_iter().collect::<GenerationResult<Vec<_>>>()?;
        tracing::info!(files = files.len(), "generation complete");
        Ok(files)
    }
}

fn visit(
    template: &TemplateRef,
    marks: &mut HashMap<String, Mark>,
    stack: &mut Vec<String>,
    order: &mut Vec<TemplateRef>,
) -> GenerationResult<()> {
    let id = template.id();
    match marks.get(&id) {
        Some(Mark::Done) => return Ok(()),
        Some(Mark::InProgress) => {
            let start = stack.iter().position(|s| *s == id).unwrap_or(0);
            let mut cycle: Vec<String> = stack[start..].to_vec();
            cycle.push(id);
            return Err(GenerationError::CyclicTemplateDependency { cycle });
        }
        None => {}
    }

    marks.insert(id.clone(), Mark::InProgress);
    stack.push(id.clone());
    for dependency in template.dependencies() {
        visit(&dependency, marks, stack, order)?;
    }
    stack.pop();
    marks.insert(id, Mark::Done);
    order.push(template.clone());
    Ok(())
}

/// Concatenate contributions per path, keeping the first non-empty header
///
/// `files` must already be in execution order.
pub fn merge(files: impl IntoIterator<Item = OutputFile>) -> Vec<OutputFile> {
    let mut by_path: BTreeMap<String, OutputFile> = BTreeMap::new();
    for file in files {
        match by_path.get_mut(&file.path) {
            None => {
                let header = file.non_empty_header().map(str::to_string);
                by_path.insert(
                    file.path.clone(),
                    OutputFile {
                        header,
                        ..file
                    },
                );
            }
            Some(merged) => {
                if !file.content.is_empty() {
                    if !merged.content.is_empty() && !merged.content.ends_with('\n') {
                        merged.content.push('\n');
                    }
                    merged.content.push_str(&file.content);
                }
                if merged.header.is_none() {
                    merged.header = file.non_empty_header().map(str::to_string);
                }
            }
        }
    }
    by_path.into_values().collect()
}

/// Write each file's header and content under `dir`
pub fn write_outputs(dir: &Path, files: &[OutputFile]) -> GenerationResult<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let target = dir.join(&file.path);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&target, file.rendered())?;
        tracing::debug!(path = %target.display(), "wrote output");
        written.push(target);
    }
    Ok(written)
}
