//! Generate command implementation

use crate::manifest::{DEFAULT_MANIFEST, Manifest, manifest_dir};
use anyhow::{Context, Result};
use opsgen_codegen::{Formatter, TemplateExecutor, templates_for, write_outputs};
use std::path::{Path, PathBuf};
use tracing::info;

/// Run generation for a manifest
pub fn run(manifest_path: Option<String>, output: Option<String>, no_format: bool) -> Result<()> {
    let path = PathBuf::from(manifest_path.unwrap_or_else(|| DEFAULT_MANIFEST.to_string()));
    let manifest = Manifest::from_file(&path)?;
    let base_dir = manifest_dir(&path);
    let output_dir = match output {
        Some(dir) => PathBuf::from(dir),
        None => base_dir.join(&manifest.project.output),
    };

    let written = generate(&manifest, &base_dir, &output_dir, manifest.format.enabled && !no_format)?;

    println!("Generated {} file(s) for {}:", written.len(), manifest.project.name);
    for file in &written {
        println!("  {}", file.display());
    }
    Ok(())
}

/// Generate every enabled target into `output_dir`
pub fn generate(manifest: &Manifest, base_dir: &Path, output_dir: &Path, format: bool) -> Result<Vec<PathBuf>> {
    manifest.validate()?;
    let config = manifest.load_config(base_dir)?;

    let roots = templates_for(&manifest.targets(), &manifest.go, &manifest.typescript);
    let formatter = if format { Formatter::new() } else { Formatter::disabled() };
    let executor = TemplateExecutor::new(formatter);

    let files = executor
        .execute(&config, &roots)
        .with_context(|| format!("Generation failed for {}", manifest.project.name))?;
    let written = write_outputs(output_dir, &files)
        .with_context(|| format!("Failed to write output to {}", output_dir.display()))?;

    info!(project = %manifest.project.name, files = written.len(), "generation finished");
    Ok(written)
}

#[cfg(test)]
#[path = "generate/generate_tests.rs"]
mod generate_tests;
