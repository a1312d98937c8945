//! Manifest parsing and validation

use anyhow::{Context, Result};
use opsgen_codegen::{GoTemplateConfig, TargetLanguage, TypeScriptTemplateConfig};
use opsgen_core::GenerationConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_MANIFEST: &str = "opsgen.toml";

/// opsgen.toml manifest structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub project: ProjectSection,

    #[serde(default)]
    pub targets: TargetsSection,

    #[serde(default)]
    pub go: GoTemplateConfig,

    #[serde(default)]
    pub typescript: TypeScriptTemplateConfig,

    #[serde(default)]
    pub format: FormatSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSection {
    pub name: String,

    /// Operations JSON, relative to the manifest
    #[serde(default = "default_config_path")]
    pub config: PathBuf,

    /// Output directory, relative to the manifest
    #[serde(default = "default_output_dir")]
    pub output: PathBuf,
}

fn default_config_path() -> PathBuf {
    PathBuf::from("operations.json")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("generated")
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetsSection {
    #[serde(default)]
    pub go: bool,

    #[serde(default)]
    pub typescript: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatSection {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

impl Default for FormatSection {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Manifest {
    /// Load manifest from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read manifest: {:?}", path.as_ref()))?;

        Self::from_str(&content)
    }

    /// Parse manifest from string
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse manifest")
    }

    /// Validate the manifest
    pub fn validate(&self) -> Result<()> {
        if self.project.name.is_empty() {
            anyhow::bail!("Project name cannot be empty");
        }

        if self.targets().is_empty() {
            anyhow::bail!("At least one target must be enabled under [targets]");
        }

        if self.targets.go && !is_go_package_name(&self.go.package_name) {
            anyhow::bail!("Invalid Go package name: {:?}", self.go.package_name);
        }

        if self.targets.typescript && !is_module_name(&self.typescript.module_name) {
            anyhow::bail!("Invalid TypeScript module name: {:?}", self.typescript.module_name);
        }

        if self.targets.typescript && self.typescript.module_name == "models" {
            anyhow::bail!("TypeScript module name \"models\" collides with models.ts");
        }

        Ok(())
    }

    /// Enabled targets in a fixed order
    pub fn targets(&self) -> Vec<TargetLanguage> {
        let mut targets = Vec::new();
        if self.targets.go {
            targets.push(TargetLanguage::Go);
        }
        if self.targets.typescript {
            targets.push(TargetLanguage::TypeScript);
        }
        targets
    }

    /// Load and validate the operations file the manifest points to
    pub fn load_config(&self, base_dir: &Path) -> Result<GenerationConfig> {
        let path = base_dir.join(&self.project.config);
        let config = GenerationConfig::from_file(&path)
            .with_context(|| format!("Failed to load operations: {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid operations in {}", path.display()))?;
        Ok(config)
    }
}

/// Lowercase Go package identifier
fn is_go_package_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// Plain file stem without path separators
fn is_module_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
        && !name.starts_with('.')
}

/// Directory that relative manifest paths resolve against
pub fn manifest_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Check command implementation
pub fn check(manifest_path: Option<String>) -> Result<()> {
    let path = PathBuf::from(manifest_path.unwrap_or_else(|| DEFAULT_MANIFEST.to_string()));

    println!("Checking manifest: {}", path.display());

    let manifest = Manifest::from_file(&path)?;
    manifest.validate()?;
    let config = manifest.load_config(&manifest_dir(&path))?;

    let targets: Vec<String> = manifest.targets().iter().map(ToString::to_string).collect();
    println!("✓ Project: {}", manifest.project.name);
    println!("✓ Targets: {}", targets.join(", "));
    println!("✓ Operations: {}", config.operations.len());
    println!("✓ Definitions: {}", config.definitions.len());
    println!("\nManifest is valid!");

    Ok(())
}
