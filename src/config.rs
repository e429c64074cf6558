//! Generator configuration
//!
//! Read from a `modelgen.toml` that usually sits next to the type graph:
//!
//! ```toml
//! [classifier]
//! base_namespace = "cloud/db"
//!
//! [projection]
//! output_namespace = "apis"
//!
//! [projection.namespace_map]
//! "example.com/cloud/compute/models" = "example.com/cloud/apis/compute"
//!
//! [synthesis]
//! strict_shapes = false
//!
//! [[managers]]
//! type = "example.com/cloud/compute/models.SServerManager"
//! keyword = "server"
//! keyword_plural = "servers"
//! service = "compute"
//! ```

use crate::classify::{ClassifierSettings, ManagerInstance, ManagerRegistry};
use crate::projection::ProjectionSettings;
use crate::registry::QualifiedName;
use crate::synthesis::SynthesisSettings;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File name looked up next to the type graph
pub const CONFIG_FILE_NAME: &str = "modelgen.toml";

/// One registered manager instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerEntry {
    /// Qualified name of the manager type
    #[serde(rename = "type")]
    pub ty: QualifiedName,
    pub keyword: String,
    pub keyword_plural: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub classifier: ClassifierSettings,
    pub projection: ProjectionSettings,
    pub synthesis: SynthesisSettings,
    pub managers: Vec<ManagerEntry>,
}

impl GeneratorConfig {
    /// Manager lookup table handed to the classifier
    ///
    /// A manager listed twice keeps its last entry.
    pub fn manager_registry(&self) -> ManagerRegistry {
        let mut registry = ManagerRegistry::new();
        for entry in &self.managers {
            let mut instance = ManagerInstance::new(&entry.keyword, &entry.keyword_plural);
            instance.service = entry.service.clone();
            if registry.register(entry.ty.clone(), instance).is_some() {
                warn!(manager = %entry.ty, "manager registered more than once; last entry wins");
            }
        }
        registry
    }
}

/// Load configuration from a TOML file
///
/// Returns `Ok(None)` if the file doesn't exist (not an error) and `Err` if it
/// exists but fails to parse.
pub fn load_config(config_path: &Path) -> anyhow::Result<Option<GeneratorConfig>> {
    if !config_path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read generator config: {}", config_path.display()))?;

    let config: GeneratorConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse generator config: {}", config_path.display()))?;

    Ok(Some(config))
}

/// `modelgen.toml` in the same directory as the graph, if present
pub fn auto_detect_config_path(graph_path: &Path) -> Option<PathBuf> {
    let graph_dir = graph_path.parent()?;
    let config_path = graph_dir.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        Some(config_path)
    } else {
        None
    }
}

/// Resolve the config path
///
/// Priority:
/// 1. Explicitly provided path (via CLI)
/// 2. Auto-detected alongside the graph
/// 3. None (defaults)
pub fn resolve_config_path(explicit_path: Option<&Path>, graph_path: &Path) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path.to_path_buf());
    }
    auto_detect_config_path(graph_path)
}

/// Load the effective configuration for `graph_path`
///
/// An explicit path that does not exist is an error; an absent
/// auto-detected file falls back to defaults.
pub fn resolve_config(explicit_path: Option<&Path>, graph_path: &Path) -> anyhow::Result<GeneratorConfig> {
    let Some(path) = resolve_config_path(explicit_path, graph_path) else {
        debug!("no generator config found; using defaults");
        return Ok(GeneratorConfig::default());
    };
    match load_config(&path)? {
        Some(config) => {
            debug!(path = %path.display(), managers = config.managers.len(), "generator config loaded");
            Ok(config)
        }
        None => anyhow::bail!("Generator config not found: {}", path.display()),
    }
}
