//! Configuration types for the tool itself.
//!
//! These are the knobs that decide *where* to look (file names, extensions,
//! worker count); the per-directory files the tool reads are modelled in
//! `crate::resolve`.

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level tool configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub scan: ScanOptions,
}

impl AppConfig {
    /// Load a single explicit configuration file (YAML or JSON).
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.scan.validate()
    }
}

/// What the scanner looks for while walking a tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanOptions {
    /// Directory-level configuration file name.
    #[serde(default = "default_config_file")]
    pub config_file: String,

    /// Binding descriptor file name, validated before the store is built.
    #[serde(default = "default_bindings_file")]
    pub bindings_file: String,

    /// Extension of the per-item override sidecar.
    #[serde(default = "default_override_extension")]
    pub override_extension: String,

    /// Extensions of files treated as items.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Follow symlinks while walking.
    #[serde(default)]
    pub follow_links: bool,

    /// Worker threads for item resolution.
    #[serde(default = "default_jobs")]
    pub jobs: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            config_file: default_config_file(),
            bindings_file: default_bindings_file(),
            override_extension: default_override_extension(),
            extensions: default_extensions(),
            follow_links: false,
            jobs: default_jobs(),
        }
    }
}

impl ScanOptions {
    pub fn validate(&self) -> Result<()> {
        if self.config_file.is_empty() {
            return Err(anyhow!("scan.config_file must not be empty"));
        }
        if self.bindings_file.is_empty() {
            return Err(anyhow!("scan.bindings_file must not be empty"));
        }
        if self.extensions.is_empty() {
            return Err(anyhow!("scan.extensions must list at least one extension"));
        }
        if self
            .extensions
            .iter()
            .any(|ext| ext.trim_start_matches('.').eq_ignore_ascii_case(&self.override_extension))
        {
            return Err(anyhow!(
                "scan.override_extension '{}' collides with an item extension",
                self.override_extension
            ));
        }
        if self.jobs == 0 {
            return Err(anyhow!("scan.jobs must be at least 1"));
        }
        Ok(())
    }

    /// Whether `path` has one of the item extensions (case-insensitive).
    pub fn is_item(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        self.extensions
            .iter()
            .any(|candidate| candidate.trim_start_matches('.').eq_ignore_ascii_case(ext))
    }
}

fn default_config_file() -> String {
    "config.json".to_string()
}

fn default_bindings_file() -> String {
    "dbs.json".to_string()
}

fn default_override_extension() -> String {
    "json".to_string()
}

fn default_extensions() -> Vec<String> {
    vec!["shp".to_string()]
}

fn default_jobs() -> usize {
    1
}
