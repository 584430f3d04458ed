//! Configuration loader with tier-based merging.
//!
//! Loads tool configuration from multiple tiers and merges them field-by-field.

use super::merge::deep_merge_all;
use super::types::AppConfig;
use anyhow::{Context, Result, anyhow};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File name looked up in the project directory.
pub const PROJECT_CONFIG_FILE: &str = "geo2sql.yaml";

/// File name looked up in the user directory.
pub const USER_CONFIG_FILE: &str = "config.yaml";

/// Configuration tier priority (lowest to highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigTier {
    /// Embedded defaults (lowest priority)
    Defaults = 0,
    /// Project-level config (`$CWD/geo2sql.yaml`)
    Project = 1,
    /// User-level config (`~/.geo2sql/config.yaml`)
    User = 2,
    /// Environment variables (highest priority)
    Environment = 3,
}

impl std::fmt::Display for ConfigTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigTier::Defaults => write!(f, "defaults"),
            ConfigTier::Project => write!(f, "project"),
            ConfigTier::User => write!(f, "user"),
            ConfigTier::Environment => write!(f, "environment"),
        }
    }
}

/// Paths for each configuration tier.
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    /// Project-level config directory
    pub project_dir: Option<PathBuf>,
    /// User-level config directory
    pub user_dir: Option<PathBuf>,
    /// Explicit config file; replaces the project and user tiers
    pub explicit: Option<PathBuf>,
}

impl Default for ConfigPaths {
    fn default() -> Self {
        Self::discover()
    }
}

impl ConfigPaths {
    /// Discover configuration paths from environment and defaults.
    pub fn discover() -> Self {
        // User dir: GEO2SQL_USER_DIR or ~/.geo2sql
        let user_dir = std::env::var("GEO2SQL_USER_DIR")
            .ok()
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".geo2sql")));

        // Project dir: GEO2SQL_PROJECT_DIR or $CWD
        let project_dir = std::env::var("GEO2SQL_PROJECT_DIR")
            .ok()
            .map(PathBuf::from)
            .or_else(|| Some(PathBuf::from(".")));

        let explicit = std::env::var("GEO2SQL_CONFIG_PATH").ok().map(PathBuf::from);

        Self {
            project_dir,
            user_dir,
            explicit,
        }
    }

    /// Create paths with explicit directories.
    pub fn with_dirs(project_dir: Option<PathBuf>, user_dir: Option<PathBuf>) -> Self {
        Self {
            project_dir,
            user_dir,
            explicit: None,
        }
    }

    /// Use a single explicit file instead of the project and user tiers.
    pub fn with_explicit(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit = Some(path.into());
        self
    }

    fn tier_file(&self, tier: ConfigTier) -> Option<PathBuf> {
        match tier {
            ConfigTier::Project => self.project_dir.as_ref().map(|d| d.join(PROJECT_CONFIG_FILE)),
            ConfigTier::User => self.user_dir.as_ref().map(|d| d.join(USER_CONFIG_FILE)),
            ConfigTier::Defaults | ConfigTier::Environment => None,
        }
    }
}

/// Configuration loader that handles tier-based merging.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Paths for each tier
    pub paths: ConfigPaths,
    /// Loaded configuration
    config: AppConfig,
    /// Files that contributed, lowest tier first
    sources: Vec<(ConfigTier, PathBuf)>,
}

impl ConfigLoader {
    /// Load configuration from all tiers with proper merging.
    pub fn load() -> Result<Self> {
        Self::load_with_paths(ConfigPaths::discover())
    }

    /// Load configuration with explicit paths.
    pub fn load_with_paths(paths: ConfigPaths) -> Result<Self> {
        let mut sources = Vec::new();

        // An explicit file is authoritative and must parse
        if let Some(ref explicit) = paths.explicit {
            let mut config = AppConfig::load(explicit)?;
            Self::apply_env_overrides(&mut config)?;
            config.validate()?;
            sources.push((ConfigTier::Project, explicit.clone()));
            return Ok(Self {
                paths,
                config,
                sources,
            });
        }

        let mut configs: Vec<Value> = Vec::new();

        // Tier 1: Defaults (embedded)
        configs.push(serde_json::to_value(AppConfig::default())?);

        // Tier 2 and 3: Project, then user
        for tier in [ConfigTier::Project, ConfigTier::User] {
            let Some(file) = paths.tier_file(tier) else {
                continue;
            };
            if !file.exists() {
                continue;
            }
            match Self::read_tier(&file) {
                Ok(value) => {
                    debug!("Loaded {} config from {}", tier, file.display());
                    configs.push(value);
                    sources.push((tier, file));
                }
                Err(e) => warn!("Ignoring {} config {}: {:#}", tier, file.display(), e),
            }
        }

        let merged = deep_merge_all(configs);
        let mut config: AppConfig = serde_json::from_value(merged)?;

        // Tier 4: Environment variable overrides
        Self::apply_env_overrides(&mut config)?;
        config.validate()?;

        Ok(Self {
            paths,
            config,
            sources,
        })
    }

    fn read_tier(file: &Path) -> Result<Value> {
        let content = std::fs::read_to_string(file)?;
        let value: Value = serde_yaml::from_str(&content)?;
        Ok(value)
    }

    /// Apply environment variable overrides to config.
    fn apply_env_overrides(config: &mut AppConfig) -> Result<()> {
        if let Ok(jobs) = std::env::var("GEO2SQL_JOBS") {
            config.scan.jobs = jobs
                .trim()
                .parse()
                .with_context(|| format!("GEO2SQL_JOBS is not a number: {}", jobs))?;
        }

        if let Ok(extensions) = std::env::var("GEO2SQL_EXTENSIONS") {
            let parsed: Vec<String> = extensions
                .split(',')
                .map(|e| e.trim().to_string())
                .filter(|e| !e.is_empty())
                .collect();
            if parsed.is_empty() {
                return Err(anyhow!("GEO2SQL_EXTENSIONS lists no extensions"));
            }
            config.scan.extensions = parsed;
        }

        Ok(())
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Consume the loader and return the configuration.
    pub fn into_config(self) -> AppConfig {
        self.config
    }

    /// Files that contributed to the configuration, lowest tier first.
    pub fn sources(&self) -> &[(ConfigTier, PathBuf)] {
        &self.sources
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_defaults_only() {
        let temp = TempDir::new().unwrap();
        let paths = ConfigPaths::with_dirs(
            Some(temp.path().join("project")),
            Some(temp.path().join("user")),
        );

        let loader = ConfigLoader::load_with_paths(paths).unwrap();
        assert_eq!(loader.config().scan.config_file, "config.json");
        assert!(loader.sources().is_empty());
    }

    #[test]
    fn test_user_config_overrides_project() {
        let temp = TempDir::new().unwrap();
        let project_dir = temp.path().join("project");
        let user_dir = temp.path().join("user");
        std::fs::create_dir_all(&project_dir).unwrap();
        std::fs::create_dir_all(&user_dir).unwrap();

        std::fs::write(
            project_dir.join(PROJECT_CONFIG_FILE),
            "scan:\n  extensions: [shp, gpkg]\n  bindings_file: targets.json\n",
        )
        .unwrap();
        std::fs::write(
            user_dir.join(USER_CONFIG_FILE),
            "scan:\n  bindings_file: mine.json\n",
        )
        .unwrap();

        let paths = ConfigPaths::with_dirs(Some(project_dir), Some(user_dir));
        let loader = ConfigLoader::load_with_paths(paths).unwrap();
        let scan = &loader.config().scan;

        assert_eq!(scan.bindings_file, "mine.json");
        assert_eq!(scan.extensions, vec!["shp".to_string(), "gpkg".to_string()]);
        assert_eq!(loader.sources().len(), 2);
    }

    #[test]
    fn test_broken_tier_is_skipped() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(PROJECT_CONFIG_FILE), "scan: [unterminated").unwrap();

        let paths = ConfigPaths::with_dirs(Some(temp.path().to_path_buf()), None);
        let loader = ConfigLoader::load_with_paths(paths).unwrap();
        assert_eq!(loader.config().scan, super::super::ScanOptions::default());
    }

    #[test]
    fn test_broken_explicit_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("custom.yaml");
        std::fs::write(&file, "scan: [unterminated").unwrap();

        let paths = ConfigPaths::with_dirs(None, None).with_explicit(&file);
        assert!(ConfigLoader::load_with_paths(paths).is_err());
    }
}
