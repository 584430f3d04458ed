//! Per-directory store of fully inherited configuration nodes.
//!
//! Directories are processed in path order. `Path` ordering is component-wise,
//! so an ancestor always sorts before its descendants and its node is already
//! stored when a descendant looks for it. Construction is all-or-nothing: the
//! first bad file aborts the build and no partial store escapes.

use super::ancestor::nearest_in;
use super::merge::merge;
use super::node::{ConfigNode, RawConfig};
use crate::config::ScanOptions;
use crate::discover::discover_config_dirs;
use crate::error::{ResolveError, ResolveResult};
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, error, info};

/// Immutable map from directory (relative to the scan root) to its node.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    root: PathBuf,
    config_file: String,
    nodes: BTreeMap<PathBuf, ConfigNode>,
}

impl ConfigStore {
    /// Discover every directory-level file under `root` and build the store.
    pub fn build(root: &Path, options: &ScanOptions) -> ResolveResult<Self> {
        let dirs = discover_config_dirs(root, options)?;
        info!(
            "Found {} '{}' files under {}",
            dirs.len(),
            options.config_file,
            root.display()
        );
        Self::build_from_dirs(root, &options.config_file, dirs)
    }

    /// Build from an explicit list of directories, in any order.
    pub fn build_from_dirs(
        root: &Path,
        config_file: &str,
        dirs: impl IntoIterator<Item = PathBuf>,
    ) -> ResolveResult<Self> {
        let mut dirs: Vec<PathBuf> = dirs.into_iter().map(|d| normalize(&d)).collect();
        dirs.sort();
        dirs.dedup();

        let mut nodes: BTreeMap<PathBuf, ConfigNode> = BTreeMap::new();
        for dir in dirs {
            let file = root.join(&dir).join(config_file);
            let raw = RawConfig::load(&file).inspect_err(|e| {
                error!("Cannot load {}: {}", file.display(), e);
            })?;

            let node = {
                let parent = nearest_in(&nodes, &dir).map(|(_, node)| node);
                merge(parent, Some(&raw))
            };
            debug!(
                "Resolved {} ({} settings, {} bindings, mix={})",
                file.display(),
                node.settings.len(),
                node.bindings.len(),
                raw.mix
            );
            nodes.insert(dir, node);
        }

        Ok(Self {
            root: root.to_path_buf(),
            config_file: config_file.to_string(),
            nodes,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Exact entry for a directory, if that directory has its own file.
    pub fn node(&self, dir: &Path) -> Option<&ConfigNode> {
        self.nodes.get(&self.relative(dir))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, &ConfigNode)> {
        self.nodes.iter().map(|(dir, node)| (dir.as_path(), node))
    }

    pub(crate) fn nodes(&self) -> &BTreeMap<PathBuf, ConfigNode> {
        &self.nodes
    }

    /// Express `path` relative to the scan root.
    ///
    /// Paths under the root are stripped; anything else is taken as already
    /// relative.
    pub fn relative(&self, path: &Path) -> PathBuf {
        let rel = path.strip_prefix(&self.root).unwrap_or(path);
        normalize(rel)
    }

    /// Absolute (root-joined) location of a relative path.
    pub fn absolute(&self, path: &Path) -> PathBuf {
        self.root.join(self.relative(path))
    }
}

/// Drop `.` components so `./a/b` and `a/b` key the same directory.
fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Guard used by callers that need at least one configured directory.
pub fn require_configured(store: &ConfigStore) -> ResolveResult<()> {
    if store.is_empty() {
        return Err(ResolveError::NoConfigFound(store.root.clone()));
    }
    Ok(())
}
