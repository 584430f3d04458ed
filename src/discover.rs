//! Recursive discovery of configuration files and items under a scan root.
//!
//! All returned paths are relative to the root, so the store can key
//! directories by structured paths rather than platform-specific strings.

use crate::config::ScanOptions;
use crate::error::{ResolveError, ResolveResult};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Walk `root` and collect every file accepted by `keep`, relative to `root`.
fn walk_files(
    root: &Path,
    follow_links: bool,
    keep: impl Fn(&Path) -> bool,
) -> ResolveResult<Vec<PathBuf>> {
    let mut found = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(follow_links)
        .sort_by(|a, b| a.file_name().cmp(b.file_name()))
    {
        let entry = entry.map_err(|e| ResolveError::Walk {
            root: root.to_path_buf(),
            reason: e.to_string(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if !keep(path) {
            continue;
        }
        let rel_path = path.strip_prefix(root).map_err(|_| ResolveError::Walk {
            root: root.to_path_buf(),
            reason: format!("{} escaped the scan root", path.display()),
        })?;
        found.push(rel_path.to_path_buf());
    }

    found.sort();
    Ok(found)
}

/// Every file named exactly `file_name` under `root`.
pub fn discover_named(
    root: &Path,
    file_name: &str,
    follow_links: bool,
) -> ResolveResult<Vec<PathBuf>> {
    walk_files(root, follow_links, |path| {
        path.file_name().is_some_and(|n| n == file_name)
    })
}

/// Directories (relative to `root`, `""` for the root itself) that hold a
/// directory-level configuration file.
pub fn discover_config_dirs(root: &Path, options: &ScanOptions) -> ResolveResult<Vec<PathBuf>> {
    let files = discover_named(root, &options.config_file, options.follow_links)?;
    Ok(files
        .into_iter()
        .map(|file| file.parent().map(Path::to_path_buf).unwrap_or_default())
        .collect())
}

/// Every item under `root`, sorted.
pub fn discover_items(root: &Path, options: &ScanOptions) -> ResolveResult<Vec<PathBuf>> {
    walk_files(root, options.follow_links, |path| options.is_item(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "{}").unwrap();
    }

    #[test]
    fn test_config_dirs_relative_to_root() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "config.json");
        touch(temp.path(), "a/b/config.json");
        touch(temp.path(), "a/notes.txt");

        let dirs = discover_config_dirs(temp.path(), &ScanOptions::default()).unwrap();
        assert_eq!(dirs, vec![PathBuf::new(), PathBuf::from("a/b")]);
    }

    #[test]
    fn test_items_by_extension() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "x/roads.shp");
        touch(temp.path(), "x/roads.json");
        touch(temp.path(), "rivers.SHP");

        let items = discover_items(temp.path(), &ScanOptions::default()).unwrap();
        assert_eq!(
            items,
            vec![PathBuf::from("rivers.SHP"), PathBuf::from("x/roads.shp")]
        );
    }

    #[test]
    fn test_missing_root_is_walk_error() {
        let temp = TempDir::new().unwrap();
        let err = discover_items(&temp.path().join("nope"), &ScanOptions::default()).unwrap_err();
        assert!(matches!(err, ResolveError::Walk { .. }));
    }
}
