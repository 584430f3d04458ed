//! Closest-ancestor lookup.

use super::node::ConfigNode;
use super::store::ConfigStore;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Nearest configured directory strictly above `path`, walking from its
/// immediate parent up to the scan root.
pub(crate) fn nearest_in<'a>(
    nodes: &'a BTreeMap<PathBuf, ConfigNode>,
    path: &Path,
) -> Option<(&'a Path, &'a ConfigNode)> {
    path.ancestors()
        .skip(1)
        .find_map(|dir| nodes.get_key_value(dir))
        .map(|(dir, node)| (dir.as_path(), node))
}

/// The node governing `path` (a file or a directory), or `None` when no
/// ancestor is configured.
pub fn resolve_ancestor<'a>(store: &'a ConfigStore, path: &Path) -> Option<&'a ConfigNode> {
    ancestor_entry(store, path).map(|(_, node)| node)
}

/// Like [`resolve_ancestor`], also returning which directory supplied the node.
pub fn ancestor_entry<'a>(
    store: &'a ConfigStore,
    path: &Path,
) -> Option<(&'a Path, &'a ConfigNode)> {
    nearest_in(store.nodes(), &store.relative(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::node::Settings;

    fn nodes(dirs: &[&str]) -> BTreeMap<PathBuf, ConfigNode> {
        dirs.iter()
            .map(|d| {
                let mut settings = Settings::new();
                settings.insert("dir".into(), (*d).into());
                (PathBuf::from(d), ConfigNode::new(settings, Default::default()))
            })
            .collect()
    }

    #[test]
    fn test_nearest_wins() {
        let map = nodes(&["", "a", "a/b/c"]);
        let (dir, _) = nearest_in(&map, Path::new("a/b/c/d/item.shp")).unwrap();
        assert_eq!(dir, Path::new("a/b/c"));
        let (dir, _) = nearest_in(&map, Path::new("a/b/item.shp")).unwrap();
        assert_eq!(dir, Path::new("a"));
    }

    #[test]
    fn test_root_entry_reached() {
        let map = nodes(&[""]);
        let (dir, _) = nearest_in(&map, Path::new("x/y/item.shp")).unwrap();
        assert_eq!(dir, Path::new(""));
    }

    #[test]
    fn test_directory_does_not_match_itself() {
        let map = nodes(&["a"]);
        assert!(nearest_in(&map, Path::new("a")).is_none());
        assert!(nearest_in(&map, Path::new("")).is_none());
    }

    #[test]
    fn test_nothing_configured() {
        let map = nodes(&[]);
        assert!(nearest_in(&map, Path::new("a/item.shp")).is_none());
    }
}
