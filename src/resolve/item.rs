//! Per-item resolution: ancestor node + optional override + tokens + binding.

use super::ancestor::ancestor_entry;
use super::merge::merge;
use super::node::{BINDING_KEY, BindingRef, ItemOverride, Settings};
use super::store::ConfigStore;
use super::tokens::TokenTable;
use crate::config::ScanOptions;
use crate::error::{ResolveError, ResolveResult};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The effective configuration of one item, ready for the sink writer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedItem {
    /// Item path relative to the scan root
    pub item: PathBuf,
    /// Directory whose node governed the item
    pub governed_by: PathBuf,
    /// Name of the binding the item targets
    pub binding_name: String,
    /// The binding itself, unchanged
    #[serde(skip)]
    pub binding: BindingRef,
    /// Merged settings after token substitution
    pub settings: Settings,
}

/// Resolves items against a built store. Holds no state of its own, so one
/// resolver can be shared across worker threads.
#[derive(Debug, Clone, Copy)]
pub struct ItemResolver<'a> {
    store: &'a ConfigStore,
    override_extension: &'a str,
    bindings_file: Option<&'a str>,
}

impl<'a> ItemResolver<'a> {
    pub fn new(store: &'a ConfigStore, override_extension: &'a str) -> Self {
        Self {
            store,
            override_extension,
            bindings_file: None,
        }
    }

    /// Resolver using the override extension and reserved file names of `options`.
    pub fn from_options(store: &'a ConfigStore, options: &'a ScanOptions) -> Self {
        Self::new(store, &options.override_extension).with_bindings_file(&options.bindings_file)
    }

    /// Never treat the binding descriptor file as an item override.
    pub fn with_bindings_file(mut self, bindings_file: &'a str) -> Self {
        self.bindings_file = Some(bindings_file);
        self
    }

    pub fn store(&self) -> &'a ConfigStore {
        self.store
    }

    /// Sidecar override file for an item (same base name, override extension).
    ///
    /// `None` when the sidecar name collides with the directory-level file or
    /// the binding descriptor file: an item named `config.shp` has no override.
    pub fn override_path(&self, item: &Path) -> Option<PathBuf> {
        let path = self
            .store
            .absolute(item)
            .with_extension(self.override_extension);
        let file_name = path.file_name()?;
        if file_name == self.store.config_file()
            || self.bindings_file.is_some_and(|name| file_name == name)
        {
            return None;
        }
        Some(path)
    }

    /// Resolve the binding and settings for a single item.
    pub fn resolve(&self, item: &Path) -> ResolveResult<ResolvedItem> {
        let rel_item = self.store.relative(item);
        let item_override = match self.override_path(item) {
            Some(path) => ItemOverride::load(&path)?,
            None => None,
        };

        let (governed_by, ancestor) = ancestor_entry(self.store, item)
            .ok_or_else(|| ResolveError::NoConfigFound(rel_item.clone()))?;

        let merged = merge(Some(ancestor), item_override.as_ref());

        let binding_name = match merged.settings.get(BINDING_KEY) {
            Some(Value::String(name)) => name.clone(),
            _ => return Err(ResolveError::MissingBindingReference(rel_item)),
        };

        // Bindings come from the ancestor: connection identity is not an
        // item-level tunable.
        let binding = ancestor
            .binding(&binding_name)
            .cloned()
            .ok_or_else(|| ResolveError::UnknownBinding {
                item: rel_item.clone(),
                name: binding_name.clone(),
            })?;

        let settings = TokenTable::for_item(&rel_item).apply(&merged.settings);

        debug!(
            "Resolved {} -> db '{}' via {}",
            rel_item.display(),
            binding_name,
            governed_by.display()
        );

        Ok(ResolvedItem {
            item: rel_item,
            governed_by: governed_by.to_path_buf(),
            binding_name,
            binding,
            settings,
        })
    }
}

/// Resolve one item with the default scan options (`json` overrides).
pub fn resolve_item(store: &ConfigStore, item: &Path) -> ResolveResult<(BindingRef, Settings)> {
    let options = ScanOptions::default();
    let resolved = ItemResolver::from_options(store, &options).resolve(item)?;
    Ok((resolved.binding, resolved.settings))
}
