//! Hierarchical configuration resolution.
//!
//! A tree holds directory-level files (`config.json`) and per-item sidecar
//! overrides. Resolution runs in two phases:
//!
//! 1. [`ConfigStore::build`] walks the tree once and stores, per configured
//!    directory, the node inherited from its nearest configured ancestor.
//! 2. [`ItemResolver::resolve`] combines an item's governing node with its
//!    optional override, substitutes tokens and looks up the named binding.
//!
//! The store is immutable once built, so phase 2 can run on many threads.

mod ancestor;
mod item;
mod merge;
mod node;
mod store;
mod tokens;

pub use ancestor::{ancestor_entry, resolve_ancestor};
pub use item::{ItemResolver, ResolvedItem, resolve_item};
pub use merge::merge;
pub use node::{
    BINDING_KEY, BINDINGS_KEY, BindingRef, Bindings, ConfigNode, ItemOverride, MIX_KEY, MixPolicy,
    Overlay, RawConfig, SETTINGS_KEY, Settings,
};
pub use store::{ConfigStore, require_configured};
pub use tokens::{FILE_NAME_NO_EXT_TOKEN, FILE_NAME_TOKEN, TokenTable};
