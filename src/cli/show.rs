//! Show subcommand for geo2sql
//!
//! Prints the configuration governing one directory, or the fully resolved
//! binding and settings of one item.

use super::parse_format;
use crate::config::ScanOptions;
use crate::error::ResolveError;
use crate::format::{OutputFormat, format_item, format_node};
use crate::resolve::{ConfigStore, ItemResolver, ancestor_entry};
use crate::validate::{BindingSchema, validate_tree};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the show subcommand
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Input folder
    pub folder: PathBuf,

    /// Directory or item, relative to the folder
    pub path: PathBuf,

    /// Output format: json or markdown
    #[arg(short, long, default_value = "json", value_parser = parse_format)]
    pub format: OutputFormat,
}

/// Validate, build the store and render the requested node or item.
pub fn run_show(args: &ShowArgs, scan: &ScanOptions) -> Result<String> {
    validate_tree(&args.folder, scan, &BindingSchema)?;
    let store = ConfigStore::build(&args.folder, scan)?;
    let target = store.relative(&args.path);

    if store.absolute(&target).is_dir() {
        let text = match store.node(&target) {
            Some(node) => format_node(&target, &target, node, args.format),
            None => {
                let (source, node) = ancestor_entry(&store, &target)
                    .ok_or_else(|| ResolveError::NoConfigFound(target.clone()))?;
                format_node(&target, source, node, args.format)
            }
        };
        return Ok(text);
    }

    let resolved = ItemResolver::from_options(&store, scan).resolve(&target)?;
    Ok(format_item(&resolved, args.format))
}
