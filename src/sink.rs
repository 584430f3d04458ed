//! Boundary to the external sink writer.
//!
//! The resolver never interprets sink settings; `SinkParams` only picks out
//! the keys a writer understands so every writer reads them the same way.

use crate::resolve::{ResolvedItem, Settings};
use anyhow::Result;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

/// Settings key naming the target table.
pub const TABLE_KEY: &str = "name";

/// Settings key listing candidate index columns.
pub const OPTIONAL_INDEX_KEY: &str = "optional_index";

/// Keys passed to the writer untouched.
pub const SINK_KEYS: &[&str] = &[
    "if_exists",
    "schema",
    "index",
    "index_label",
    "chunksize",
    "dtype",
];

/// Writer-facing view of an item's settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SinkParams {
    pub table: String,
    pub options: Settings,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub optional_index: Vec<String>,
}

impl SinkParams {
    /// `None` when the settings do not name a target table.
    pub fn from_settings(settings: &Settings) -> Option<Self> {
        let table = settings.get(TABLE_KEY)?.as_str()?.to_string();
        let options = SINK_KEYS
            .iter()
            .filter_map(|key| settings.get(*key).map(|v| (key.to_string(), v.clone())))
            .collect();
        let optional_index = settings
            .get(OPTIONAL_INDEX_KEY)
            .and_then(Value::as_array)
            .map(|candidates| {
                candidates
                    .iter()
                    .filter_map(|c| c.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();
        Some(Self {
            table,
            options,
            optional_index,
        })
    }

    /// Promote the first candidate column present in `columns` to the index.
    ///
    /// For writers that have read the item and know its columns; resolution
    /// alone never sees them, so `DryRunSink` leaves the candidates in
    /// `optional_index`. Does nothing when an explicit `index_label` is
    /// already set. Returns the promoted column.
    pub fn promote_index(&mut self, columns: &[String]) -> Option<&str> {
        if self.options.contains_key("index_label") {
            return None;
        }
        let column = self
            .optional_index
            .iter()
            .find(|candidate| columns.contains(candidate))?
            .clone();
        self.options.insert("index".to_string(), Value::Bool(false));
        self.options
            .insert("index_label".to_string(), Value::String(column));
        self.options.get("index_label").and_then(Value::as_str)
    }
}

/// Writes one resolved item to its destination.
pub trait Sink: Sync {
    fn write(&self, resolved: &ResolvedItem, params: &SinkParams) -> Result<()>;
}

/// Sink that only logs what a real writer would receive.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunSink;

impl Sink for DryRunSink {
    fn write(&self, resolved: &ResolvedItem, params: &SinkParams) -> Result<()> {
        info!(
            "Would load {} into table '{}' on db '{}' ({})",
            resolved.item.display(),
            params.table,
            resolved.binding_name,
            resolved.binding.redacted()
        );
        Ok(())
    }
}
