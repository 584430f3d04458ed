//! Placeholder tokens substituted into per-item settings.

use super::node::Settings;
use serde_json::Value;
use std::path::Path;

/// Replaced with the item's file name, extension included.
pub const FILE_NAME_TOKEN: &str = "{file_name}";

/// Replaced with the item's file name without its extension.
pub const FILE_NAME_NO_EXT_TOKEN: &str = "{file_name_no_ext}";

/// Ordered token -> replacement table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenTable {
    tokens: Vec<(String, String)>,
}

impl TokenTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, token: impl Into<String>, replacement: impl Into<String>) -> Self {
        self.tokens.push((token.into(), replacement.into()));
        self
    }

    /// Tokens derived from an item's base name.
    pub fn for_item(item: &Path) -> Self {
        let name = item
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = item
            .file_stem()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::new()
            .with(FILE_NAME_TOKEN, name)
            .with(FILE_NAME_NO_EXT_TOKEN, stem)
    }

    /// Replace every occurrence of every token, in table order.
    pub fn substitute(&self, input: &str) -> String {
        self.tokens
            .iter()
            .fold(input.to_string(), |acc, (token, replacement)| {
                acc.replace(token.as_str(), replacement)
            })
    }

    /// New settings with every string value substituted; other values pass through.
    pub fn apply(&self, settings: &Settings) -> Settings {
        settings
            .iter()
            .map(|(key, value)| {
                let value = match value {
                    Value::String(s) => Value::String(self.substitute(s)),
                    other => other.clone(),
                };
                (key.clone(), value)
            })
            .collect()
    }
}
