//! Output formatting utilities for markdown and JSON.

use crate::batch::{BatchReport, ItemOutcome};
use crate::resolve::{ConfigNode, ResolvedItem, Settings};
use serde_json::{Value, json};
use std::path::Path;

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Markdown,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "markdown" | "md" => Some(OutputFormat::Markdown),
            _ => None,
        }
    }
}

fn display_dir(dir: &Path) -> String {
    if dir.as_os_str().is_empty() {
        ".".to_string()
    } else {
        dir.display().to_string()
    }
}

fn push_settings(md: &mut String, settings: &Settings) {
    if settings.is_empty() {
        md.push_str("- _no settings_\n");
        return;
    }
    for (key, value) in settings {
        md.push_str(&format!("- **{}**: `{}`\n", key, value));
    }
}

/// Format a batch report.
pub fn format_report(report: &BatchReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(report)
            .unwrap_or_else(|e| json!({"error": e.to_string()}).to_string()),
        OutputFormat::Markdown => format_report_markdown(report),
    }
}

/// Format a batch report as markdown.
pub fn format_report_markdown(report: &BatchReport) -> String {
    let mut md = String::new();

    md.push_str(&format!("# Plan for {}\n\n", report.root.display()));
    md.push_str(&format!(
        "{} configured directories, {} items: {} resolved, {} skipped, {} failed\n",
        report.directories,
        report.entries.len(),
        report.resolved_count(),
        report.skipped_count(),
        report.failed_count()
    ));

    for entry in &report.entries {
        md.push_str(&format!("\n## {}\n", entry.item.display()));
        match &entry.outcome {
            ItemOutcome::Resolved {
                db,
                target,
                governed_by,
                table,
                settings,
            } => {
                md.push_str("- **status**: resolved\n");
                md.push_str(&format!("- **table**: `{}`\n", table));
                md.push_str(&format!("- **db**: {} (`{}`)\n", db, target));
                md.push_str(&format!("- **config**: {}\n", display_dir(governed_by)));
                md.push_str("\n### Settings\n");
                push_settings(&mut md, settings);
            }
            ItemOutcome::Skipped { reason } => {
                md.push_str("- **status**: skipped\n");
                md.push_str(&format!("- **reason**: {}\n", reason));
            }
            ItemOutcome::Failed { error } => {
                md.push_str("- **status**: failed\n");
                md.push_str(&format!(
                    "- **error**: {} ({})\n",
                    error.message,
                    serde_json::to_value(error.code)
                        .ok()
                        .and_then(|v| v.as_str().map(str::to_string))
                        .unwrap_or_default()
                ));
            }
        }
    }

    md
}

/// Format the node governing a directory.
pub fn format_node(dir: &Path, source: &Path, node: &ConfigNode, format: OutputFormat) -> String {
    let bindings: serde_json::Map<String, Value> = node
        .bindings
        .iter()
        .map(|(name, binding)| (name.clone(), binding.redacted()))
        .collect();

    match format {
        OutputFormat::Json => {
            let value = json!({
                "directory": display_dir(dir),
                "config": display_dir(source),
                "settings": node.settings,
                "dbs": bindings,
            });
            serde_json::to_string_pretty(&value).unwrap_or_default()
        }
        OutputFormat::Markdown => {
            let mut md = String::new();
            md.push_str(&format!("# Directory: {}\n", display_dir(dir)));
            md.push_str(&format!("- **config**: {}\n", display_dir(source)));
            md.push_str("\n## Settings\n");
            push_settings(&mut md, &node.settings);
            md.push_str("\n## Databases\n");
            if bindings.is_empty() {
                md.push_str("- _none_\n");
            }
            for (name, binding) in &bindings {
                md.push_str(&format!("- **{}**: `{}`\n", name, binding));
            }
            md
        }
    }
}

/// Format a single resolved item.
pub fn format_item(resolved: &ResolvedItem, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => {
            let value = json!({
                "item": resolved.item,
                "config": display_dir(&resolved.governed_by),
                "db": resolved.binding_name,
                "target": resolved.binding.redacted(),
                "settings": resolved.settings,
            });
            serde_json::to_string_pretty(&value).unwrap_or_default()
        }
        OutputFormat::Markdown => {
            let mut md = String::new();
            md.push_str(&format!("# Item: {}\n", resolved.item.display()));
            md.push_str(&format!("- **config**: {}\n", display_dir(&resolved.governed_by)));
            md.push_str(&format!(
                "- **db**: {} (`{}`)\n",
                resolved.binding_name,
                resolved.binding.redacted()
            ));
            md.push_str("\n## Settings\n");
            push_settings(&mut md, &resolved.settings);
            md
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::ItemEntry;
    use crate::error::{ErrorReport, ResolveError};
    use std::path::PathBuf;

    fn report() -> BatchReport {
        let err = ResolveError::NoConfigFound(PathBuf::from("b.shp"));
        BatchReport {
            root: PathBuf::from("data"),
            directories: 1,
            entries: vec![
                ItemEntry {
                    item: PathBuf::from("a.shp"),
                    outcome: ItemOutcome::Resolved {
                        db: "main".into(),
                        target: json!("pg://m"),
                        governed_by: PathBuf::new(),
                        table: "a".into(),
                        settings: json!({"name": "a"}).as_object().cloned().unwrap(),
                    },
                },
                ItemEntry {
                    item: PathBuf::from("b.shp"),
                    outcome: ItemOutcome::Failed {
                        error: ErrorReport::from(&err),
                    },
                },
            ],
        }
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!(OutputFormat::from_str("MD"), Some(OutputFormat::Markdown));
        assert_eq!(OutputFormat::from_str("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str("yaml"), None);
    }

    #[test]
    fn test_markdown_report() {
        let md = format_report(&report(), OutputFormat::Markdown);
        assert!(md.contains("# Plan for data"));
        assert!(md.contains("1 resolved, 0 skipped, 1 failed"));
        assert!(md.contains("- **config**: ."));
        assert!(md.contains("NO_CONFIG_FOUND"));
    }

    #[test]
    fn test_json_report_round_trips_as_value() {
        let text = format_report(&report(), OutputFormat::Json);
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["entries"][1]["error"]["code"], "NO_CONFIG_FOUND");
    }
}
