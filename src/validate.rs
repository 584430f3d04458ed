//! Binding descriptor validation, run before the store is built.
//!
//! Every `dbs.json` under the scan root must pass the validator; a single
//! violation stops the run before any configuration is resolved.

use crate::config::ScanOptions;
use crate::discover::discover_named;
use crate::error::{ResolveError, ResolveResult};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info};

/// Validates one parsed binding document.
pub trait BindingValidator {
    fn validate(&self, path: &Path, document: &Value) -> ResolveResult<()>;
}

/// Built-in structural schema for binding documents.
///
/// Each entry is either a non-empty connection string, or an object with
/// string `user`, `url` and `db` fields and an optional string `password`.
/// A missing password is allowed: credentials may be supplied later by the
/// sink writer.
#[derive(Debug, Clone, Copy, Default)]
pub struct BindingSchema;

const REQUIRED_FIELDS: &[&str] = &["user", "url", "db"];
const OPTIONAL_FIELDS: &[&str] = &["password"];

impl BindingValidator for BindingSchema {
    fn validate(&self, path: &Path, document: &Value) -> ResolveResult<()> {
        let Value::Object(entries) = document else {
            return Err(ResolveError::schema_violation(
                path,
                "document must be an object of named bindings",
            ));
        };

        for (name, entry) in entries {
            match entry {
                Value::String(s) if !s.trim().is_empty() => {}
                Value::String(_) => {
                    return Err(ResolveError::schema_violation(
                        path,
                        format!("'{}': connection string is empty", name),
                    ));
                }
                Value::Object(fields) => {
                    for field in REQUIRED_FIELDS {
                        match fields.get(*field) {
                            Some(Value::String(_)) => {}
                            Some(_) => {
                                return Err(ResolveError::schema_violation(
                                    path,
                                    format!("'{}.{}' must be a string", name, field),
                                ));
                            }
                            None => {
                                return Err(ResolveError::schema_violation(
                                    path,
                                    format!("'{}' is missing required field '{}'", name, field),
                                ));
                            }
                        }
                    }
                    for field in OPTIONAL_FIELDS {
                        if fields.get(*field).is_some_and(|v| !v.is_string()) {
                            return Err(ResolveError::schema_violation(
                                path,
                                format!("'{}.{}' must be a string", name, field),
                            ));
                        }
                    }
                }
                _ => {
                    return Err(ResolveError::schema_violation(
                        path,
                        format!("'{}' must be a connection string or an object", name),
                    ));
                }
            }
        }

        Ok(())
    }
}

/// Validate every binding file under `root`. Returns how many were checked.
pub fn validate_tree(
    root: &Path,
    options: &ScanOptions,
    validator: &dyn BindingValidator,
) -> ResolveResult<usize> {
    let files = discover_named(root, &options.bindings_file, options.follow_links)?;

    for rel in &files {
        let path = root.join(rel);
        let content = std::fs::read_to_string(&path).map_err(|e| ResolveError::io(&path, e))?;
        let document: Value = serde_json::from_str(&content)
            .map_err(|e| ResolveError::schema_violation(&path, e))?;
        validator.validate(&path, &document)?;
        debug!("Validated {}", path.display());
    }

    info!(
        "Validated {} '{}' files under {}",
        files.len(),
        options.bindings_file,
        root.display()
    );
    Ok(files.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn check(document: Value) -> ResolveResult<()> {
        BindingSchema.validate(Path::new("dbs.json"), &document)
    }

    #[test]
    fn test_accepts_strings_and_objects() {
        check(json!({
            "warehouse": "postgresql://gis:pw@localhost/warehouse",
            "staging": {"user": "gis", "url": "localhost:5432", "db": "staging"},
            "prod": {"user": "gis", "url": "db", "db": "prod", "password": "x"}
        }))
        .unwrap();
    }

    #[test]
    fn test_rejects_missing_field() {
        let err = check(json!({"staging": {"user": "gis", "db": "staging"}})).unwrap_err();
        match err {
            ResolveError::SchemaViolation { reason, .. } => assert!(reason.contains("url")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rejects_wrong_shapes() {
        assert!(check(json!(["a"])).is_err());
        assert!(check(json!({"a": 5})).is_err());
        assert!(check(json!({"a": ""})).is_err());
        assert!(check(json!({"a": {"user": "u", "url": "h", "db": "d", "password": 1}})).is_err());
    }

    #[test]
    fn test_validate_tree_stops_at_first_violation() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("dbs.json"), r#"{"a": "pg://a"}"#).unwrap();
        std::fs::create_dir_all(temp.path().join("x")).unwrap();
        std::fs::write(temp.path().join("x/dbs.json"), r#"{"b": 1}"#).unwrap();

        let err = validate_tree(temp.path(), &ScanOptions::default(), &BindingSchema).unwrap_err();
        assert!(matches!(err, ResolveError::SchemaViolation { .. }));

        std::fs::write(temp.path().join("x/dbs.json"), r#"{"b": "pg://b"}"#).unwrap();
        let checked = validate_tree(temp.path(), &ScanOptions::default(), &BindingSchema).unwrap();
        assert_eq!(checked, 2);
    }
}
