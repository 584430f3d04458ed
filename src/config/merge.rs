//! Deep merge for tiered tool configuration.
//!
//! Unlike the per-directory merge in `crate::resolve::merge`, tool tiers are
//! merged field by field: objects recurse, everything else is replaced.

use serde_json::Value;

/// Deep merge two JSON values, with `overlay` taking precedence over `base`.
///
/// - Objects are merged recursively
/// - Arrays, strings, numbers and booleans are replaced entirely
/// - A null overlay keeps the base value (null means "not specified")
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged_value = match base_map.remove(&key) {
                    Some(base_value) => deep_merge(base_value, overlay_value),
                    None => overlay_value,
                };
                base_map.insert(key, merged_value);
            }
            Value::Object(base_map)
        }
        (base, Value::Null) => base,
        (_, overlay) => overlay,
    }
}

/// Fold `deep_merge` over tiers, lowest precedence first.
pub fn deep_merge_all(values: impl IntoIterator<Item = Value>) -> Value {
    values.into_iter().fold(Value::Null, deep_merge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tiers_merge_field_by_field() {
        let defaults = json!({"scan": {"config_file": "config.json", "jobs": 1}});
        let project = json!({"scan": {"jobs": 4}});
        let result = deep_merge(defaults, project);
        assert_eq!(result, json!({"scan": {"config_file": "config.json", "jobs": 4}}));
    }

    #[test]
    fn test_extension_lists_replaced() {
        let base = json!({"scan": {"extensions": ["shp"]}});
        let overlay = json!({"scan": {"extensions": ["gpkg", "geojson"]}});
        let result = deep_merge(base, overlay);
        assert_eq!(result["scan"]["extensions"], json!(["gpkg", "geojson"]));
    }

    #[test]
    fn test_null_means_unspecified() {
        let base = json!({"scan": {"jobs": 2}});
        let overlay = json!({"scan": {"jobs": null}});
        assert_eq!(deep_merge(base, overlay), json!({"scan": {"jobs": 2}}));
    }

    #[test]
    fn test_merge_all_precedence() {
        let tiers = vec![
            json!({"scan": {"jobs": 1, "follow_links": false}}),
            json!({"scan": {"jobs": 2}}),
            json!({"scan": {"follow_links": true}}),
        ];
        assert_eq!(
            deep_merge_all(tiers),
            json!({"scan": {"jobs": 2, "follow_links": true}})
        );
    }
}
