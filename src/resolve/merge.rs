//! Policy-driven merge of an overlay on top of an inherited node.
//!
//! - `clean`: the overlay alone, inheritance discarded
//! - `replace` (or no tag): shallow union, overlay keys overwrite whole values
//!
//! Bindings are never merged inside a single name: a name is either replaced
//! or inherited as is.

use super::node::{ConfigNode, MIX_KEY, MixPolicy, Overlay};

/// Merge `overlay` on top of `base`, producing a new node.
///
/// Neither input is modified.
pub fn merge<O: Overlay + ?Sized>(base: Option<&ConfigNode>, overlay: Option<&O>) -> ConfigNode {
    let Some(overlay) = overlay else {
        return base.cloned().unwrap_or_default();
    };
    let Some(base) = base else {
        return ConfigNode::from_overlay(overlay);
    };

    match overlay.mix() {
        MixPolicy::Clean => ConfigNode::from_overlay(overlay),
        MixPolicy::Replace => {
            let mut node = base.clone();
            node.settings.remove(MIX_KEY);
            for (key, value) in overlay.settings() {
                if key != MIX_KEY {
                    node.settings.insert(key.clone(), value.clone());
                }
            }
            if let Some(bindings) = overlay.bindings() {
                for (name, binding) in bindings {
                    node.bindings.insert(name.clone(), binding.clone());
                }
            }
            node
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::node::{BindingRef, Bindings, ItemOverride, RawConfig, Settings};
    use serde_json::{Value, json};
    use std::path::Path;

    fn settings(value: Value) -> Settings {
        value.as_object().cloned().unwrap()
    }

    fn node(s: Value, b: Value) -> ConfigNode {
        let bindings: Bindings = b
            .as_object()
            .unwrap()
            .iter()
            .map(|(k, v)| (k.clone(), BindingRef::new(v.clone())))
            .collect();
        ConfigNode::new(settings(s), bindings)
    }

    fn raw(value: Value) -> RawConfig {
        RawConfig::from_value(Path::new("config.json"), value).unwrap()
    }

    #[test]
    fn test_absent_overlay_returns_base() {
        let base = node(json!({"if_exists": "append"}), json!({"main": "pg://a"}));
        assert_eq!(merge::<RawConfig>(Some(&base), None), base);
        assert_eq!(merge::<RawConfig>(None, None), ConfigNode::default());
    }

    #[test]
    fn test_absent_base_coerces_overlay() {
        let overlay = raw(json!({
            "mix": "replace",
            "default": {"schema": "public"},
            "dbs": {"main": "pg://a"}
        }));
        let result = merge(None, Some(&overlay));
        assert_eq!(result.settings, settings(json!({"schema": "public"})));
        assert_eq!(result.bindings.len(), 1);
    }

    #[test]
    fn test_replace_is_shallow() {
        let base = node(
            json!({"if_exists": "append", "dtype": {"a": "int", "b": "text"}}),
            json!({"main": {"url": "a"}, "aux": {"url": "b"}}),
        );
        let overlay = raw(json!({
            "default": {"dtype": {"a": "float"}},
            "dbs": {"main": {"user": "x"}}
        }));
        let result = merge(Some(&base), Some(&overlay));

        // Whole value replaced, not deep-merged
        assert_eq!(result.settings["dtype"], json!({"a": "float"}));
        assert_eq!(result.settings["if_exists"], "append");
        assert_eq!(result.bindings["main"].as_value(), &json!({"user": "x"}));
        assert_eq!(result.bindings["aux"].as_value(), &json!({"url": "b"}));
    }

    #[test]
    fn test_clean_discards_base() {
        let base = node(json!({"if_exists": "append"}), json!({"main": "pg://a"}));
        let overlay = raw(json!({"mix": "clean", "default": {"schema": "public"}}));
        let result = merge(Some(&base), Some(&overlay));
        assert_eq!(result.settings, settings(json!({"schema": "public"})));
        assert!(result.bindings.is_empty());
    }

    #[test]
    fn test_item_override_keeps_inherited_bindings() {
        let base = node(json!({"schema": "public"}), json!({"warehouse": "pg://w"}));
        let overlay =
            ItemOverride::from_value(Path::new("a.json"), json!({"db": "warehouse"})).unwrap();
        let result = merge(Some(&base), Some(&overlay));
        assert_eq!(
            result.settings,
            settings(json!({"schema": "public", "db": "warehouse"}))
        );
        assert!(result.binding("warehouse").is_some());
    }

    #[test]
    fn test_inputs_untouched() {
        let base = node(json!({"a": 1}), json!({}));
        let before = base.clone();
        let overlay = raw(json!({"default": {"a": 2}}));
        let _ = merge(Some(&base), Some(&overlay));
        assert_eq!(base, before);
    }
}
