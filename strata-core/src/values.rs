//! Flat value maps and the shallow merge used by overlay resolution.

use std::collections::BTreeMap;

/// Template values keyed by top-level name.
///
/// YAML is decoded through the JSON value model, so every key is a string and
/// every value is something a template context can carry.
pub type Values = BTreeMap<String, serde_json::Value>;

/// Merge `overrides` over a copy of `base` and return the new map.
///
/// Only top-level keys are merged. A nested mapping in `overrides` replaces
/// the whole mapping in `base`.
pub fn merge_values(base: &Values, overrides: &Values) -> Values {
    let mut out = base.clone();
    for (key, value) in overrides {
        out.insert(key.clone(), value.clone());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn values(v: serde_json::Value) -> Values {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn override_wins_and_base_only_keys_survive() {
        let base = values(json!({"a": 1, "b": 2}));
        let over = values(json!({"a": 9, "c": 3}));
        let merged = merge_values(&base, &over);
        assert_eq!(merged, values(json!({"a": 9, "b": 2, "c": 3})));
    }

    #[test]
    fn nested_mappings_are_replaced_not_merged() {
        let base = values(json!({"a": {"x": 1, "y": 2}}));
        let over = values(json!({"a": {"x": 9}}));
        let merged = merge_values(&base, &over);
        assert_eq!(merged["a"], json!({"x": 9}));
    }

    #[test]
    fn inputs_are_left_untouched() {
        let base = values(json!({"a": 1}));
        let over = values(json!({"a": 2}));
        let _ = merge_values(&base, &over);
        assert_eq!(base["a"], json!(1));
        assert_eq!(over["a"], json!(2));
    }

    #[test]
    fn null_override_still_replaces() {
        let base = values(json!({"a": 1}));
        let over = values(json!({"a": null}));
        assert_eq!(merge_values(&base, &over)["a"], serde_json::Value::Null);
    }
}
