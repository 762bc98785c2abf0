//! Deep merge of configuration trees.
//!
//! Mappings merge recursively; everything else, lists included, is replaced
//! wholesale by the override. Lists are never concatenated implicitly:
//! `!Chain` is the way to build a list out of several.

use crate::value::ConfigValue;

/// Merge `overrides` into `base`, with `overrides` taking precedence.
///
/// Keys of `base` keep their position; keys only in `overrides` are appended
/// in their order. Argument order matters: `merge(a, b)` and `merge(b, a)`
/// generally differ.
///
/// # Example
/// ```
/// use jconfigure_core::{ConfigValue, merge};
/// use serde_json::json;
///
/// let base = ConfigValue::from(json!({"server": {"host": "localhost", "port": 8080}}));
/// let overrides = ConfigValue::from(json!({"server": {"port": 9000}}));
///
/// let merged = merge(base, overrides);
/// assert_eq!(
///     serde_json::Value::from(merged),
///     json!({"server": {"host": "localhost", "port": 9000}})
/// );
/// ```
pub fn merge(base: ConfigValue, overrides: ConfigValue) -> ConfigValue {
    match (base, overrides) {
        (ConfigValue::Map(mut base_map), ConfigValue::Map(override_map)) => {
            for (key, override_value) in override_map {
                match base_map.get_mut(&key) {
                    Some(base_value) => {
                        let previous = std::mem::take(base_value);
                        *base_value = merge(previous, override_value);
                    }
                    None => {
                        base_map.insert(key, override_value);
                    }
                }
            }
            ConfigValue::Map(base_map)
        }
        (_, overrides) => overrides,
    }
}

/// Merge several trees in order, later ones taking precedence.
pub fn merge_all(values: impl IntoIterator<Item = ConfigValue>) -> ConfigValue {
    values.into_iter().fold(ConfigValue::empty_map(), merge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    fn merged(base: Value, overrides: Value) -> Value {
        merge(base.into(), overrides.into()).into()
    }

    #[test]
    fn test_merge_simple_objects() {
        assert_eq!(
            merged(json!({"a": 1, "b": 2}), json!({"b": 3, "c": 4})),
            json!({"a": 1, "b": 3, "c": 4})
        );
    }

    #[test]
    fn test_merge_nested_objects() {
        let base = json!({
            "server": {"host": "localhost", "port": 8080},
            "debug": true
        });
        let overrides = json!({"server": {"port": 9000}});
        assert_eq!(
            merged(base, overrides),
            json!({
                "server": {"host": "localhost", "port": 9000},
                "debug": true
            })
        );
    }

    #[test]
    fn test_merge_with_nothing() {
        let x = json!({"a": 1, "b": []});
        assert_eq!(merged(x.clone(), json!({})), x);
        assert_eq!(merged(json!({}), x.clone()), x);
    }

    #[test]
    fn test_empty_mapping_does_not_clear() {
        assert_eq!(
            merged(json!({"a": 1, "b": {"c": 3}}), json!({"b": {}, "a": 2})),
            json!({"a": 2, "b": {"c": 3}})
        );
    }

    #[test]
    fn test_lists_are_replaced() {
        assert_eq!(
            merged(json!({"features": ["a", "b"]}), json!({"features": ["c"]})),
            json!({"features": ["c"]})
        );
    }

    #[test]
    fn test_null_override_replaces() {
        assert_eq!(merged(json!({"a": {"b": 1}}), json!({"a": null})), json!({"a": null}));
    }

    #[test]
    fn test_mapping_and_scalar_replace_each_other() {
        assert_eq!(merged(json!({"a": {"b": 1}}), json!({"a": 5})), json!({"a": 5}));
        assert_eq!(merged(json!({"a": 5}), json!({"a": {"b": 1}})), json!({"a": {"b": 1}}));
    }

    #[test]
    fn test_not_commutative() {
        let a = json!({"a": 1, "b": {"c": 3}});
        let b = json!({"b": 2});
        assert_eq!(merged(a.clone(), b.clone()), json!({"a": 1, "b": 2}));
        assert_eq!(merged(b, a), json!({"a": 1, "b": {"c": 3}}));
    }

    #[test]
    fn test_idempotent() {
        let x = json!({"a": 1, "b": {"c": [1, 2], "d": {"e": null}}});
        assert_eq!(merged(x.clone(), x.clone()), x);
    }

    #[test]
    fn test_overridden_keys_keep_position() {
        let result = merge(
            json!({"a": 1, "b": 2, "c": 3}).into(),
            json!({"d": 4, "a": 5}).into(),
        );
        let keys: Vec<&str> = result.as_map().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, ["a", "b", "c", "d"]);
    }

    #[test]
    fn test_deeply_nested() {
        let base = json!({
            "level1": {"level2": {"level3": {"a": 1, "b": 2}}}
        });
        let overrides = json!({
            "level1": {"level2": {"level3": {"b": 3, "c": 4}}, "x": []}
        });
        assert_eq!(
            merged(base, overrides),
            json!({
                "level1": {"level2": {"level3": {"a": 1, "b": 3, "c": 4}}, "x": []}
            })
        );
    }

    #[test]
    fn test_merge_all() {
        let result = merge_all([
            json!({"a": 1, "b": {"c": 2}}).into(),
            json!({"b": {"c": 3}, "d": 4}).into(),
            json!({"d": 5}).into(),
        ]);
        assert_eq!(Value::from(result), json!({"a": 1, "b": {"c": 3}, "d": 5}));
    }

    #[test]
    fn test_merge_all_empty() {
        assert_eq!(merge_all(Vec::new()), ConfigValue::empty_map());
    }
}
