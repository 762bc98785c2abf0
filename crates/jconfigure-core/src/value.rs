//! The value model produced by evaluation and consumed by merging.

use indexmap::IndexMap;
use jconfigure_yaml::ScalarValue;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A fully evaluated configuration value.
///
/// Mappings keep insertion order, which makes `!StringFormat` output and
/// merge results reproducible for a fixed input.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Array(Vec<ConfigValue>),
    Map(IndexMap<String, ConfigValue>),
}

impl ConfigValue {
    /// An empty mapping, the starting point of every load.
    pub fn empty_map() -> Self {
        ConfigValue::Map(IndexMap::new())
    }

    /// Human readable name of the value's type, used in error reasons.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ConfigValue::Null => "null",
            ConfigValue::Bool(_) => "boolean",
            ConfigValue::Integer(_) => "integer",
            ConfigValue::Float(_) => "float",
            ConfigValue::String(_) => "string",
            ConfigValue::Array(_) => "list",
            ConfigValue::Map(_) => "mapping",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ConfigValue::Null)
    }

    pub fn is_map(&self) -> bool {
        matches!(self, ConfigValue::Map(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, ConfigValue::Array(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ConfigValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Integers widen to floats.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ConfigValue::Float(f) => Some(*f),
            ConfigValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[ConfigValue]> {
        match self {
            ConfigValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, ConfigValue>> {
        match self {
            ConfigValue::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Look up a key if this is a mapping.
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.as_map()?.get(key)
    }

    /// Walk nested mappings, e.g. `get_path(&["database", "host"])`.
    pub fn get_path(&self, path: &[&str]) -> Option<&ConfigValue> {
        path.iter().try_fold(self, |value, key| value.get(key))
    }

    /// Deserialize the tree into a caller-defined type.
    pub fn deserialize_into<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(serde_json::Value::from(self.clone()))
    }
}

/// Scalars render bare (strings without quotes), collections as compact JSON.
impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Null => f.write_str("null"),
            ConfigValue::Bool(b) => write!(f, "{b}"),
            ConfigValue::Integer(i) => write!(f, "{i}"),
            ConfigValue::Float(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{x:.1}"),
            ConfigValue::Float(x) => write!(f, "{x}"),
            ConfigValue::String(s) => f.write_str(s),
            ConfigValue::Array(_) | ConfigValue::Map(_) => {
                let json = serde_json::Value::from(self.clone());
                write!(f, "{json}")
            }
        }
    }
}

impl From<serde_json::Value> for ConfigValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => ConfigValue::Null,
            serde_json::Value::Bool(b) => ConfigValue::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => ConfigValue::Integer(i),
                // u64 beyond i64::MAX and real numbers
                None => ConfigValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => ConfigValue::String(s),
            serde_json::Value::Array(items) => {
                ConfigValue::Array(items.into_iter().map(ConfigValue::from).collect())
            }
            serde_json::Value::Object(entries) => ConfigValue::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, ConfigValue::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<ConfigValue> for serde_json::Value {
    fn from(value: ConfigValue) -> Self {
        match value {
            ConfigValue::Null => serde_json::Value::Null,
            ConfigValue::Bool(b) => serde_json::Value::Bool(b),
            ConfigValue::Integer(i) => serde_json::Value::from(i),
            // JSON has no NaN or infinities.
            ConfigValue::Float(x) => serde_json::Number::from_f64(x)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            ConfigValue::String(s) => serde_json::Value::String(s),
            ConfigValue::Array(items) => {
                serde_json::Value::Array(items.into_iter().map(serde_json::Value::from).collect())
            }
            ConfigValue::Map(entries) => serde_json::Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, serde_json::Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<ScalarValue> for ConfigValue {
    fn from(value: ScalarValue) -> Self {
        match value {
            ScalarValue::Null => ConfigValue::Null,
            ScalarValue::Bool(b) => ConfigValue::Bool(b),
            ScalarValue::Integer(i) => ConfigValue::Integer(i),
            ScalarValue::Float(x) => ConfigValue::Float(x),
            ScalarValue::String(s) => ConfigValue::String(s),
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::String(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::String(s)
    }
}

impl From<i64> for ConfigValue {
    fn from(i: i64) -> Self {
        ConfigValue::Integer(i)
    }
}

impl From<f64> for ConfigValue {
    fn from(x: f64) -> Self {
        ConfigValue::Float(x)
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        ConfigValue::Bool(b)
    }
}

impl From<Vec<ConfigValue>> for ConfigValue {
    fn from(items: Vec<ConfigValue>) -> Self {
        ConfigValue::Array(items)
    }
}

impl From<IndexMap<String, ConfigValue>> for ConfigValue {
    fn from(entries: IndexMap<String, ConfigValue>) -> Self {
        ConfigValue::Map(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_preserves_order() {
        let value = ConfigValue::from(json!({"z": 1, "a": [true, null], "m": {"x": 1.5}}));
        let keys: Vec<&str> = value.as_map().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, ["z", "a", "m"]);
        assert_eq!(value.get_path(&["m", "x"]).and_then(ConfigValue::as_f64), Some(1.5));
    }

    #[test]
    fn test_json_round_trip_of_special_floats() {
        let json = serde_json::Value::from(ConfigValue::Float(f64::INFINITY));
        assert_eq!(json, serde_json::Value::Null);
    }

    #[test]
    fn test_display() {
        assert_eq!(ConfigValue::from("echo").to_string(), "echo");
        assert_eq!(ConfigValue::Integer(42).to_string(), "42");
        assert_eq!(ConfigValue::Float(1.0).to_string(), "1.0");
        assert_eq!(ConfigValue::Float(2.5).to_string(), "2.5");
        assert_eq!(ConfigValue::Bool(true).to_string(), "true");
        assert_eq!(ConfigValue::Null.to_string(), "null");
        assert_eq!(
            ConfigValue::from(json!({"a": [1, "b"]})).to_string(),
            r#"{"a":[1,"b"]}"#
        );
    }

    #[test]
    fn test_get_path_stops_at_non_mapping() {
        let value = ConfigValue::from(json!({"a": {"b": 3}}));
        assert_eq!(value.get_path(&["a", "b"]), Some(&ConfigValue::Integer(3)));
        assert_eq!(value.get_path(&["a", "b", "c"]), None);
        assert_eq!(value.get_path(&[]), Some(&value));
    }

    #[test]
    fn test_deserialize_into() {
        #[derive(Deserialize, Debug, PartialEq)]
        struct Database {
            host: String,
            port: u16,
        }

        let value = ConfigValue::from(json!({"host": "localhost", "port": 5432}));
        let db: Database = value.deserialize_into().unwrap();
        assert_eq!(
            db,
            Database {
                host: "localhost".into(),
                port: 5432
            }
        );
    }

    #[test]
    fn test_serialize_untagged() {
        let value = ConfigValue::from(json!({"a": 1, "b": [null, "x"]}));
        assert_eq!(serde_json::to_string(&value).unwrap(), r#"{"a":1,"b":[null,"x"]}"#);
    }
}
