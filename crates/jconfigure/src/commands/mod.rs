//! Command implementations for the jconfigure CLI
//!
//! Each command module handles the CLI interface and delegates to
//! jconfigure-core for the actual work.

pub mod eval;
pub mod load;

use anyhow::{Context, Result, bail};
use indexmap::IndexMap;
use jconfigure_core::ConfigValue;
use jconfigure_yaml::resolve_plain_scalar;

/// How a configuration tree is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
}

/// Parse `KEY=VALUE` pairs into `!ContextValue` bindings.
///
/// Values are read like plain YAML scalars, so `port=80` binds an integer
/// and `debug=true` a boolean. Later pairs override earlier ones.
pub fn parse_bindings(pairs: &[String]) -> Result<IndexMap<String, ConfigValue>> {
    let mut bindings = IndexMap::new();
    for pair in pairs {
        let Some((key, value)) = pair.split_once('=') else {
            bail!("Invalid context binding '{pair}', expected KEY=VALUE");
        };
        let key = key.trim();
        if key.is_empty() {
            bail!("Invalid context binding '{pair}', key is empty");
        }
        bindings.insert(key.to_string(), ConfigValue::from(resolve_plain_scalar(value)));
    }
    Ok(bindings)
}

pub fn render(value: &ConfigValue, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(value).context("Failed to serialize configuration as JSON")
        }
        OutputFormat::Yaml => {
            serde_yaml::to_string(value).context("Failed to serialize configuration as YAML")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bindings() {
        let pairs = vec![
            "cat=echo".to_string(),
            "port=80".to_string(),
            "debug=true".to_string(),
            "url=http://host/?a=b".to_string(),
            "empty=".to_string(),
        ];
        let bindings = parse_bindings(&pairs).unwrap();
        assert_eq!(bindings["cat"], ConfigValue::from("echo"));
        assert_eq!(bindings["port"], ConfigValue::Integer(80));
        assert_eq!(bindings["debug"], ConfigValue::Bool(true));
        assert_eq!(bindings["url"], ConfigValue::from("http://host/?a=b"));
        assert_eq!(bindings["empty"], ConfigValue::Null);
    }

    #[test]
    fn test_parse_bindings_rejects_malformed_pairs() {
        assert!(parse_bindings(&["novalue".to_string()]).is_err());
        assert!(parse_bindings(&["=value".to_string()]).is_err());
    }

    #[test]
    fn test_render() {
        let value = ConfigValue::from(serde_json::json!({"b": 1, "a": ["x"]}));
        assert_eq!(
            render(&value, OutputFormat::Json).unwrap(),
            "{\n  \"b\": 1,\n  \"a\": [\n    \"x\"\n  ]\n}"
        );
        assert_eq!(render(&value, OutputFormat::Yaml).unwrap(), "b: 1\na:\n- x\n");
    }
}
