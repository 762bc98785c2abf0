//! `!Chain`.

use super::{Arguments, TagFailure};
use crate::value::ConfigValue;

pub(crate) fn chain(mut args: Arguments) -> Result<ConfigValue, TagFailure> {
    let lists = args.take_variadic("lists")?;
    args.finish()?;

    let mut chained = Vec::new();
    for list in lists {
        match list {
            ConfigValue::Array(items) => chained.extend(items),
            other => {
                let offender = serde_json::Value::from(other);
                return Err(TagFailure::new(format!(
                    "All elements of !Chain node must be lists, got {offender}"
                )));
            }
        }
    }
    Ok(ConfigValue::Array(chained))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::TagArgs;
    use indexmap::IndexMap;

    fn ints(values: &[i64]) -> ConfigValue {
        ConfigValue::Array(values.iter().copied().map(ConfigValue::Integer).collect())
    }

    #[test]
    fn test_chain_lists() {
        let args = Arguments::from(TagArgs::Positional(vec![ints(&[1, 2]), ints(&[]), ints(&[3])]));
        assert_eq!(chain(args).unwrap(), ints(&[1, 2, 3]));
    }

    #[test]
    fn test_chain_mapping_form() {
        let mut map = IndexMap::new();
        map.insert(
            "lists".to_string(),
            ConfigValue::Array(vec![ints(&[1]), ints(&[2])]),
        );
        assert_eq!(chain(Arguments::from(TagArgs::Named(map))).unwrap(), ints(&[1, 2]));
    }

    #[test]
    fn test_chain_nothing() {
        let args = Arguments::from(TagArgs::Positional(vec![]));
        assert_eq!(chain(args).unwrap(), ints(&[]));
    }

    #[test]
    fn test_chain_rejects_non_list() {
        let args = Arguments::from(TagArgs::Positional(vec![ints(&[1]), "x".into()]));
        assert_eq!(
            chain(args).unwrap_err().reason,
            r#"All elements of !Chain node must be lists, got "x""#
        );
    }
}
