//! `!EnvVar` and `!ContextValue`.

use super::{Arguments, TagFailure};
use crate::context::EvaluationContext;
use crate::value::ConfigValue;
use std::env::{self, VarError};

pub(crate) fn env_var(mut args: Arguments) -> Result<ConfigValue, TagFailure> {
    let name = args.take_string(0, "name")?;
    let default = take_default(&mut args);
    args.finish()?;

    match env::var(&name) {
        Ok(value) => Ok(ConfigValue::String(value)),
        Err(VarError::NotPresent) => default.ok_or_else(|| {
            TagFailure::new(format!(
                "Environment Variable '{name}' not set, and no default provided!"
            ))
        }),
        Err(VarError::NotUnicode(_)) => Err(TagFailure::new(format!(
            "Environment Variable '{name}' is not valid unicode"
        ))),
    }
}

pub(crate) fn context_value(
    mut args: Arguments,
    context: &EvaluationContext,
) -> Result<ConfigValue, TagFailure> {
    let key = args.take_string(0, "key")?;
    let default = take_default(&mut args);
    args.finish()?;

    match context.binding(&key) {
        Some(value) => Ok(value.clone()),
        None => default.ok_or_else(|| {
            TagFailure::new(format!(
                "Context Key '{key}' not set, and no default provided!"
            ))
        }),
    }
}

// An explicit null default counts as no default.
fn take_default(args: &mut Arguments) -> Option<ConfigValue> {
    args.take(1, "default").filter(|value| !value.is_null())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::TagArgs;
    use indexmap::IndexMap;

    fn named(entries: &[(&str, ConfigValue)]) -> Arguments {
        let map: IndexMap<String, ConfigValue> = entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        Arguments::from(TagArgs::Named(map))
    }

    #[test]
    fn test_env_var_scalar() {
        unsafe { env::set_var("JCONFIGURE_TEST_LOOKUP_SET", "hello") };
        let args = Arguments::from(TagArgs::Scalar("JCONFIGURE_TEST_LOOKUP_SET".into()));
        assert_eq!(env_var(args).unwrap(), ConfigValue::from("hello"));
    }

    #[test]
    fn test_env_var_default() {
        let args = named(&[
            ("name", "JCONFIGURE_TEST_LOOKUP_UNSET".into()),
            ("default", ConfigValue::Integer(8080)),
        ]);
        assert_eq!(env_var(args).unwrap(), ConfigValue::Integer(8080));
    }

    #[test]
    fn test_env_var_missing() {
        let args = Arguments::from(TagArgs::Scalar("JCONFIGURE_TEST_LOOKUP_MISSING".into()));
        assert_eq!(
            env_var(args).unwrap_err().reason,
            "Environment Variable 'JCONFIGURE_TEST_LOOKUP_MISSING' not set, and no default provided!"
        );
    }

    #[test]
    fn test_env_var_null_default_is_no_default() {
        let args = named(&[
            ("name", "JCONFIGURE_TEST_LOOKUP_NULL_DEFAULT".into()),
            ("default", ConfigValue::Null),
        ]);
        assert!(env_var(args).is_err());
    }

    #[test]
    fn test_env_var_rejects_unknown_keyword() {
        let args = named(&[("nmae", "HOME".into())]);
        assert_eq!(
            env_var(args).unwrap_err().reason,
            "Missing required argument 'name'"
        );
    }

    #[test]
    fn test_context_value() {
        let context = EvaluationContext::new("app.yaml").with_binding("cat", "echo");

        let args = Arguments::from(TagArgs::Scalar("cat".into()));
        assert_eq!(context_value(args, &context).unwrap(), ConfigValue::from("echo"));

        let args = named(&[("key", "dog".into()), ("default", "oscar".into())]);
        assert_eq!(context_value(args, &context).unwrap(), ConfigValue::from("oscar"));

        let args = Arguments::from(TagArgs::Scalar("dog".into()));
        assert_eq!(
            context_value(args, &context).unwrap_err().reason,
            "Context Key 'dog' not set, and no default provided!"
        );
    }

    #[test]
    fn test_context_value_keeps_structure() {
        let context = EvaluationContext::new("app.yaml")
            .with_binding("ports", vec![ConfigValue::Integer(1), ConfigValue::Integer(2)]);
        let args = Arguments::from(TagArgs::Scalar("ports".into()));
        assert_eq!(
            context_value(args, &context).unwrap(),
            ConfigValue::Array(vec![ConfigValue::Integer(1), ConfigValue::Integer(2)])
        );
    }
}
