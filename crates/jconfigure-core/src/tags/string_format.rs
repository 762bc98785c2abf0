//! `!StringFormat` and the replacement-field grammar it uses.
//!
//! The grammar is the brace syntax common to many languages:
//!
//! - `{}` takes the next positional argument (automatic numbering)
//! - `{0}` takes a positional argument by index (manual numbering)
//! - `{name}` takes a named argument
//! - `{{` and `}}` produce literal braces
//!
//! Automatic and manual numbering cannot be mixed within one template.
//! Conversion and format specs (`{0!r}`, `{0:>8}`) are not supported.
//! Arguments the template never references are ignored. When no format
//! arguments are given at all, the string is returned as written.

use super::{Arguments, TagFailure};
use crate::value::ConfigValue;
use indexmap::IndexMap;

const MISSING_TEMPLATE: &str = "Either a list of at least 1 string, or a dictionary containing keys 'string' and 'format_args' must be provided";

pub(crate) fn string_format(mut args: Arguments) -> Result<ConfigValue, TagFailure> {
    let template = match args.take(0, "string") {
        Some(ConfigValue::String(template)) => template,
        Some(_) => {
            return Err(TagFailure::new(format!(
                "{} must be a string!",
                args.describe(0, "string")
            )));
        }
        None => return Err(TagFailure::new(MISSING_TEMPLATE)),
    };

    let format_args = match args.take(1, "format_args") {
        // Without arguments the template is not a template.
        None => {
            args.finish()?;
            return Ok(ConfigValue::String(template));
        }
        Some(ConfigValue::Array(items)) => FormatArgs::Positional(items),
        Some(ConfigValue::Map(entries)) => FormatArgs::Named(entries),
        Some(_) => {
            return Err(TagFailure::new(format!(
                "{} must be a dictionary or a list!",
                args.describe(1, "format_args")
            )));
        }
    };
    args.finish()?;

    format_template(&template, &format_args)
        .map(ConfigValue::String)
        .map_err(TagFailure::new)
}

pub(crate) enum FormatArgs {
    Positional(Vec<ConfigValue>),
    Named(IndexMap<String, ConfigValue>),
}

impl FormatArgs {
    fn index(&self, index: usize) -> Result<&ConfigValue, String> {
        match self {
            FormatArgs::Positional(items) => items.get(index),
            FormatArgs::Named(_) => None,
        }
        .ok_or_else(|| format!("Replacement index {index} out of range for format arguments"))
    }

    fn name(&self, name: &str) -> Result<&ConfigValue, String> {
        match self {
            FormatArgs::Named(entries) => entries.get(name),
            FormatArgs::Positional(_) => None,
        }
        .ok_or_else(|| format!("Missing format argument '{name}'"))
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Numbering {
    Automatic,
    Manual,
}

/// Substitute `args` into `template`. Errors are returned as reason strings.
pub(crate) fn format_template(template: &str, args: &FormatArgs) -> Result<String, String> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    let mut numbering = None;
    let mut next_index = 0;

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '{' => {
                let mut field = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    match c {
                        '}' => {
                            closed = true;
                            break;
                        }
                        '{' => return Err("Unexpected '{' in field name".to_string()),
                        c => field.push(c),
                    }
                }
                if !closed {
                    return Err("Single '{' encountered in format string".to_string());
                }

                let value = if field.is_empty() {
                    switch_numbering(&mut numbering, Numbering::Automatic)?;
                    let index = next_index;
                    next_index += 1;
                    args.index(index)?
                } else if field.chars().all(|c| c.is_ascii_digit()) {
                    switch_numbering(&mut numbering, Numbering::Manual)?;
                    let index = field
                        .parse::<usize>()
                        .map_err(|_| format!("Replacement index {field} is too large"))?;
                    args.index(index)?
                } else if field.contains([':', '!', '.', '[']) {
                    return Err(format!("Unsupported replacement field '{{{field}}}'"));
                } else {
                    args.name(&field)?
                };
                out.push_str(&value.to_string());
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '}' => return Err("Single '}' encountered in format string".to_string()),
            c => out.push(c),
        }
    }

    Ok(out)
}

fn switch_numbering(current: &mut Option<Numbering>, wanted: Numbering) -> Result<(), String> {
    match (*current, wanted) {
        (Some(Numbering::Automatic), Numbering::Manual) => Err(
            "cannot switch from automatic field numbering to manual field specification"
                .to_string(),
        ),
        (Some(Numbering::Manual), Numbering::Automatic) => Err(
            "cannot switch from manual field specification to automatic field numbering"
                .to_string(),
        ),
        _ => {
            *current = Some(wanted);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::TagArgs;

    fn positional(items: Vec<ConfigValue>) -> Arguments {
        Arguments::from(TagArgs::Positional(items))
    }

    fn named(entries: Vec<(&str, ConfigValue)>) -> Arguments {
        Arguments::from(TagArgs::Named(
            entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
        ))
    }

    fn list(items: &[&str]) -> ConfigValue {
        ConfigValue::Array(items.iter().map(|s| ConfigValue::from(*s)).collect())
    }

    #[test]
    fn test_positional_format_args() {
        let args = positional(vec!["{0} is a {1}".into(), list(&["echo", "cat"])]);
        assert_eq!(string_format(args).unwrap(), ConfigValue::from("echo is a cat"));
    }

    #[test]
    fn test_named_format_args() {
        let mut format_args = IndexMap::new();
        format_args.insert("name".to_string(), ConfigValue::from("oscar"));
        format_args.insert("kind".to_string(), ConfigValue::from("dog"));
        let args = named(vec![
            ("string", "{name} is a {kind}".into()),
            ("format_args", ConfigValue::Map(format_args)),
        ]);
        assert_eq!(string_format(args).unwrap(), ConfigValue::from("oscar is a dog"));
    }

    #[test]
    fn test_template_only() {
        let args = positional(vec!["echo is a cat".into()]);
        assert_eq!(string_format(args).unwrap(), ConfigValue::from("echo is a cat"));
    }

    #[test]
    fn test_template_only_is_not_formatted() {
        let args = positional(vec!["{name} {} {{x}} {".into()]);
        assert_eq!(
            string_format(args).unwrap(),
            ConfigValue::from("{name} {} {{x}} {")
        );

        let args = named(vec![("string", "{0}".into()), ("extra", "x".into())]);
        assert_eq!(
            string_format(args).unwrap_err().reason,
            "Unexpected keyword argument 'extra'"
        );
    }

    #[test]
    fn test_non_string_template() {
        let args = positional(vec![ConfigValue::Integer(42)]);
        assert_eq!(
            string_format(args).unwrap_err().reason,
            "First list argument must be a string!"
        );

        let args = named(vec![("string", ConfigValue::Integer(42))]);
        assert_eq!(
            string_format(args).unwrap_err().reason,
            "'string' keyword argument must be a string!"
        );
    }

    #[test]
    fn test_missing_template() {
        assert_eq!(string_format(positional(vec![])).unwrap_err().reason, MISSING_TEMPLATE);
        let args = named(vec![("format_args", list(&["a"]))]);
        assert_eq!(string_format(args).unwrap_err().reason, MISSING_TEMPLATE);
    }

    #[test]
    fn test_bad_format_args() {
        let args = positional(vec!["{}".into(), "x".into()]);
        assert_eq!(
            string_format(args).unwrap_err().reason,
            "Second list argument must be a dictionary or a list!"
        );

        let args = named(vec![("string", "{}".into()), ("format_args", ConfigValue::Integer(1))]);
        assert_eq!(
            string_format(args).unwrap_err().reason,
            "'format_args' keyword argument must be a dictionary or a list!"
        );
    }

    #[test]
    fn test_too_many_list_arguments() {
        let args = positional(vec!["{}".into(), list(&["a"]), list(&["b"])]);
        assert_eq!(
            string_format(args).unwrap_err().reason,
            "Unexpected third list argument"
        );
    }

    #[test]
    fn test_grammar() {
        let args = FormatArgs::Positional(vec![
            ConfigValue::from("a"),
            ConfigValue::Integer(2),
            ConfigValue::Float(3.0),
        ]);
        assert_eq!(format_template("{} {} {}", &args).unwrap(), "a 2 3.0");
        assert_eq!(format_template("{2}{1}{0}{0}", &args).unwrap(), "3.02aa");
        assert_eq!(format_template("{{{0}}}", &args).unwrap(), "{a}");
        assert_eq!(format_template("no fields", &args).unwrap(), "no fields");
    }

    #[test]
    fn test_grammar_errors() {
        let args = FormatArgs::Positional(vec![ConfigValue::from("a")]);
        assert_eq!(
            format_template("{", &args).unwrap_err(),
            "Single '{' encountered in format string"
        );
        assert_eq!(
            format_template("a } b", &args).unwrap_err(),
            "Single '}' encountered in format string"
        );
        assert_eq!(
            format_template("{} {0}", &args).unwrap_err(),
            "cannot switch from automatic field numbering to manual field specification"
        );
        assert_eq!(
            format_template("{0} {}", &args).unwrap_err(),
            "cannot switch from manual field specification to automatic field numbering"
        );
        assert_eq!(
            format_template("{1}", &args).unwrap_err(),
            "Replacement index 1 out of range for format arguments"
        );
        assert_eq!(
            format_template("{missing}", &args).unwrap_err(),
            "Missing format argument 'missing'"
        );
        assert_eq!(
            format_template("{0:>8}", &args).unwrap_err(),
            "Unsupported replacement field '{0:>8}'"
        );
    }

    #[test]
    fn test_collections_render_as_json() {
        let args = FormatArgs::Positional(vec![list(&["x", "y"])]);
        assert_eq!(format_template("items={}", &args).unwrap(), r#"items=["x","y"]"#);
    }
}
