//! Type resolution for plain scalars.

/// A scalar after type resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

/// Resolve the text of a plain (unquoted) scalar into a typed value.
///
/// Booleans accept the YAML 1.1 spellings (`yes`/`no`/`on`/`off`) that
/// configuration files commonly rely on. Integers accept decimal, `0x` and
/// `0o` forms. Anything that does not resolve is a string.
pub fn resolve_plain_scalar(value: &str) -> ScalarValue {
    match value {
        "null" | "Null" | "NULL" | "~" | "" => return ScalarValue::Null,
        "true" | "True" | "TRUE" | "yes" | "Yes" | "YES" | "on" | "On" | "ON" => {
            return ScalarValue::Bool(true);
        }
        "false" | "False" | "FALSE" | "no" | "No" | "NO" | "off" | "Off" | "OFF" => {
            return ScalarValue::Bool(false);
        }
        ".inf" | ".Inf" | ".INF" | "+.inf" | "+.Inf" | "+.INF" => {
            return ScalarValue::Float(f64::INFINITY);
        }
        "-.inf" | "-.Inf" | "-.INF" => return ScalarValue::Float(f64::NEG_INFINITY),
        ".nan" | ".NaN" | ".NAN" => return ScalarValue::Float(f64::NAN),
        _ => {}
    }

    if let Some(i) = parse_integer(value) {
        return ScalarValue::Integer(i);
    }

    if looks_numeric(value) {
        if let Ok(f) = value.parse::<f64>() {
            return ScalarValue::Float(f);
        }
    }

    ScalarValue::String(value.to_string())
}

fn parse_integer(value: &str) -> Option<i64> {
    let (negative, digits) = match value.as_bytes().first()? {
        b'-' => (true, &value[1..]),
        b'+' => (false, &value[1..]),
        _ => (false, value),
    };

    let magnitude = if let Some(hex) = digits.strip_prefix("0x") {
        radix_digits(hex, 16)?
    } else if let Some(octal) = digits.strip_prefix("0o") {
        radix_digits(octal, 8)?
    } else if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        // Parse with the sign attached so i64::MIN survives.
        return value.parse::<i64>().ok();
    } else {
        return None;
    };

    Some(if negative { -magnitude } else { magnitude })
}

// from_str_radix tolerates a sign of its own, which YAML does not.
fn radix_digits(digits: &str, radix: u32) -> Option<i64> {
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    i64::from_str_radix(digits, radix).ok()
}

// Rust's float parser also accepts "inf", "NaN" and "infinity", which YAML
// treats as strings.
fn looks_numeric(value: &str) -> bool {
    value.bytes().any(|b| b.is_ascii_digit())
        && value
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_integers() {
        assert_eq!(resolve_plain_scalar("42"), ScalarValue::Integer(42));
        assert_eq!(resolve_plain_scalar("-7"), ScalarValue::Integer(-7));
        assert_eq!(resolve_plain_scalar("+3"), ScalarValue::Integer(3));
        assert_eq!(resolve_plain_scalar("0x1F"), ScalarValue::Integer(31));
        assert_eq!(resolve_plain_scalar("0o17"), ScalarValue::Integer(15));
        assert_eq!(
            resolve_plain_scalar("-9223372036854775808"),
            ScalarValue::Integer(i64::MIN)
        );
    }

    #[test]
    fn test_resolve_floats() {
        assert_eq!(resolve_plain_scalar("1.5"), ScalarValue::Float(1.5));
        assert_eq!(resolve_plain_scalar("1e3"), ScalarValue::Float(1000.0));
        assert_eq!(resolve_plain_scalar("-.inf"), ScalarValue::Float(f64::NEG_INFINITY));
        assert!(matches!(resolve_plain_scalar(".nan"), ScalarValue::Float(f) if f.is_nan()));
    }

    #[test]
    fn test_resolve_booleans_and_null() {
        assert_eq!(resolve_plain_scalar("true"), ScalarValue::Bool(true));
        assert_eq!(resolve_plain_scalar("off"), ScalarValue::Bool(false));
        assert_eq!(resolve_plain_scalar("~"), ScalarValue::Null);
        assert_eq!(resolve_plain_scalar(""), ScalarValue::Null);
    }

    #[test]
    fn test_words_stay_strings() {
        for word in [
            "inf", "NaN", "infinity", "1.2.3-beta", "e", "0xZZ", "-", "0x", "0o", "0x-5",
            "-0x-5", "0o+7", "0o8",
        ] {
            assert_eq!(
                resolve_plain_scalar(word),
                ScalarValue::String(word.to_string()),
                "{word} should resolve to a string"
            );
        }
    }
}
