//! Lenient numeric coercion for values typed into forms or echoed by the backend
//!
//! Form inputs arrive as strings ("12", "12.5", "3 km") while the backend
//! answers with numbers, strings or `null` depending on the column type.
//! Everything that is not a usable number coerces to `None` and callers
//! decide the default.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Parse the leading numeric prefix of a string (`"12.5abc"` -> 12.5)
pub fn parse_float_prefix(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;

    for (i, c) in text.char_indices() {
        match c {
            '+' | '-' if i == 0 => {}
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = i + c.len_utf8();
    }

    if !seen_digit {
        return None;
    }
    text[..end].trim_end_matches('.').parse::<f64>().ok()
}

/// Parse the leading integer prefix of a string (`"12.7"` -> 12)
pub fn parse_int_prefix(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let end = text
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))))
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    text[..end].parse::<i64>().ok()
}

/// Coerce a JSON value to a float
pub fn value_as_f64(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => parse_float_prefix(s).filter(|f| f.is_finite()),
        _ => None,
    }
}

/// Coerce a JSON value to an integer, truncating fractional numbers
pub fn value_as_i64(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => parse_int_prefix(s),
        _ => None,
    }
}

/// Serde helper: accept `12.5`, `"12.5"` or `null` for a price column
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value_as_f64(value.as_ref()).unwrap_or(0.0))
}

/// Serde helper: accept `3`, `"3"` or `null` for a quantity column
pub fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value_as_i64(value.as_ref()).unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_float_prefix() {
        assert_eq!(parse_float_prefix("12.5"), Some(12.5));
        assert_eq!(parse_float_prefix(" 7 km"), Some(7.0));
        assert_eq!(parse_float_prefix("-3.25x"), Some(-3.25));
        assert_eq!(parse_float_prefix("5."), Some(5.0));
        assert_eq!(parse_float_prefix("abc"), None);
        assert_eq!(parse_float_prefix(""), None);
        assert_eq!(parse_float_prefix("."), None);
    }

    #[test]
    fn test_parse_int_prefix() {
        assert_eq!(parse_int_prefix("12.7"), Some(12));
        assert_eq!(parse_int_prefix("120km"), Some(120));
        assert_eq!(parse_int_prefix("-4"), Some(-4));
        assert_eq!(parse_int_prefix("km"), None);
    }

    #[test]
    fn test_value_coercion() {
        assert_eq!(value_as_f64(Some(&json!(10))), Some(10.0));
        assert_eq!(value_as_f64(Some(&json!("9.90"))), Some(9.9));
        assert_eq!(value_as_f64(Some(&json!(null))), None);
        assert_eq!(value_as_f64(Some(&json!(true))), None);
        assert_eq!(value_as_f64(None), None);
        assert_eq!(value_as_i64(Some(&json!(3.9))), Some(3));
        assert_eq!(value_as_i64(Some(&json!("42"))), Some(42));
    }
}
