//! Lenient count fields shared by the courier parsers.
//!
//! Couriers send counts as numbers, numeric strings or `null`. Anything that
//! is not a non-negative integer reads as zero.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserializes a delivery count, defaulting to zero.
pub(crate) fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map_or(0, count_from_value))
}

fn count_from_value(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n.as_u64().unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Deserialize)]
    struct Counts {
        #[serde(default, deserialize_with = "lenient_count")]
        n: u64,
    }

    fn parse(json: &str) -> u64 {
        serde_json::from_str::<Counts>(json).unwrap().n
    }

    #[test]
    fn test_number_and_string_counts() {
        assert_eq!(parse(r#"{"n": 7}"#), 7);
        assert_eq!(parse(r#"{"n": "12"}"#), 12);
        assert_eq!(parse(r#"{"n": " 3 "}"#), 3);
    }

    #[test]
    fn test_missing_null_and_garbage_are_zero() {
        assert_eq!(parse(r#"{}"#), 0);
        assert_eq!(parse(r#"{"n": null}"#), 0);
        assert_eq!(parse(r#"{"n": -4}"#), 0);
        assert_eq!(parse(r#"{"n": 2.5}"#), 0);
        assert_eq!(parse(r#"{"n": "many"}"#), 0);
        assert_eq!(parse(r#"{"n": [1]}"#), 0);
    }
}
