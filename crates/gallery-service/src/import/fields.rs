//! Field extraction helpers for loosely typed JSON records.

use serde_json::{Map, Value};

/// A non-blank string field. Absent, null, non-string and blank values all
/// yield `None`.
pub fn text(record: &Map<String, Value>, key: &str) -> Option<String> {
    match record.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// The first present alias of a string field.
pub fn text_any(record: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| text(record, key))
}

/// A price given as a JSON number or a numeric string.
pub fn price(record: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|key| match record.get(*key) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(|p| p.is_finite()),
        _ => None,
    })
}

/// A text field that may also be given as an array of lines.
///
/// Array items that are not non-blank strings are dropped; the remaining
/// lines are joined with `\n`.
pub fn text_or_lines(record: &Map<String, Value>, key: &str) -> Option<String> {
    match record.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        Some(Value::Array(items)) => {
            let lines: Vec<&str> = items
                .iter()
                .filter_map(Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .collect();
            (!lines.is_empty()).then(|| lines.join("\n"))
        }
        _ => None,
    }
}

/// An optional array field. Absent or null reads as empty; `None` means
/// the field holds something other than an array.
pub fn optional_array<'a>(record: &'a Map<String, Value>, key: &str) -> Option<&'a [Value]> {
    match record.get(key) {
        None | Some(Value::Null) => Some(&[]),
        Some(Value::Array(items)) => Some(items.as_slice()),
        Some(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_text_rejects_blank_and_non_string() {
        let r = record(json!({ "a": "x", "b": "  ", "c": 3, "d": null }));
        assert_eq!(text(&r, "a").as_deref(), Some("x"));
        assert!(text(&r, "b").is_none());
        assert!(text(&r, "c").is_none());
        assert!(text(&r, "d").is_none());
        assert!(text(&r, "e").is_none());
    }

    #[test]
    fn test_price_accepts_number_and_numeric_string() {
        let r = record(json!({ "priceAUD": 120, "price": "99.5", "bad": "free" }));
        assert_eq!(price(&r, &["priceAUD"]), Some(120.0));
        assert_eq!(price(&r, &["price_aud", "price"]), Some(99.5));
        assert_eq!(price(&r, &["bad"]), None);
    }

    #[test]
    fn test_text_or_lines_joins_arrays() {
        let r = record(json!({ "includes": ["2 hours", "", "50 photos"] }));
        assert_eq!(
            text_or_lines(&r, "includes").as_deref(),
            Some("2 hours\n50 photos")
        );
    }

    #[test]
    fn test_optional_array() {
        let r = record(json!({ "a": [1], "b": null, "c": {} }));
        assert_eq!(optional_array(&r, "a").unwrap().len(), 1);
        assert!(optional_array(&r, "b").unwrap().is_empty());
        assert!(optional_array(&r, "missing").unwrap().is_empty());
        assert!(optional_array(&r, "c").is_none());
    }
}
