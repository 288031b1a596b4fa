//! Model Output Sanitization
//!
//! Turns raw model text into clean `RawItem` records:
//! - strips markdown code fences (```json ... ``` or bare ```)
//! - requires a top-level JSON array (anything else is a format error)
//! - coerces each record's name and price defensively
//!
//! A failed parse always surfaces as `MalformedOutput` with the raw
//! text attached; partial data is never produced from a bad parse.

use serde_json::Value;

use crate::constants::labels::UNKNOWN_ITEM;
use crate::types::{CuentasError, RawItem, Result};

/// Parse sanitized model output into normalized item records.
///
/// An empty array is a valid result (an illegible receipt), reported
/// to the caller as zero items rather than an error.
pub fn parse_items(raw: &str) -> Result<Vec<RawItem>> {
    let cleaned = strip_code_fences(raw.trim());

    let value: Value = serde_json::from_str(cleaned)
        .map_err(|e| CuentasError::malformed(format!("JSON parse failed: {}", e), raw))?;

    let records = value.as_array().ok_or_else(|| CuentasError::InvalidFormat {
        found: json_type_name(&value).to_string(),
    })?;

    Ok(records.iter().map(normalize_record).collect())
}

/// Strip markdown code fences, returning the inner text.
///
/// Handles ```json ... ```, bare ``` ... ```, and fence markers glued
/// to the payload without a newline.
pub fn strip_code_fences(s: &str) -> &str {
    let mut t = s.trim();

    if let Some(rest) = t.strip_prefix("```") {
        // Drop the info string ("json", "JSON", ...) up to the first newline
        t = match rest.find('\n') {
            Some(idx) => &rest[idx + 1..],
            None => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
        };
    }

    let trimmed = t.trim_end();
    if let Some(rest) = trimmed.strip_suffix("```") {
        t = rest;
    }

    t.trim()
}

/// Coerce one raw record into a `RawItem`.
///
/// Missing or blank names get the placeholder; prices collapse to 0.0
/// on anything that is not a finite non-negative number. Numeric
/// strings are accepted since the source is untrusted model output.
fn normalize_record(value: &Value) -> RawItem {
    let name = value
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(UNKNOWN_ITEM)
        .to_string();

    let price = value.get("price").map(coerce_price).unwrap_or(0.0);

    RawItem { name, price }
}

fn coerce_price(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(p) if p.is_finite() && p >= 0.0 => p,
        _ => 0.0,
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =============================================
    // strip_code_fences
    // =============================================

    #[test]
    fn test_strip_json_fence() {
        let input = "```json\n[{\"name\":\"Coke\",\"price\":2.5}]\n```";
        assert_eq!(strip_code_fences(input), "[{\"name\":\"Coke\",\"price\":2.5}]");
    }

    #[test]
    fn test_strip_bare_fence() {
        let input = "```\n[1, 2]\n```";
        assert_eq!(strip_code_fences(input), "[1, 2]");
    }

    #[test]
    fn test_strip_fence_without_newline() {
        let input = "```json[1]```";
        assert_eq!(strip_code_fences(input), "[1]");
    }

    #[test]
    fn test_no_fence_passthrough() {
        let input = "  [1, 2, 3]  ";
        assert_eq!(strip_code_fences(input), "[1, 2, 3]");
    }

    // =============================================
    // parse_items
    // =============================================

    #[test]
    fn test_parse_fenced_array() {
        let items = parse_items("```json\n[{\"name\":\"Coke\",\"price\":2.5}]\n```").unwrap();
        assert_eq!(items, vec![RawItem::new("Coke", 2.5)]);
    }

    #[test]
    fn test_parse_plain_array() {
        let items =
            parse_items(r#"[{"name":"Pizza","price":12.0},{"name":"Soda","price":3.0}]"#).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "Pizza");
        assert_eq!(items[1].price, 3.0);
    }

    #[test]
    fn test_empty_array_is_valid() {
        let items = parse_items("[]").unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_non_json_is_malformed() {
        let err = parse_items("lo siento, no puedo leer este recibo").unwrap_err();
        match err {
            CuentasError::MalformedOutput { raw, .. } => {
                assert!(raw.contains("no puedo"));
            }
            other => panic!("expected MalformedOutput, got {:?}", other),
        }
    }

    #[test]
    fn test_non_array_is_invalid_format() {
        let err = parse_items(r#"{"name":"x","price":1.0}"#).unwrap_err();
        match err {
            CuentasError::InvalidFormat { found } => assert_eq!(found, "object"),
            other => panic!("expected InvalidFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_truncated_array_is_malformed_not_partial() {
        // A parse failure must never yield partial data
        let err = parse_items(r#"[{"name":"Pizza","price":12.0},{"name":"So"#).unwrap_err();
        assert!(matches!(err, CuentasError::MalformedOutput { .. }));
    }

    // =============================================
    // record normalization
    // =============================================

    #[test]
    fn test_missing_name_gets_placeholder() {
        let items = parse_items(r#"[{"price": 4.0}]"#).unwrap();
        assert_eq!(items[0].name, "Item desconocido");
        assert_eq!(items[0].price, 4.0);
    }

    #[test]
    fn test_blank_name_gets_placeholder() {
        let items = parse_items(r#"[{"name": "   ", "price": 4.0}]"#).unwrap();
        assert_eq!(items[0].name, "Item desconocido");
    }

    #[test]
    fn test_missing_price_is_zero() {
        let items = parse_items(r#"[{"name": "Pan"}]"#).unwrap();
        assert_eq!(items[0].price, 0.0);
    }

    #[test]
    fn test_non_numeric_price_is_zero() {
        let items = parse_items(r#"[{"name": "Pan", "price": "gratis"}]"#).unwrap();
        assert_eq!(items[0].price, 0.0);
    }

    #[test]
    fn test_numeric_string_price_is_accepted() {
        let items = parse_items(r#"[{"name": "Pan", "price": "2.50"}]"#).unwrap();
        assert_eq!(items[0].price, 2.5);
    }

    #[test]
    fn test_negative_price_is_zero() {
        let items = parse_items(r#"[{"name": "Descuento", "price": -3.0}]"#).unwrap();
        assert_eq!(items[0].price, 0.0);
    }

    #[test]
    fn test_null_record_fields() {
        let items = parse_items(r#"[{"name": null, "price": null}]"#).unwrap();
        assert_eq!(items[0].name, "Item desconocido");
        assert_eq!(items[0].price, 0.0);
    }
}
