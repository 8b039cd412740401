//! Coercion of raw spreadsheet cells into typed values.
//!
//! The external row collaborator hands over loosely typed JSON: a code may
//! arrive as a number, a quantity as a string. These helpers mirror the
//! tolerant parsing the import pipeline has always applied.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value as JsonValue;

/// A cell as text, if it holds a string or number.
pub(crate) fn to_text(cell: Option<&JsonValue>) -> Option<String> {
    match cell? {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A cell as a whole number, if it parses as one.
pub(crate) fn to_i64(cell: Option<&JsonValue>) -> Option<i64> {
    match cell? {
        JsonValue::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        JsonValue::String(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().map(|f| f.trunc() as i64))
        }
        _ => None,
    }
}

/// A cell as a decimal, if it parses as one.
pub(crate) fn to_decimal(cell: Option<&JsonValue>) -> Option<Decimal> {
    match cell? {
        JsonValue::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        JsonValue::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}
