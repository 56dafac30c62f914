//! Serde helpers for loosely typed client input
//!
//! Quantity fields arrive from spreadsheets and hand-edited forms: numbers,
//! numeric strings, empty strings or nothing at all.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserialize a quantity, treating missing, null and non-numeric input as 0.
///
/// Numeric strings (`"5"`, `" 2.5 "`) are accepted as their value.
/// Non-finite results (`"NaN"`, `"inf"`) also collapse to 0.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(coerce).unwrap_or(0.0))
}

/// Like [`lenient_f64`] but keeps "absent" distinguishable from 0.
///
/// `null` and missing are `None`; anything else is coerced.
pub fn lenient_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(v) => Some(coerce(&v)),
    })
}

fn coerce(value: &Value) -> f64 {
    let n = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if n.is_finite() { n } else { 0.0 }
}
