//! Lenient scalar decoding shared by every payload DTO.
//!
//! The backend is loosely typed: flags arrive as `true`, `1` or `"0"`,
//! counts as numbers or strings, and fields disappear when the device
//! does not report them. These helpers turn any JSON value into the
//! scalar the dashboard needs without ever failing.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Marker shown for any value that is missing or unavailable.
pub const UNAVAILABLE: &str = "N/A";

/// Interprets a JSON value as a boolean flag.
///
/// `"0"`, `""`, `"false"`, `"no"`, `"off"`, `0`, `null` and containers are
/// false; everything else that is a scalar is true.
#[must_use]
pub fn value_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "" | "0" | "false" | "no" | "off"
        ),
        Value::Null | Value::Array(_) | Value::Object(_) => false,
    }
}

/// Renders a scalar JSON value as display text. Containers and `null`
/// yield `None`.
#[must_use]
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Interprets a JSON value as a finite float.
#[must_use]
pub fn value_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|f| f.is_finite())
}

/// Interprets a JSON value as a non-negative count; anything non-numeric
/// is 0.
#[must_use]
pub fn value_count(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n.as_u64().unwrap_or_else(|| float_count(n.as_f64())),
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<u64>()
                .unwrap_or_else(|_| float_count(trimmed.parse::<f64>().ok()))
        }
        _ => 0,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn float_count(value: Option<f64>) -> u64 {
    match value {
        Some(f) if f.is_finite() && f >= 0.0 => f.trunc() as u64,
        _ => 0,
    }
}

/// `deserialize_with` adapter for [`value_truthy`].
///
/// # Errors
///
/// Only fails if the underlying deserializer cannot produce any JSON value.
pub fn lenient_bool<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    Ok(value_truthy(&Value::deserialize(d)?))
}

/// `deserialize_with` adapter for [`value_text`].
///
/// # Errors
///
/// Only fails if the underlying deserializer cannot produce any JSON value.
pub fn lenient_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(value_text(&Value::deserialize(d)?))
}

/// `deserialize_with` adapter for [`value_f64`].
///
/// # Errors
///
/// Only fails if the underlying deserializer cannot produce any JSON value.
pub fn lenient_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    Ok(value_f64(&Value::deserialize(d)?))
}

/// `deserialize_with` adapter for [`value_count`].
///
/// # Errors
///
/// Only fails if the underlying deserializer cannot produce any JSON value.
pub fn lenient_count<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
    Ok(value_count(&Value::deserialize(d)?))
}

/// Decodes a JSON array of scalars into display strings, skipping
/// anything that is not a scalar. Returns `None` if `value` is not an
/// array.
#[must_use]
pub fn text_list(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()
        .map(|items| items.iter().filter_map(value_text).collect())
}
