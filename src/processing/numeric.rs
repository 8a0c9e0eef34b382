//! Lenient numeric coercion used by the built-in reducers.

use crate::types::Value;

/// Returns the numeric interpretation of `value`, or `0.0` if it has none.
///
/// - integers and finite floats are returned as-is
/// - strings are trimmed and parsed; anything that is not a finite number yields `0.0`
/// - `Null` and booleans yield `0.0`
///
/// Missing or malformed metric fields therefore contribute zero instead of failing the
/// aggregation.
pub fn to_numeric(value: &Value) -> f64 {
    match value {
        Value::Int64(v) => *v as f64,
        Value::Float64(v) if v.is_finite() => *v,
        Value::Utf8(s) => match s.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => v,
            _ => 0.0,
        },
        Value::Float64(_) | Value::Bool(_) | Value::Null => 0.0,
    }
}
