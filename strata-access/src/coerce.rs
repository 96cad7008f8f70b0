//! Type coercion of raw DSL values
//!
//! Condition values arrive from the wire as untyped JSON. Before a predicate
//! can be built, each value is coerced into the declared type of the field it
//! targets. Coercion is deliberately permissive at the edges: combinations
//! the rules below do not claim degrade to a raw pass-through instead of a
//! hard failure, so fields outside the core scalar set do not break
//! translation.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::error::AccessError;
use crate::schema::{FieldType, FieldValue};

/// Coerce a raw JSON value into the target field type
///
/// Rules, applied in order:
///
/// 1. JSON null passes through as [`FieldValue::Null`]; a value already
///    inhabiting the target type passes through unchanged.
/// 2. Target [`FieldType::Text`]: any scalar is stringified (numbers and
///    booleans via their canonical rendering, non-scalars via their JSON
///    rendering).
/// 3. Target [`FieldType::Integer`] / [`FieldType::Float`]: JSON numbers are
///    accepted (integers reject fractional input); textual input is parsed.
///    Anything unparsable fails with [`AccessError::Coercion`].
/// 4. Target [`FieldType::Boolean`]: textual input must spell `true` or
///    `false`, compared ASCII-case-insensitively (`TRUE` and `True` are
///    accepted; anything else fails with [`AccessError::Coercion`]).
/// 5. Targets [`FieldType::Date`] (`%Y-%m-%d`), [`FieldType::DateTime`]
///    (RFC 3339), and [`FieldType::Uuid`] (hyphenated): textual input is
///    parsed with the format appropriate to the type; a malformed string
///    fails with [`AccessError::Coercion`].
/// 6. Everything else — target [`FieldType::Json`], or an input shape no rule
///    above claims — passes through as [`FieldValue::Json`]. Callers relying
///    on strict validation must validate upstream.
///
/// # Example
///
/// ```rust
/// use strata_access::coerce::coerce;
/// use strata_access::schema::{FieldType, FieldValue};
///
/// let value = coerce(&serde_json::json!("1500"), FieldType::Integer).unwrap();
/// assert_eq!(value, FieldValue::Integer(1500));
///
/// assert!(coerce(&serde_json::json!("abc"), FieldType::Integer).is_err());
/// ```
pub fn coerce(value: &Value, target: FieldType) -> Result<FieldValue, AccessError> {
    if value.is_null() {
        return Ok(FieldValue::Null);
    }
    match target {
        FieldType::Text => Ok(FieldValue::Text(stringify(value))),
        FieldType::Integer => coerce_integer(value),
        FieldType::Float => coerce_float(value),
        FieldType::Boolean => coerce_boolean(value),
        FieldType::Date => coerce_date(value),
        FieldType::DateTime => coerce_datetime(value),
        FieldType::Uuid => coerce_uuid(value),
        FieldType::Json => Ok(FieldValue::Json(value.clone())),
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn coerce_integer(value: &Value) -> Result<FieldValue, AccessError> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .map(FieldValue::Integer)
            .ok_or_else(|| coercion_error(value, FieldType::Integer)),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map(FieldValue::Integer)
            .map_err(|_| coercion_error(value, FieldType::Integer)),
        _ => Err(coercion_error(value, FieldType::Integer)),
    }
}

fn coerce_float(value: &Value) -> Result<FieldValue, AccessError> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .map(FieldValue::Float)
            .ok_or_else(|| coercion_error(value, FieldType::Float)),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map(FieldValue::Float)
            .map_err(|_| coercion_error(value, FieldType::Float)),
        _ => Err(coercion_error(value, FieldType::Float)),
    }
}

fn coerce_boolean(value: &Value) -> Result<FieldValue, AccessError> {
    match value {
        Value::Bool(b) => Ok(FieldValue::Boolean(*b)),
        Value::String(s) if s.eq_ignore_ascii_case("true") => Ok(FieldValue::Boolean(true)),
        Value::String(s) if s.eq_ignore_ascii_case("false") => Ok(FieldValue::Boolean(false)),
        Value::String(_) => Err(coercion_error(value, FieldType::Boolean)),
        // Non-textual input is outside the boolean rule; pass through raw.
        other => Ok(FieldValue::Json(other.clone())),
    }
}

fn coerce_date(value: &Value) -> Result<FieldValue, AccessError> {
    match value {
        Value::String(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(FieldValue::Date)
            .map_err(|_| coercion_error(value, FieldType::Date)),
        other => Ok(FieldValue::Json(other.clone())),
    }
}

fn coerce_datetime(value: &Value) -> Result<FieldValue, AccessError> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| FieldValue::DateTime(dt.with_timezone(&Utc)))
            .map_err(|_| coercion_error(value, FieldType::DateTime)),
        other => Ok(FieldValue::Json(other.clone())),
    }
}

fn coerce_uuid(value: &Value) -> Result<FieldValue, AccessError> {
    match value {
        Value::String(s) => Uuid::parse_str(s)
            .map(FieldValue::Uuid)
            .map_err(|_| coercion_error(value, FieldType::Uuid)),
        other => Ok(FieldValue::Json(other.clone())),
    }
}

fn coercion_error(value: &Value, target: FieldType) -> AccessError {
    AccessError::Coercion {
        value: value.to_string(),
        target,
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_null_passes_through() {
        for target in [
            FieldType::Text,
            FieldType::Integer,
            FieldType::Float,
            FieldType::Boolean,
            FieldType::Date,
            FieldType::Uuid,
            FieldType::Json,
        ] {
            assert_eq!(coerce(&Value::Null, target).unwrap(), FieldValue::Null);
        }
    }

    #[test]
    fn test_text_stringifies_scalars() {
        assert_eq!(
            coerce(&json!("hello"), FieldType::Text).unwrap(),
            FieldValue::Text("hello".into())
        );
        assert_eq!(
            coerce(&json!(42), FieldType::Text).unwrap(),
            FieldValue::Text("42".into())
        );
        assert_eq!(
            coerce(&json!(true), FieldType::Text).unwrap(),
            FieldValue::Text("true".into())
        );
    }

    #[test]
    fn test_integer_accepts_numbers_and_digits() {
        assert_eq!(
            coerce(&json!(1500), FieldType::Integer).unwrap(),
            FieldValue::Integer(1500)
        );
        assert_eq!(
            coerce(&json!("  -7 "), FieldType::Integer).unwrap(),
            FieldValue::Integer(-7)
        );
    }

    #[test]
    fn test_integer_rejects_fractional_and_garbage() {
        assert!(coerce(&json!(1.5), FieldType::Integer).is_err());
        assert!(coerce(&json!("abc"), FieldType::Integer).is_err());
        assert!(coerce(&json!([1]), FieldType::Integer).is_err());
    }

    #[test]
    fn test_float_accepts_integral_input() {
        assert_eq!(
            coerce(&json!(2), FieldType::Float).unwrap(),
            FieldValue::Float(2.0)
        );
        assert_eq!(
            coerce(&json!("2.5"), FieldType::Float).unwrap(),
            FieldValue::Float(2.5)
        );
        assert!(coerce(&json!("two"), FieldType::Float).is_err());
    }

    #[test]
    fn test_boolean_case_rule() {
        assert_eq!(
            coerce(&json!(true), FieldType::Boolean).unwrap(),
            FieldValue::Boolean(true)
        );
        for spelling in ["true", "TRUE", "True"] {
            assert_eq!(
                coerce(&json!(spelling), FieldType::Boolean).unwrap(),
                FieldValue::Boolean(true)
            );
        }
        for spelling in ["false", "FALSE", "False"] {
            assert_eq!(
                coerce(&json!(spelling), FieldType::Boolean).unwrap(),
                FieldValue::Boolean(false)
            );
        }
        assert!(coerce(&json!("yes"), FieldType::Boolean).is_err());
        assert!(coerce(&json!("1"), FieldType::Boolean).is_err());
    }

    #[test]
    fn test_date_parsing() {
        let value = coerce(&json!("2024-03-01"), FieldType::Date).unwrap();
        assert_eq!(
            value,
            FieldValue::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
        );
        assert!(coerce(&json!("03/01/2024"), FieldType::Date).is_err());
    }

    #[test]
    fn test_datetime_parsing_normalizes_to_utc() {
        let value = coerce(&json!("2024-03-01T10:30:00+02:00"), FieldType::DateTime).unwrap();
        assert_eq!(
            value,
            FieldValue::DateTime(Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap())
        );
        assert!(coerce(&json!("not-a-timestamp"), FieldType::DateTime).is_err());
    }

    #[test]
    fn test_uuid_parsing() {
        let id = Uuid::new_v4();
        let value = coerce(&json!(id.to_string()), FieldType::Uuid).unwrap();
        assert_eq!(value, FieldValue::Uuid(id));
        assert!(coerce(&json!("not-a-uuid"), FieldType::Uuid).is_err());
    }

    #[test]
    fn test_json_target_passes_through() {
        let raw = json!({"nested": [1, 2]});
        assert_eq!(
            coerce(&raw, FieldType::Json).unwrap(),
            FieldValue::Json(raw.clone())
        );
    }

    #[test]
    fn test_unclaimed_shapes_pass_through_raw() {
        // Date target with numeric input is outside rule 5; permissive fallback.
        assert_eq!(
            coerce(&json!(20240301), FieldType::Date).unwrap(),
            FieldValue::Json(json!(20240301))
        );
        assert_eq!(
            coerce(&json!(1), FieldType::Boolean).unwrap(),
            FieldValue::Json(json!(1))
        );
    }

    #[test]
    fn test_coercion_error_carries_value_and_target() {
        let err = coerce(&json!("abc"), FieldType::Integer).unwrap_err();
        match err {
            AccessError::Coercion { value, target } => {
                assert_eq!(value, "\"abc\"");
                assert_eq!(target, FieldType::Integer);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
