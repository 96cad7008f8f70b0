//! Schema registry and runtime field values
//!
//! Every record type queryable through the engine declares a [`Schema`]: an
//! ordered mapping from field name to declared [`FieldType`], built once at
//! startup and held in a static. Translation resolves DSL field names against
//! the schema, so an unknown field fails immediately and uniformly instead of
//! surfacing as a store-specific error.
//!
//! [`FieldValue`] is the runtime value vocabulary predicates evaluate over; a
//! record exposes its fields by name through the [`Queryable`] trait.
//!
//! # Example
//!
//! ```rust
//! use strata_access::schema::{FieldType, Schema};
//!
//! let schema = Schema::builder("Employee")
//!     .field("id", FieldType::Integer)
//!     .field("name", FieldType::Text)
//!     .field("salary", FieldType::Float)
//!     .build();
//!
//! assert_eq!(schema.entity(), "Employee");
//! assert_eq!(schema.field_type("salary"), Some(FieldType::Float));
//! assert!(schema.resolve("unknown").is_err());
//! ```

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::error::AccessError;

/// Declared type of a schema field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// UTF-8 text
    Text,
    /// 64-bit signed integer
    Integer,
    /// 64-bit floating point
    Float,
    /// Boolean
    Boolean,
    /// Calendar date without time zone
    Date,
    /// Instant in UTC
    DateTime,
    /// UUID
    Uuid,
    /// Arbitrary JSON; the permissive escape hatch for fields outside the
    /// core scalar set. Coercion passes raw values through unchanged.
    Json,
}

impl FieldType {
    /// Whether values of this type support ordering comparisons
    /// (`>`, `>=`, `<`, `<=`, BETWEEN, MAX/MIN)
    #[must_use]
    pub const fn is_ordinal(&self) -> bool {
        matches!(
            self,
            Self::Text | Self::Integer | Self::Float | Self::Date | Self::DateTime | Self::Uuid
        )
    }

    /// Whether values of this type are numeric (SUM/AVG eligible)
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Integer => write!(f, "integer"),
            Self::Float => write!(f, "float"),
            Self::Boolean => write!(f, "boolean"),
            Self::Date => write!(f, "date"),
            Self::DateTime => write!(f, "datetime"),
            Self::Uuid => write!(f, "uuid"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// A runtime field value
///
/// Produced by record field access ([`Queryable::field`]) and by coercing raw
/// DSL values against the target field's declared type.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Absent value
    Null,
    /// UTF-8 text
    Text(String),
    /// 64-bit signed integer
    Integer(i64),
    /// 64-bit floating point
    Float(f64),
    /// Boolean
    Boolean(bool),
    /// Calendar date
    Date(NaiveDate),
    /// Instant in UTC
    DateTime(DateTime<Utc>),
    /// UUID
    Uuid(Uuid),
    /// Raw JSON passed through by the permissive coercion fallback
    Json(Value),
}

impl FieldValue {
    /// The type this value inhabits, or `None` for null
    #[must_use]
    pub fn field_type(&self) -> Option<FieldType> {
        match self {
            Self::Null => None,
            Self::Text(_) => Some(FieldType::Text),
            Self::Integer(_) => Some(FieldType::Integer),
            Self::Float(_) => Some(FieldType::Float),
            Self::Boolean(_) => Some(FieldType::Boolean),
            Self::Date(_) => Some(FieldType::Date),
            Self::DateTime(_) => Some(FieldType::DateTime),
            Self::Uuid(_) => Some(FieldType::Uuid),
            Self::Json(_) => Some(FieldType::Json),
        }
    }

    /// Whether this value is null
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Ordinal comparison, defined only within one comparable type
    ///
    /// Integers and floats compare numerically across the two arms. Null,
    /// boolean, and raw JSON values have no defined ordering and yield
    /// `None`, which evaluators treat as "does not match".
    #[must_use]
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => Some(a.cmp(b)),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            (Self::Integer(a), Self::Float(b)) => (*a as f64).partial_cmp(b),
            (Self::Float(a), Self::Integer(b)) => a.partial_cmp(&(*b as f64)),
            (Self::Text(a), Self::Text(b)) => Some(a.cmp(b)),
            (Self::Date(a), Self::Date(b)) => Some(a.cmp(b)),
            (Self::DateTime(a), Self::DateTime(b)) => Some(a.cmp(b)),
            (Self::Uuid(a), Self::Uuid(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Render as a `serde_json::Value` for wire-facing results
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Text(s) => Value::String(s.clone()),
            Self::Integer(n) => Value::from(*n),
            Self::Float(n) => serde_json::Number::from_f64(*n).map_or(Value::Null, Value::Number),
            Self::Boolean(b) => Value::Bool(*b),
            Self::Date(d) => Value::String(d.format("%Y-%m-%d").to_string()),
            Self::DateTime(dt) => Value::String(dt.to_rfc3339()),
            Self::Uuid(u) => Value::String(u.to_string()),
            Self::Json(v) => v.clone(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Text(s) => write!(f, "{s}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
            Self::Uuid(u) => write!(f, "{u}"),
            Self::Json(v) => write!(f, "{v}"),
        }
    }
}

/// Field schema for one record type
///
/// Field order is preserved for introspection; lookups are constant time.
#[derive(Debug, Clone)]
pub struct Schema {
    entity: &'static str,
    fields: Vec<(&'static str, FieldType)>,
    index: HashMap<&'static str, FieldType>,
}

impl Schema {
    /// Start building a schema for the named entity
    #[must_use]
    pub fn builder(entity: &'static str) -> SchemaBuilder {
        SchemaBuilder {
            entity,
            fields: Vec::new(),
        }
    }

    /// The entity name this schema describes
    #[must_use]
    pub fn entity(&self) -> &'static str {
        self.entity
    }

    /// Declared type of a field, if the field exists
    #[must_use]
    pub fn field_type(&self, field: &str) -> Option<FieldType> {
        self.index.get(field).copied()
    }

    /// Resolve a field name, failing with [`AccessError::UnknownField`]
    pub fn resolve(&self, field: &str) -> Result<FieldType, AccessError> {
        self.field_type(field).ok_or_else(|| AccessError::UnknownField {
            entity: self.entity,
            field: field.to_string(),
        })
    }

    /// Iterate fields in declaration order
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, FieldType)> + '_ {
        self.fields.iter().copied()
    }

    /// Iterate the names of all text fields, in declaration order
    ///
    /// Used by the global `search` translation.
    pub fn text_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields
            .iter()
            .filter(|(_, ty)| *ty == FieldType::Text)
            .map(|(name, _)| *name)
    }

    /// Number of declared fields
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the schema declares no fields
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Builder for [`Schema`]
#[derive(Debug)]
pub struct SchemaBuilder {
    entity: &'static str,
    fields: Vec<(&'static str, FieldType)>,
}

impl SchemaBuilder {
    /// Declare a field with its type
    #[must_use]
    pub fn field(mut self, name: &'static str, field_type: FieldType) -> Self {
        self.fields.push((name, field_type));
        self
    }

    /// Finish building
    #[must_use]
    pub fn build(self) -> Schema {
        let index = self.fields.iter().copied().collect();
        Schema {
            entity: self.entity,
            fields: self.fields,
            index,
        }
    }
}

/// A record type queryable through the translation engine
///
/// Implementations declare their [`Schema`] once (typically in a
/// `once_cell::sync::Lazy` static) and expose field values by name. A `None`
/// return means the field name is not part of the record; an absent value of
/// a known field is `Some(FieldValue::Null)`.
pub trait Queryable: Send + Sync + 'static {
    /// The schema for this record type
    fn schema() -> &'static Schema
    where
        Self: Sized;

    /// Read a field value by name
    fn field(&self, name: &str) -> Option<FieldValue>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Schema {
        Schema::builder("Employee")
            .field("id", FieldType::Integer)
            .field("name", FieldType::Text)
            .field("email", FieldType::Text)
            .field("salary", FieldType::Float)
            .field("active", FieldType::Boolean)
            .field("joined", FieldType::Date)
            .build()
    }

    #[test]
    fn test_schema_lookup() {
        let schema = schema();
        assert_eq!(schema.entity(), "Employee");
        assert_eq!(schema.field_type("salary"), Some(FieldType::Float));
        assert_eq!(schema.field_type("missing"), None);
        assert_eq!(schema.len(), 6);
        assert!(!schema.is_empty());
    }

    #[test]
    fn test_schema_resolve_unknown_field() {
        let schema = schema();
        let err = schema.resolve("missing").unwrap_err();
        match err {
            AccessError::UnknownField { entity, field } => {
                assert_eq!(entity, "Employee");
                assert_eq!(field, "missing");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_schema_field_order_preserved() {
        let schema = schema();
        let names: Vec<_> = schema.fields().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["id", "name", "email", "salary", "active", "joined"]);
    }

    #[test]
    fn test_schema_text_fields() {
        let schema = schema();
        let text: Vec<_> = schema.text_fields().collect();
        assert_eq!(text, vec!["name", "email"]);
    }

    #[test]
    fn test_field_type_ordinal() {
        assert!(FieldType::Integer.is_ordinal());
        assert!(FieldType::Text.is_ordinal());
        assert!(FieldType::Date.is_ordinal());
        assert!(FieldType::Uuid.is_ordinal());
        assert!(!FieldType::Boolean.is_ordinal());
        assert!(!FieldType::Json.is_ordinal());
    }

    #[test]
    fn test_field_type_numeric() {
        assert!(FieldType::Integer.is_numeric());
        assert!(FieldType::Float.is_numeric());
        assert!(!FieldType::Text.is_numeric());
        assert!(!FieldType::Date.is_numeric());
    }

    #[test]
    fn test_field_value_compare_same_type() {
        assert_eq!(
            FieldValue::Integer(1).compare(&FieldValue::Integer(2)),
            Some(Ordering::Less)
        );
        assert_eq!(
            FieldValue::Text("b".into()).compare(&FieldValue::Text("a".into())),
            Some(Ordering::Greater)
        );
        assert_eq!(
            FieldValue::Float(1.5).compare(&FieldValue::Float(1.5)),
            Some(Ordering::Equal)
        );
    }

    #[test]
    fn test_field_value_compare_numeric_cross_type() {
        assert_eq!(
            FieldValue::Integer(2).compare(&FieldValue::Float(1.5)),
            Some(Ordering::Greater)
        );
        assert_eq!(
            FieldValue::Float(0.5).compare(&FieldValue::Integer(1)),
            Some(Ordering::Less)
        );
    }

    #[test]
    fn test_field_value_compare_undefined() {
        assert_eq!(FieldValue::Null.compare(&FieldValue::Integer(1)), None);
        assert_eq!(
            FieldValue::Boolean(true).compare(&FieldValue::Boolean(false)),
            None
        );
        assert_eq!(
            FieldValue::Text("1".into()).compare(&FieldValue::Integer(1)),
            None
        );
    }

    #[test]
    fn test_field_value_to_json() {
        assert_eq!(FieldValue::Null.to_json(), Value::Null);
        assert_eq!(FieldValue::Integer(42).to_json(), Value::from(42));
        assert_eq!(FieldValue::Text("x".into()).to_json(), Value::from("x"));
        assert_eq!(FieldValue::Boolean(true).to_json(), Value::Bool(true));
        let date = FieldValue::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(date.to_json(), Value::from("2024-03-01"));
    }

    #[test]
    fn test_field_value_display() {
        assert_eq!(format!("{}", FieldValue::Null), "null");
        assert_eq!(format!("{}", FieldValue::Integer(7)), "7");
        assert_eq!(format!("{}", FieldValue::Text("abc".into())), "abc");
    }
}
