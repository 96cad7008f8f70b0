//! Engine-boundary error taxonomy
//!
//! Every fallible engine operation returns [`AccessError`]. Failures raised by
//! a store backend ([`RepositoryError`](crate::repository::RepositoryError))
//! are wrapped exactly once into [`AccessError::Operation`] with the original
//! cause preserved, so a backend's native error type never crosses the engine
//! boundary.

use thiserror::Error;

use crate::filter::{AggregateFunction, FilterOperator};
use crate::repository::RepositoryError;
use crate::schema::FieldType;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, AccessError>;

/// Unified error for all data-access operations
///
/// Translation failures (`UnknownField`, `Coercion`, the operator/shape
/// variants) abort the operation that triggered them; per-element failures in
/// bulk operations are recovered by skipping the element and logging a
/// warning instead.
#[derive(Debug, Error)]
pub enum AccessError {
    /// No record exists for the given identifier
    #[error("{entity} with identifier {id} was not found")]
    NotFound {
        /// Entity name
        entity: &'static str,
        /// The identifier that missed
        id: String,
    },

    /// An update was requested without an identifier, and none could be
    /// extracted from the payload
    #[error("an identifier is required to update {entity}")]
    MissingIdentifier {
        /// Entity name
        entity: &'static str,
    },

    /// A condition or sort referenced a field the schema does not declare
    #[error("unknown field `{field}` on {entity}")]
    UnknownField {
        /// Entity name
        entity: &'static str,
        /// The unresolved field name
        field: String,
    },

    /// A raw condition value could not be converted into the field's type
    #[error("cannot coerce `{value}` into {target}")]
    Coercion {
        /// Rendering of the offending raw value
        value: String,
        /// The target field type
        target: FieldType,
    },

    /// An ordering comparison was requested on a type with no ordering
    #[error("field `{field}` of type {field_type} does not support ordering comparisons")]
    UnsupportedComparison {
        /// Field name
        field: String,
        /// The non-ordinal field type
        field_type: FieldType,
    },

    /// The operator is not valid for the field's type (e.g. LIKE on a number)
    #[error("operator {operator} is not valid for field `{field}`")]
    InvalidOperatorForType {
        /// The rejected operator
        operator: FilterOperator,
        /// Field name
        field: String,
    },

    /// The operator requires a collection value and got a scalar
    #[error("operator {operator} on field `{field}` requires a collection value")]
    InvalidValueShape {
        /// The operator demanding a collection
        operator: FilterOperator,
        /// Field name
        field: String,
    },

    /// The aggregate function cannot be applied to the field's type
    #[error("aggregate function {function} cannot be applied to field `{field}`")]
    UnsupportedAggregation {
        /// Field name (or `"*"`)
        field: String,
        /// The rejected function
        function: AggregateFunction,
    },

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A store failure wrapped at the engine boundary
    #[error("{operation} failed: {source}")]
    Operation {
        /// The engine operation that was in flight
        operation: &'static str,
        /// The underlying store error
        #[source]
        source: RepositoryError,
    },
}

impl AccessError {
    /// Wrap a store error for the named engine operation
    ///
    /// Used as `map_err(AccessError::operation("save"))`.
    pub fn operation(operation: &'static str) -> impl FnOnce(RepositoryError) -> Self {
        move |source| Self::Operation { operation, source }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;
    use crate::repository::{RepositoryErrorKind, RepositoryOperation};

    #[test]
    fn test_not_found_message() {
        let err = AccessError::NotFound {
            entity: "Employee",
            id: "42".to_string(),
        };
        assert_eq!(err.to_string(), "Employee with identifier 42 was not found");
    }

    #[test]
    fn test_unknown_field_message() {
        let err = AccessError::UnknownField {
            entity: "Employee",
            field: "salar".to_string(),
        };
        assert_eq!(err.to_string(), "unknown field `salar` on Employee");
    }

    #[test]
    fn test_coercion_message() {
        let err = AccessError::Coercion {
            value: "\"abc\"".to_string(),
            target: FieldType::Integer,
        };
        assert_eq!(err.to_string(), "cannot coerce `\"abc\"` into integer");
    }

    #[test]
    fn test_invalid_operator_message() {
        let err = AccessError::InvalidOperatorForType {
            operator: FilterOperator::Like,
            field: "salary".to_string(),
        };
        assert_eq!(err.to_string(), "operator LIKE is not valid for field `salary`");
    }

    #[test]
    fn test_operation_wrap_preserves_cause() {
        let store = RepositoryError::new(
            RepositoryOperation::Save,
            RepositoryErrorKind::Storage,
            "disk full",
        );
        let err = AccessError::operation("save")(store);
        assert!(err.to_string().starts_with("save failed:"));
        let cause = err.source().expect("cause preserved");
        assert!(cause.to_string().contains("disk full"));
    }
}
