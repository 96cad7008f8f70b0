//! Filter-to-predicate translation
//!
//! [`translate`] walks a [`FilterRequest`], resolves every field reference
//! against the target record's [`Schema`], coerces raw values to the declared
//! field types, and builds the [`Query`] a repository backend executes.
//! Translation reads the request and the schema only — it never touches the
//! store and may run concurrently without coordination.

use serde_json::Value;

use crate::coerce::coerce;
use crate::error::AccessError;
use crate::filter::{FilterCondition, FilterOperator, FilterRequest, LogicalOperator};
use crate::schema::{FieldType, Schema};

use super::predicate::{CompareOp, Predicate, Query, SortKey};

/// Translate a filter request into an executable query
///
/// Per-condition rules:
///
/// - equality and ordering operators compare the field against the coerced
///   value; ordering (`>`, `>=`, `<`, `<=`, BETWEEN) additionally requires an
///   ordinally comparable field type, else
///   [`AccessError::UnsupportedComparison`];
/// - LIKE is valid on text fields only ([`AccessError::InvalidOperatorForType`])
///   and matches `%value%` substrings;
/// - IN / NOT_IN require an array value ([`AccessError::InvalidValueShape`]),
///   each element coerced independently;
/// - IS_NULL / IS_NOT_NULL ignore the value.
///
/// With no conditions the predicate is [`Predicate::True`] under both AND and
/// OR, so an empty request matches everything either way.
///
/// A non-empty `search` term becomes a case-insensitive substring check OR-ed
/// across every text field of the schema, AND-combined with the conditions.
///
/// # Example
///
/// ```rust
/// use strata_access::filter::{FilterCondition, FilterRequest};
/// use strata_access::query::translate;
/// use strata_access::schema::{FieldType, Schema};
///
/// let schema = Schema::builder("Employee")
///     .field("name", FieldType::Text)
///     .field("salary", FieldType::Float)
///     .build();
///
/// let request = FilterRequest::new()
///     .condition(FilterCondition::gt("salary", 1500))
///     .sort_desc("salary");
/// let query = translate(&request, &schema).unwrap();
/// assert_eq!(query.sort.len(), 1);
///
/// let bad = FilterRequest::new().condition(FilterCondition::gt("tenure", 3));
/// assert!(translate(&bad, &schema).is_err());
/// ```
pub fn translate(request: &FilterRequest, schema: &Schema) -> Result<Query, AccessError> {
    let mut predicates = Vec::with_capacity(request.conditions.len());
    for condition in &request.conditions {
        predicates.push(build_condition(condition, schema)?);
    }

    let combined = if predicates.is_empty() {
        Predicate::True
    } else {
        match request.logical_operator {
            LogicalOperator::And => Predicate::And(predicates),
            LogicalOperator::Or => Predicate::Or(predicates),
        }
    };

    let predicate = match search_predicate(request.search.as_deref(), schema) {
        Some(search) if combined.is_trivial() => search,
        Some(search) => Predicate::And(vec![search, combined]),
        None => combined,
    };

    let mut sort = Vec::with_capacity(request.sort_orders.len());
    for order in &request.sort_orders {
        schema.resolve(&order.field)?;
        sort.push(SortKey {
            field: order.field.clone(),
            direction: order.direction,
        });
    }

    Ok(Query { predicate, sort })
}

fn build_condition(
    condition: &FilterCondition,
    schema: &Schema,
) -> Result<Predicate, AccessError> {
    let field_type = schema.resolve(&condition.field)?;
    let field = condition.field.clone();

    match condition.operator {
        FilterOperator::Equals => Ok(Predicate::Compare {
            value: coerce(&condition.value, field_type)?,
            op: CompareOp::Eq,
            field,
        }),
        FilterOperator::NotEquals => Ok(Predicate::Compare {
            value: coerce(&condition.value, field_type)?,
            op: CompareOp::Ne,
            field,
        }),
        FilterOperator::GreaterThan => ordering(condition, field_type, CompareOp::Gt),
        FilterOperator::GreaterThanEqual => ordering(condition, field_type, CompareOp::Gte),
        FilterOperator::LessThan => ordering(condition, field_type, CompareOp::Lt),
        FilterOperator::LessThanEqual => ordering(condition, field_type, CompareOp::Lte),
        FilterOperator::Between => {
            require_ordinal(&field, field_type)?;
            Ok(Predicate::Between {
                low: coerce(&condition.value, field_type)?,
                high: coerce(&condition.additional_value, field_type)?,
                field,
            })
        }
        FilterOperator::Like => {
            if field_type != FieldType::Text {
                return Err(AccessError::InvalidOperatorForType {
                    operator: FilterOperator::Like,
                    field,
                });
            }
            let needle = match &condition.value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Ok(Predicate::Like {
                field,
                needle,
                case_insensitive: false,
            })
        }
        FilterOperator::In => membership(condition, field_type, false),
        FilterOperator::NotIn => membership(condition, field_type, true),
        FilterOperator::IsNull => Ok(Predicate::Null {
            field,
            negated: false,
        }),
        FilterOperator::IsNotNull => Ok(Predicate::Null {
            field,
            negated: true,
        }),
    }
}

fn ordering(
    condition: &FilterCondition,
    field_type: FieldType,
    op: CompareOp,
) -> Result<Predicate, AccessError> {
    require_ordinal(&condition.field, field_type)?;
    Ok(Predicate::Compare {
        field: condition.field.clone(),
        op,
        value: coerce(&condition.value, field_type)?,
    })
}

fn require_ordinal(field: &str, field_type: FieldType) -> Result<(), AccessError> {
    if field_type.is_ordinal() {
        Ok(())
    } else {
        Err(AccessError::UnsupportedComparison {
            field: field.to_string(),
            field_type,
        })
    }
}

fn membership(
    condition: &FilterCondition,
    field_type: FieldType,
    negated: bool,
) -> Result<Predicate, AccessError> {
    let Value::Array(elements) = &condition.value else {
        return Err(AccessError::InvalidValueShape {
            operator: condition.operator,
            field: condition.field.clone(),
        });
    };
    let values = elements
        .iter()
        .map(|element| coerce(element, field_type))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Predicate::In {
        field: condition.field.clone(),
        values,
        negated,
    })
}

fn search_predicate(search: Option<&str>, schema: &Schema) -> Option<Predicate> {
    let term = search?.trim();
    if term.is_empty() {
        return None;
    }
    let branches: Vec<Predicate> = schema
        .text_fields()
        .map(|field| Predicate::Like {
            field: field.to_string(),
            needle: term.to_string(),
            case_insensitive: true,
        })
        .collect();
    match branches.len() {
        0 => None,
        1 => branches.into_iter().next(),
        _ => Some(Predicate::Or(branches)),
    }
}
