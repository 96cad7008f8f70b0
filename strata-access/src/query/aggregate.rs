//! Aggregation and group-by planning
//!
//! Planning validates an [`AggregateRequest`] or [`GroupByRequest`] against
//! the schema and produces an [`AggregatePlan`]: the optional filter
//! translated to a predicate, the grouping fields, and the validated
//! `(field, function)` pairs with their result keys. Execution semantics
//! (what a backend must compute for the plan) follow SQL aggregates:
//!
//! - COUNT counts non-null values of the field, or all rows for `"*"`;
//! - SUM over zero rows is 0 (typed to the field);
//! - AVG, MAX, and MIN over zero contributing rows yield null, never a
//!   divide-by-zero.

use crate::error::AccessError;
use crate::filter::{AggregateFunction, AggregateRequest, Aggregation, GroupByRequest};
use crate::schema::Schema;

use super::predicate::{Predicate, Query, SortKey};
use super::translate::translate;

/// Pseudo-field accepted by COUNT, meaning "all rows"
pub const COUNT_ALL_FIELD: &str = "*";

/// One validated aggregate in a plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedAggregate {
    /// The field to aggregate over (or [`COUNT_ALL_FIELD`])
    pub field: String,
    /// The aggregate function
    pub function: AggregateFunction,
    /// The key this aggregate produces in result maps
    pub key: String,
}

/// A validated aggregate/group-by plan ready for backend execution
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatePlan {
    /// Row filter applied before aggregation
    pub predicate: Predicate,
    /// Post-aggregation sort over group-key columns
    pub sort: Vec<SortKey>,
    /// Grouping fields in tuple order; empty for a plain aggregate
    pub group_fields: Vec<String>,
    /// Validated aggregates in result order
    pub aggregates: Vec<PlannedAggregate>,
}

impl AggregatePlan {
    /// Whether this plan partitions rows into groups
    #[must_use]
    pub fn is_grouped(&self) -> bool {
        !self.group_fields.is_empty()
    }
}

/// Plan a scalar aggregation
///
/// Fails with [`AccessError::UnknownField`] for unresolved fields and
/// [`AccessError::UnsupportedAggregation`] when the function does not apply
/// to the field's type (SUM/AVG need a numeric field, MAX/MIN an ordinally
/// comparable one; `"*"` is valid for COUNT only).
///
/// # Example
///
/// ```rust
/// use strata_access::filter::{AggregateFunction, AggregateRequest, Aggregation};
/// use strata_access::query::plan_aggregate;
/// use strata_access::schema::{FieldType, Schema};
///
/// let schema = Schema::builder("Employee")
///     .field("salary", FieldType::Float)
///     .build();
///
/// let request =
///     AggregateRequest::new().aggregation(Aggregation::new("salary", AggregateFunction::Sum));
/// let plan = plan_aggregate(&request, &schema).unwrap();
/// assert_eq!(plan.aggregates[0].key, "salary_SUM");
/// ```
pub fn plan_aggregate(
    request: &AggregateRequest,
    schema: &Schema,
) -> Result<AggregatePlan, AccessError> {
    let scope = scope_query(request.filter_request.as_ref(), schema)?;
    let aggregates = plan_functions(&request.aggregations, schema)?;
    Ok(AggregatePlan {
        predicate: scope.predicate,
        sort: Vec::new(),
        group_fields: Vec::new(),
        aggregates,
    })
}

/// Plan a grouped aggregation
///
/// Group fields are resolved against the schema. Sort orders of the nested
/// filter that name group fields are forwarded as the post-aggregation sort;
/// without them, group order is the first-seen row order of the backing
/// store.
pub fn plan_group_by(
    request: &GroupByRequest,
    schema: &Schema,
) -> Result<AggregatePlan, AccessError> {
    for field in &request.group_by_fields {
        schema.resolve(field)?;
    }
    let scope = scope_query(request.filter_request.as_ref(), schema)?;
    let aggregates = plan_functions(&request.aggregations, schema)?;
    let sort = scope
        .sort
        .into_iter()
        .filter(|key| request.group_by_fields.contains(&key.field))
        .collect();
    Ok(AggregatePlan {
        predicate: scope.predicate,
        sort,
        group_fields: request.group_by_fields.clone(),
        aggregates,
    })
}

fn scope_query(filter: Option<&crate::filter::FilterRequest>, schema: &Schema) -> Result<Query, AccessError> {
    match filter {
        Some(request) => translate(request, schema),
        None => Ok(Query::unfiltered()),
    }
}

fn plan_functions(
    aggregations: &[Aggregation],
    schema: &Schema,
) -> Result<Vec<PlannedAggregate>, AccessError> {
    let mut planned = Vec::with_capacity(aggregations.len());
    for aggregation in aggregations {
        validate(aggregation, schema)?;
        planned.push(PlannedAggregate {
            field: aggregation.field.clone(),
            function: aggregation.function,
            key: aggregation.result_key(),
        });
    }
    Ok(planned)
}

fn validate(aggregation: &Aggregation, schema: &Schema) -> Result<(), AccessError> {
    if aggregation.field == COUNT_ALL_FIELD {
        return if aggregation.function == AggregateFunction::Count {
            Ok(())
        } else {
            Err(unsupported(aggregation))
        };
    }
    let field_type = schema.resolve(&aggregation.field)?;
    let applicable = match aggregation.function {
        AggregateFunction::Count => true,
        AggregateFunction::Sum | AggregateFunction::Avg => field_type.is_numeric(),
        AggregateFunction::Max | AggregateFunction::Min => field_type.is_ordinal(),
    };
    if applicable {
        Ok(())
    } else {
        Err(unsupported(aggregation))
    }
}

fn unsupported(aggregation: &Aggregation) -> AccessError {
    AccessError::UnsupportedAggregation {
        field: aggregation.field.clone(),
        function: aggregation.function,
    }
}

#[cfg(test)]
mod tests {
    use once_cell::sync::Lazy;

    use super::*;
    use crate::filter::{FilterCondition, FilterRequest};
    use crate::schema::FieldType;

    static SCHEMA: Lazy<Schema> = Lazy::new(|| {
        Schema::builder("Employee")
            .field("id", FieldType::Integer)
            .field("name", FieldType::Text)
            .field("department", FieldType::Text)
            .field("salary", FieldType::Float)
            .field("active", FieldType::Boolean)
            .build()
    });

    #[test]
    fn test_plan_aggregate_keys() {
        let request = AggregateRequest::new()
            .aggregation(Aggregation::new("salary", AggregateFunction::Sum))
            .aggregation(Aggregation::new("salary", AggregateFunction::Avg))
            .aggregation(Aggregation::new("*", AggregateFunction::Count));
        let plan = plan_aggregate(&request, &SCHEMA).unwrap();
        let keys: Vec<_> = plan.aggregates.iter().map(|a| a.key.as_str()).collect();
        assert_eq!(keys, vec!["salary_SUM", "salary_AVG", "*_COUNT"]);
        assert!(!plan.is_grouped());
        assert!(plan.predicate.is_trivial());
    }

    #[test]
    fn test_sum_on_text_field_rejected() {
        let request =
            AggregateRequest::new().aggregation(Aggregation::new("name", AggregateFunction::Sum));
        let err = plan_aggregate(&request, &SCHEMA).unwrap_err();
        assert!(matches!(err, AccessError::UnsupportedAggregation { .. }));
    }

    #[test]
    fn test_max_requires_ordinal_field() {
        let request =
            AggregateRequest::new().aggregation(Aggregation::new("active", AggregateFunction::Max));
        let err = plan_aggregate(&request, &SCHEMA).unwrap_err();
        assert!(matches!(err, AccessError::UnsupportedAggregation { .. }));

        // MAX over text is fine: text is ordinally comparable.
        let request =
            AggregateRequest::new().aggregation(Aggregation::new("name", AggregateFunction::Max));
        assert!(plan_aggregate(&request, &SCHEMA).is_ok());
    }

    #[test]
    fn test_star_is_count_only() {
        let request =
            AggregateRequest::new().aggregation(Aggregation::new("*", AggregateFunction::Sum));
        let err = plan_aggregate(&request, &SCHEMA).unwrap_err();
        assert!(matches!(err, AccessError::UnsupportedAggregation { .. }));
    }

    #[test]
    fn test_unknown_aggregate_field_rejected() {
        let request =
            AggregateRequest::new().aggregation(Aggregation::new("bonus", AggregateFunction::Sum));
        let err = plan_aggregate(&request, &SCHEMA).unwrap_err();
        assert!(matches!(err, AccessError::UnknownField { .. }));
    }

    #[test]
    fn test_nested_filter_translated_into_plan() {
        let request = AggregateRequest::new()
            .aggregation(Aggregation::new("salary", AggregateFunction::Sum))
            .filter(FilterRequest::new().condition(FilterCondition::eq("department", "HR")));
        let plan = plan_aggregate(&request, &SCHEMA).unwrap();
        assert!(!plan.predicate.is_trivial());
    }

    #[test]
    fn test_group_by_resolves_group_fields() {
        let request = GroupByRequest::new()
            .group_by("department")
            .aggregation(Aggregation::new("id", AggregateFunction::Count));
        let plan = plan_group_by(&request, &SCHEMA).unwrap();
        assert!(plan.is_grouped());
        assert_eq!(plan.group_fields, vec!["department"]);

        let bad = GroupByRequest::new()
            .group_by("region")
            .aggregation(Aggregation::new("id", AggregateFunction::Count));
        assert!(matches!(
            plan_group_by(&bad, &SCHEMA).unwrap_err(),
            AccessError::UnknownField { .. }
        ));
    }

    #[test]
    fn test_group_by_forwards_group_field_sort_only() {
        let request = GroupByRequest::new()
            .group_by("department")
            .aggregation(Aggregation::new("id", AggregateFunction::Count))
            .filter(FilterRequest::new().sort_asc("department").sort_desc("salary"));
        let plan = plan_group_by(&request, &SCHEMA).unwrap();
        assert_eq!(plan.sort.len(), 1);
        assert_eq!(plan.sort[0].field, "department");
    }
}
