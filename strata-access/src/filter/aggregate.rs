//! Aggregate and group-by request shapes
//!
//! Like the filter shapes, these are pure wire data. Result keys produced for
//! an [`Aggregation`] are `"{field}_{FUNCTION}"` (e.g. `salary_SUM`).

use serde::{Deserialize, Serialize};

use super::operator::AggregateFunction;
use super::request::FilterRequest;

/// One requested aggregate: a field paired with a function
///
/// The pseudo-field `"*"` is accepted for COUNT and means "all rows".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregation {
    /// The field to aggregate over
    pub field: String,
    /// The aggregate function to apply
    pub function: AggregateFunction,
}

impl Aggregation {
    /// Create an aggregation
    pub fn new(field: impl Into<String>, function: AggregateFunction) -> Self {
        Self {
            field: field.into(),
            function,
        }
    }

    /// The key this aggregation produces in result maps
    ///
    /// # Example
    ///
    /// ```rust
    /// use strata_access::filter::{AggregateFunction, Aggregation};
    ///
    /// let aggregation = Aggregation::new("salary", AggregateFunction::Sum);
    /// assert_eq!(aggregation.result_key(), "salary_SUM");
    /// ```
    #[must_use]
    pub fn result_key(&self) -> String {
        format!("{}_{}", self.field, self.function)
    }
}

/// Request for scalar aggregates over an optionally filtered row set
///
/// # Example
///
/// ```rust
/// use strata_access::filter::{AggregateFunction, AggregateRequest, Aggregation};
///
/// let request = AggregateRequest::new()
///     .aggregation(Aggregation::new("salary", AggregateFunction::Sum))
///     .aggregation(Aggregation::new("salary", AggregateFunction::Avg));
/// assert_eq!(request.aggregations.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AggregateRequest {
    /// Requested aggregates, in result order
    pub aggregations: Vec<Aggregation>,
    /// Optional filter limiting the aggregation scope
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_request: Option<FilterRequest>,
}

impl AggregateRequest {
    /// Create an empty request
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an aggregation
    #[must_use]
    pub fn aggregation(mut self, aggregation: Aggregation) -> Self {
        self.aggregations.push(aggregation);
        self
    }

    /// Scope the aggregation with a filter
    #[must_use]
    pub fn filter(mut self, filter: FilterRequest) -> Self {
        self.filter_request = Some(filter);
        self
    }
}

/// Request for grouped aggregates
///
/// Rows (after the optional filter) are partitioned by the tuple of
/// `group_by_fields` values; each aggregation is computed per partition.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GroupByRequest {
    /// Fields to group by, in tuple order
    pub group_by_fields: Vec<String>,
    /// Aggregates computed per group
    pub aggregations: Vec<Aggregation>,
    /// Optional filter applied before grouping
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_request: Option<FilterRequest>,
}

impl GroupByRequest {
    /// Create an empty request
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a grouping field
    #[must_use]
    pub fn group_by(mut self, field: impl Into<String>) -> Self {
        self.group_by_fields.push(field.into());
        self
    }

    /// Add an aggregation
    #[must_use]
    pub fn aggregation(mut self, aggregation: Aggregation) -> Self {
        self.aggregations.push(aggregation);
        self
    }

    /// Scope the grouping with a filter
    #[must_use]
    pub fn filter(mut self, filter: FilterRequest) -> Self {
        self.filter_request = Some(filter);
        self
    }
}
