//! Filter request shapes
//!
//! A [`FilterRequest`] is the declarative, wire-serializable description of a
//! query: field conditions, one logical connector, and an ordered sort
//! specification. Requests are pure data — constructed by the caller,
//! consumed read-only by translation, never mutated by the engine.
//!
//! Multi-word fields serialize in camelCase (`additionalValue`,
//! `logicalOperator`, `sortOrders`); this spelling is part of the wire
//! contract.
//!
//! # Example
//!
//! ```rust
//! use strata_access::filter::{FilterCondition, FilterRequest, LogicalOperator};
//!
//! let request = FilterRequest::new()
//!     .condition(FilterCondition::eq("status", "ACTIVE"))
//!     .condition(FilterCondition::gt("salary", 1500))
//!     .sort_desc("salary");
//!
//! assert_eq!(request.conditions.len(), 2);
//! assert_eq!(request.logical_operator, LogicalOperator::And);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::operator::{FilterOperator, LogicalOperator, SortDirection};

/// A single filter condition
///
/// `value` carries the raw wire value (scalar, or an array for IN/NOT_IN);
/// `additional_value` is only read for BETWEEN, as the inclusive upper bound.
/// Field references are validated at translation time, not at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCondition {
    /// The field name to filter on
    pub field: String,
    /// The comparison operator
    pub operator: FilterOperator,
    /// The raw value to compare against
    #[serde(default)]
    pub value: Value,
    /// Upper bound for BETWEEN; ignored by every other operator
    #[serde(default)]
    pub additional_value: Value,
}

impl FilterCondition {
    /// Create a condition with an explicit operator
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
            additional_value: Value::Null,
        }
    }

    /// Equality condition (field = value)
    ///
    /// # Example
    ///
    /// ```rust
    /// use strata_access::filter::FilterCondition;
    ///
    /// let condition = FilterCondition::eq("status", "ACTIVE");
    /// assert_eq!(condition.field, "status");
    /// ```
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOperator::Equals, value)
    }

    /// Inequality condition (field != value)
    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOperator::NotEquals, value)
    }

    /// Greater-than condition (field > value)
    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOperator::GreaterThan, value)
    }

    /// Greater-than-or-equal condition (field >= value)
    pub fn gte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOperator::GreaterThanEqual, value)
    }

    /// Less-than condition (field < value)
    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOperator::LessThan, value)
    }

    /// Less-than-or-equal condition (field <= value)
    pub fn lte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOperator::LessThanEqual, value)
    }

    /// Inclusive range condition (low <= field <= high)
    ///
    /// # Example
    ///
    /// ```rust
    /// use strata_access::filter::FilterCondition;
    ///
    /// let condition = FilterCondition::between("salary", 1000, 3000);
    /// assert_eq!(condition.additional_value, serde_json::json!(3000));
    /// ```
    pub fn between(
        field: impl Into<String>,
        low: impl Into<Value>,
        high: impl Into<Value>,
    ) -> Self {
        let mut condition = Self::new(field, FilterOperator::Between, low);
        condition.additional_value = high.into();
        condition
    }

    /// Substring condition (field LIKE %value%); valid on text fields only
    pub fn like(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field, FilterOperator::Like, Value::String(value.into()))
    }

    /// Membership condition (field IN values)
    ///
    /// # Example
    ///
    /// ```rust
    /// use strata_access::filter::FilterCondition;
    ///
    /// let condition = FilterCondition::is_in("department", ["HR", "IT"]);
    /// assert!(condition.value.is_array());
    /// ```
    pub fn is_in<V, I>(field: impl Into<String>, values: I) -> Self
    where
        V: Into<Value>,
        I: IntoIterator<Item = V>,
    {
        let values = Value::Array(values.into_iter().map(Into::into).collect());
        Self::new(field, FilterOperator::In, values)
    }

    /// Exclusion condition (field NOT IN values)
    pub fn not_in<V, I>(field: impl Into<String>, values: I) -> Self
    where
        V: Into<Value>,
        I: IntoIterator<Item = V>,
    {
        let values = Value::Array(values.into_iter().map(Into::into).collect());
        Self::new(field, FilterOperator::NotIn, values)
    }

    /// Nullity condition (field IS NULL)
    pub fn is_null(field: impl Into<String>) -> Self {
        Self::new(field, FilterOperator::IsNull, Value::Null)
    }

    /// Non-nullity condition (field IS NOT NULL)
    pub fn is_not_null(field: impl Into<String>) -> Self {
        Self::new(field, FilterOperator::IsNotNull, Value::Null)
    }
}

/// One entry of the ordered sort specification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortOrder {
    /// The field to sort by
    pub field: String,
    /// Sort direction
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortOrder {
    /// Create a sort entry
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    /// Ascending sort on the field
    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    /// Descending sort on the field
    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Desc)
    }
}

/// A declarative query description
///
/// Deserializes leniently: a bare `{}` is the empty request (no conditions,
/// AND connector, no sort), which translates to a match-everything query.
///
/// # Example
///
/// ```rust
/// use strata_access::filter::FilterRequest;
///
/// let request: FilterRequest = serde_json::from_str(
///     r#"{
///         "conditions": [
///             {"field": "salary", "operator": "GREATER_THAN", "value": 1500}
///         ],
///         "sortOrders": [{"field": "salary", "direction": "DESC"}]
///     }"#,
/// )
/// .unwrap();
/// assert_eq!(request.conditions.len(), 1);
/// assert_eq!(request.sort_orders.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterRequest {
    /// Global free-text search across all text fields (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Individual filter conditions
    pub conditions: Vec<FilterCondition>,
    /// Connector applied across all conditions
    pub logical_operator: LogicalOperator,
    /// Sort specification; order of appearance is sort precedence
    pub sort_orders: Vec<SortOrder>,
}

impl FilterRequest {
    /// Create an empty request (matches everything)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a condition
    #[must_use]
    pub fn condition(mut self, condition: FilterCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Set the logical connector
    #[must_use]
    pub fn logical(mut self, operator: LogicalOperator) -> Self {
        self.logical_operator = operator;
        self
    }

    /// Set the global search term
    #[must_use]
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Append an ascending sort entry
    #[must_use]
    pub fn sort_asc(mut self, field: impl Into<String>) -> Self {
        self.sort_orders.push(SortOrder::asc(field));
        self
    }

    /// Append a descending sort entry
    #[must_use]
    pub fn sort_desc(mut self, field: impl Into<String>) -> Self {
        self.sort_orders.push(SortOrder::desc(field));
        self
    }

    /// Whether the request has neither conditions nor a search term
    #[must_use]
    pub fn is_unfiltered(&self) -> bool {
        self.conditions.is_empty() && self.search.as_ref().is_none_or(|s| s.is_empty())
    }
}
