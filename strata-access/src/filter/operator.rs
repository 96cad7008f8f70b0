//! Operator vocabulary for the filter DSL
//!
//! These enums are part of the wire contract: every variant serializes to the
//! exact SCREAMING_SNAKE_CASE literal callers send, so renaming a variant is a
//! breaking protocol change.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Comparison operators for filter conditions
///
/// # Example
///
/// ```rust
/// use strata_access::filter::FilterOperator;
///
/// assert_eq!(format!("{}", FilterOperator::Equals), "=");
/// assert_eq!(format!("{}", FilterOperator::Like), "LIKE");
/// assert_eq!(
///     serde_json::to_string(&FilterOperator::GreaterThanEqual).unwrap(),
///     "\"GREATER_THAN_EQUAL\""
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterOperator {
    /// Equal to (=)
    Equals,
    /// Not equal to (!=)
    NotEquals,
    /// Greater than (>)
    GreaterThan,
    /// Greater than or equal to (>=)
    GreaterThanEqual,
    /// Less than (<)
    LessThan,
    /// Less than or equal to (<=)
    LessThanEqual,
    /// Inclusive range over [value, additionalValue]
    Between,
    /// Substring match (LIKE with %value% wrapping)
    Like,
    /// Value is in a list (IN)
    In,
    /// Value is not in a list (NOT IN)
    NotIn,
    /// Value is null (IS NULL)
    IsNull,
    /// Value is not null (IS NOT NULL)
    IsNotNull,
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equals => write!(f, "="),
            Self::NotEquals => write!(f, "!="),
            Self::GreaterThan => write!(f, ">"),
            Self::GreaterThanEqual => write!(f, ">="),
            Self::LessThan => write!(f, "<"),
            Self::LessThanEqual => write!(f, "<="),
            Self::Between => write!(f, "BETWEEN"),
            Self::Like => write!(f, "LIKE"),
            Self::In => write!(f, "IN"),
            Self::NotIn => write!(f, "NOT IN"),
            Self::IsNull => write!(f, "IS NULL"),
            Self::IsNotNull => write!(f, "IS NOT NULL"),
        }
    }
}

/// Logical connector applied uniformly across all conditions in one request
///
/// There is no per-condition nesting: a request is either a conjunction or a
/// disjunction of its conditions.
///
/// # Example
///
/// ```rust
/// use strata_access::filter::LogicalOperator;
///
/// assert_eq!(LogicalOperator::default(), LogicalOperator::And);
/// assert_eq!(serde_json::to_string(&LogicalOperator::Or).unwrap(), "\"OR\"");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogicalOperator {
    /// All conditions must match (default)
    #[default]
    And,
    /// Any condition may match
    Or,
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And => write!(f, "AND"),
            Self::Or => write!(f, "OR"),
        }
    }
}

/// Direction for sort specifications
///
/// # Example
///
/// ```rust
/// use strata_access::filter::SortDirection;
///
/// assert_eq!(SortDirection::default(), SortDirection::Asc);
/// assert_eq!(SortDirection::Desc.as_sql(), "DESC");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortDirection {
    /// Sort in ascending order (A-Z, 0-9)
    #[default]
    Asc,
    /// Sort in descending order (Z-A, 9-0)
    Desc,
}

impl SortDirection {
    /// Convert to SQL ORDER BY clause fragment
    #[must_use]
    pub const fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_sql())
    }
}

/// Aggregate functions for aggregate and group-by requests
///
/// `Display` renders the uppercase SQL name, which is also the suffix used in
/// aggregate result keys (`salary_SUM`).
///
/// # Example
///
/// ```rust
/// use strata_access::filter::AggregateFunction;
///
/// assert_eq!(format!("{}", AggregateFunction::Sum), "SUM");
/// assert_eq!(serde_json::to_string(&AggregateFunction::Avg).unwrap(), "\"AVG\"");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AggregateFunction {
    /// Count rows (non-null values of the field, or all rows for `"*"`)
    Count,
    /// Sum of a numeric field
    Sum,
    /// Arithmetic mean of a numeric field
    Avg,
    /// Maximum of an ordinally comparable field
    Max,
    /// Minimum of an ordinally comparable field
    Min,
}

impl fmt::Display for AggregateFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count => write!(f, "COUNT"),
            Self::Sum => write!(f, "SUM"),
            Self::Avg => write!(f, "AVG"),
            Self::Max => write!(f, "MAX"),
            Self::Min => write!(f, "MIN"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_operator_display() {
        assert_eq!(format!("{}", FilterOperator::Equals), "=");
        assert_eq!(format!("{}", FilterOperator::NotEquals), "!=");
        assert_eq!(format!("{}", FilterOperator::GreaterThan), ">");
        assert_eq!(format!("{}", FilterOperator::GreaterThanEqual), ">=");
        assert_eq!(format!("{}", FilterOperator::LessThan), "<");
        assert_eq!(format!("{}", FilterOperator::LessThanEqual), "<=");
        assert_eq!(format!("{}", FilterOperator::Between), "BETWEEN");
        assert_eq!(format!("{}", FilterOperator::Like), "LIKE");
        assert_eq!(format!("{}", FilterOperator::In), "IN");
        assert_eq!(format!("{}", FilterOperator::NotIn), "NOT IN");
        assert_eq!(format!("{}", FilterOperator::IsNull), "IS NULL");
        assert_eq!(format!("{}", FilterOperator::IsNotNull), "IS NOT NULL");
    }

    #[test]
    fn test_filter_operator_wire_literals() {
        let cases = [
            (FilterOperator::Equals, "\"EQUALS\""),
            (FilterOperator::NotEquals, "\"NOT_EQUALS\""),
            (FilterOperator::GreaterThan, "\"GREATER_THAN\""),
            (FilterOperator::GreaterThanEqual, "\"GREATER_THAN_EQUAL\""),
            (FilterOperator::LessThan, "\"LESS_THAN\""),
            (FilterOperator::LessThanEqual, "\"LESS_THAN_EQUAL\""),
            (FilterOperator::Between, "\"BETWEEN\""),
            (FilterOperator::Like, "\"LIKE\""),
            (FilterOperator::In, "\"IN\""),
            (FilterOperator::NotIn, "\"NOT_IN\""),
            (FilterOperator::IsNull, "\"IS_NULL\""),
            (FilterOperator::IsNotNull, "\"IS_NOT_NULL\""),
        ];
        for (operator, literal) in cases {
            assert_eq!(serde_json::to_string(&operator).unwrap(), literal);
            let parsed: FilterOperator = serde_json::from_str(literal).unwrap();
            assert_eq!(parsed, operator);
        }
    }

    #[test]
    fn test_logical_operator_default_and_wire() {
        assert_eq!(LogicalOperator::default(), LogicalOperator::And);
        assert_eq!(serde_json::to_string(&LogicalOperator::And).unwrap(), "\"AND\"");
        let parsed: LogicalOperator = serde_json::from_str("\"OR\"").unwrap();
        assert_eq!(parsed, LogicalOperator::Or);
    }

    #[test]
    fn test_sort_direction_default_and_sql() {
        assert_eq!(SortDirection::default(), SortDirection::Asc);
        assert_eq!(SortDirection::Asc.as_sql(), "ASC");
        assert_eq!(SortDirection::Desc.as_sql(), "DESC");
        let parsed: SortDirection = serde_json::from_str("\"DESC\"").unwrap();
        assert_eq!(parsed, SortDirection::Desc);
    }

    #[test]
    fn test_aggregate_function_display_matches_wire() {
        let cases = [
            (AggregateFunction::Count, "COUNT"),
            (AggregateFunction::Sum, "SUM"),
            (AggregateFunction::Avg, "AVG"),
            (AggregateFunction::Max, "MAX"),
            (AggregateFunction::Min, "MIN"),
        ];
        for (function, name) in cases {
            assert_eq!(format!("{}", function), name);
            assert_eq!(serde_json::to_string(&function).unwrap(), format!("\"{name}\""));
        }
    }
}
