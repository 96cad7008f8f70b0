//! Filter-to-query translation engine
//!
//! Turns the declarative DSL of [`crate::filter`] into executable artifacts:
//! [`translate`] builds a [`Query`] (predicate tree + sort spec) and
//! [`plan_aggregate`]/[`plan_group_by`] build an [`AggregatePlan`]. Both are
//! pure functions over the request and the target record's schema.

mod aggregate;
mod predicate;
mod translate;

pub use aggregate::{
    plan_aggregate, plan_group_by, AggregatePlan, PlannedAggregate, COUNT_ALL_FIELD,
};
pub use predicate::{CompareOp, Predicate, Query, SortKey};
pub use translate::translate;
