//! Repository trait definition
//!
//! The engine consumes any backing store through this trait, using RPITIT
//! (Return Position Impl Trait In Traits) for ergonomic async methods without
//! `async_trait`. A backend stores records of one type and executes the
//! translated [`Query`]/[`AggregatePlan`] artifacts natively; it does not see
//! the filter DSL.
//!
//! # Example
//!
//! ```rust,ignore
//! use strata_access::repository::{Repository, RepositoryResult};
//!
//! struct PgEmployeeRepository {
//!     pool: PgPool,
//! }
//!
//! impl Repository<Employee> for PgEmployeeRepository {
//!     async fn find_by_id(&self, id: &i64) -> RepositoryResult<Option<Employee>> {
//!         // compile the call into SQL against the pool
//!         todo!()
//!     }
//!     // ... other methods
//! }
//! ```

use std::collections::BTreeMap;
use std::future::Future;

use crate::identity::HasIdentifier;
use crate::page::{Page, PageRequest};
use crate::query::{AggregatePlan, Query};
use crate::schema::{FieldValue, Queryable};

use super::error::RepositoryError;

/// Result type for repository operations
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

/// A transactional, key-addressable store for one record type
///
/// Contract notes:
///
/// - `save` is an upsert keyed by the record's identifier;
/// - `find_all_by_id` returns whatever the backend's batched lookup yields
///   for the given set — the engine does not deduplicate ids itself;
/// - `execute` / `execute_page` / `execute_aggregate` run translated
///   artifacts; predicates are read-only and side-effect free;
/// - page requests passed down are already normalized by the engine
///   configuration.
pub trait Repository<E>: Send + Sync
where
    E: Queryable + HasIdentifier,
{
    /// Find a record by its identifier
    fn find_by_id(&self, id: &E::Id) -> impl Future<Output = RepositoryResult<Option<E>>> + Send;

    /// Read all records
    fn find_all(&self) -> impl Future<Output = RepositoryResult<Vec<E>>> + Send;

    /// Read all records whose identifier is in the given set
    fn find_all_by_id(
        &self,
        ids: &[E::Id],
    ) -> impl Future<Output = RepositoryResult<Vec<E>>> + Send;

    /// Insert or replace a record, keyed by its identifier
    fn save(&self, record: E) -> impl Future<Output = RepositoryResult<E>> + Send;

    /// Bulk insert or replace
    fn save_all(&self, records: Vec<E>) -> impl Future<Output = RepositoryResult<Vec<E>>> + Send;

    /// Delete a record by identifier; `true` if a record was removed
    fn delete_by_id(&self, id: &E::Id) -> impl Future<Output = RepositoryResult<bool>> + Send;

    /// Delete all records in the identifier set; returns the number removed
    fn delete_many(&self, ids: &[E::Id]) -> impl Future<Output = RepositoryResult<u64>> + Send;

    /// Delete every record; returns the number removed
    fn delete_all(&self) -> impl Future<Output = RepositoryResult<u64>> + Send;

    /// Read one page of records in store order
    fn find_page(
        &self,
        page: &PageRequest,
    ) -> impl Future<Output = RepositoryResult<Page<E>>> + Send;

    /// Execute a translated query
    fn execute(&self, query: &Query) -> impl Future<Output = RepositoryResult<Vec<E>>> + Send;

    /// Execute a translated query, returning one page of its results
    fn execute_page(
        &self,
        query: &Query,
        page: &PageRequest,
    ) -> impl Future<Output = RepositoryResult<Page<E>>> + Send;

    /// Execute an aggregate plan
    ///
    /// Returns exactly one row for an ungrouped plan and one row per distinct
    /// group-key tuple otherwise.
    fn execute_aggregate(
        &self,
        plan: &AggregatePlan,
    ) -> impl Future<Output = RepositoryResult<Vec<BTreeMap<String, FieldValue>>>> + Send;

    /// Count records matching a translated query
    fn count(&self, query: &Query) -> impl Future<Output = RepositoryResult<u64>> + Send;

    /// Count all records
    fn count_all(&self) -> impl Future<Output = RepositoryResult<u64>> + Send;

    /// Whether any record matches a translated query
    fn exists(&self, query: &Query) -> impl Future<Output = RepositoryResult<bool>> + Send;

    /// Whether a record with the identifier exists
    fn exists_by_id(&self, id: &E::Id) -> impl Future<Output = RepositoryResult<bool>> + Send;
}
