//! In-memory reference backend
//!
//! A [`Repository`] implementation over an insertion-ordered `Vec` behind an
//! `RwLock`. Each operation takes the lock once, so every call is atomic from
//! the engine's perspective — which is all the engine assumes of a store.
//! Query and aggregate execution evaluate translated artifacts directly via
//! [`super::eval`].
//!
//! Intended for tests, prototypes, and as the executable reference for what a
//! production backend must compute.

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::identity::HasIdentifier;
use crate::page::{Page, PageRequest};
use crate::query::{AggregatePlan, Query};
use crate::schema::{FieldValue, Queryable};

use super::error::{RepositoryError, RepositoryOperation};
use super::eval;
use super::traits::{Repository, RepositoryResult};

/// Page size used when the engine passes a request without one
const NATIVE_PAGE_SIZE: u32 = 20;

/// Insertion-ordered in-memory store for one record type
///
/// # Example
///
/// ```rust,ignore
/// let repository: InMemoryRepository<Employee> = InMemoryRepository::new();
/// repository.save(employee).await?;
/// ```
#[derive(Debug, Default)]
pub struct InMemoryRepository<E> {
    records: RwLock<Vec<E>>,
}

impl<E> InMemoryRepository<E>
where
    E: Queryable + HasIdentifier + Clone,
{
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    /// Create a store seeded with records
    #[must_use]
    pub fn with_records(records: Vec<E>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    fn snapshot(&self) -> Vec<E> {
        self.records
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn with_write<T>(&self, f: impl FnOnce(&mut Vec<E>) -> T) -> T {
        let mut records = self
            .records
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut records)
    }

    fn paginate(records: Vec<E>, page: &PageRequest) -> Page<E> {
        let total = records.len() as u64;
        let page_number = page.page_number();
        let size = page.size.unwrap_or(NATIVE_PAGE_SIZE).max(1);
        let offset = (u64::from(page_number) - 1) * u64::from(size);
        let items = records
            .into_iter()
            .skip(offset as usize)
            .take(size as usize)
            .collect();
        Page::new(items, page_number, size, total)
    }

    fn run_query(&self, query: &Query) -> Vec<E> {
        let mut matched: Vec<E> = self
            .snapshot()
            .into_iter()
            .filter(|record| eval::matches(record, &query.predicate))
            .collect();
        eval::sort_records(&mut matched, &query.sort);
        matched
    }
}

impl<E> Repository<E> for InMemoryRepository<E>
where
    E: Queryable + HasIdentifier + Clone + Send + Sync,
{
    async fn find_by_id(&self, id: &E::Id) -> RepositoryResult<Option<E>> {
        Ok(self
            .snapshot()
            .into_iter()
            .find(|record| record.identifier().as_ref() == Some(id)))
    }

    async fn find_all(&self) -> RepositoryResult<Vec<E>> {
        Ok(self.snapshot())
    }

    async fn find_all_by_id(&self, ids: &[E::Id]) -> RepositoryResult<Vec<E>> {
        // Set semantics: duplicate ids in the input do not duplicate results.
        Ok(self
            .snapshot()
            .into_iter()
            .filter(|record| {
                record
                    .identifier()
                    .is_some_and(|id| ids.contains(&id))
            })
            .collect())
    }

    async fn save(&self, record: E) -> RepositoryResult<E> {
        let Some(id) = record.identifier() else {
            return Err(RepositoryError::constraint_violation(
                RepositoryOperation::Save,
                "record has no identifier",
            )
            .with_entity(E::schema().entity(), "<none>"));
        };
        self.with_write(|records| {
            match records
                .iter()
                .position(|existing| existing.identifier().as_ref() == Some(&id))
            {
                Some(index) => records[index] = record.clone(),
                None => records.push(record.clone()),
            }
        });
        Ok(record)
    }

    async fn save_all(&self, records: Vec<E>) -> RepositoryResult<Vec<E>> {
        let mut saved = Vec::with_capacity(records.len());
        for record in records {
            saved.push(self.save(record).await?);
        }
        Ok(saved)
    }

    async fn delete_by_id(&self, id: &E::Id) -> RepositoryResult<bool> {
        Ok(self.with_write(|records| {
            let before = records.len();
            records.retain(|record| record.identifier().as_ref() != Some(id));
            records.len() < before
        }))
    }

    async fn delete_many(&self, ids: &[E::Id]) -> RepositoryResult<u64> {
        Ok(self.with_write(|records| {
            let before = records.len();
            records.retain(|record| {
                !record
                    .identifier()
                    .is_some_and(|id| ids.contains(&id))
            });
            (before - records.len()) as u64
        }))
    }

    async fn delete_all(&self) -> RepositoryResult<u64> {
        Ok(self.with_write(|records| {
            let removed = records.len() as u64;
            records.clear();
            removed
        }))
    }

    async fn find_page(&self, page: &PageRequest) -> RepositoryResult<Page<E>> {
        Ok(Self::paginate(self.snapshot(), page))
    }

    async fn execute(&self, query: &Query) -> RepositoryResult<Vec<E>> {
        Ok(self.run_query(query))
    }

    async fn execute_page(&self, query: &Query, page: &PageRequest) -> RepositoryResult<Page<E>> {
        Ok(Self::paginate(self.run_query(query), page))
    }

    async fn execute_aggregate(
        &self,
        plan: &AggregatePlan,
    ) -> RepositoryResult<Vec<BTreeMap<String, FieldValue>>> {
        let snapshot = self.snapshot();
        let matched: Vec<&E> = snapshot
            .iter()
            .filter(|record| eval::matches(*record, &plan.predicate))
            .collect();
        Ok(eval::aggregate_records(&matched, plan))
    }

    async fn count(&self, query: &Query) -> RepositoryResult<u64> {
        Ok(self
            .snapshot()
            .iter()
            .filter(|record| eval::matches(*record, &query.predicate))
            .count() as u64)
    }

    async fn count_all(&self) -> RepositoryResult<u64> {
        Ok(self.snapshot().len() as u64)
    }

    async fn exists(&self, query: &Query) -> RepositoryResult<bool> {
        Ok(self
            .snapshot()
            .iter()
            .any(|record| eval::matches(record, &query.predicate)))
    }

    async fn exists_by_id(&self, id: &E::Id) -> RepositoryResult<bool> {
        Ok(self
            .snapshot()
            .iter()
            .any(|record| record.identifier().as_ref() == Some(id)))
    }
}
