//! Generic CRUD orchestrator
//!
//! [`DataService`] composes a [`Repository`], an [`EntityMapper`], and the
//! engine configuration into the full data-access surface for one entity:
//! CRUD, bulk, paginated, filtered, and aggregate operations, without
//! per-entity code. Each concrete entity wiring is a value constructed from
//! its collaborators, not a subclass.
//!
//! Every operation funnels through one instrumentation wrapper that emits
//! structured attempt/success/failure events keyed by entity and operation
//! name; store errors are wrapped exactly once into
//! [`AccessError::Operation`] so backend error types never reach callers.
//!
//! The service keeps no state between calls. Correctness under concurrent
//! writes is delegated to the store: in particular, `update` checks existence
//! and then writes without engine-level locking, so a concurrent delete
//! between the two steps surfaces as a store-level failure rather than a
//! clean [`AccessError::NotFound`].

use std::collections::{BTreeMap, HashSet};
use std::fmt::Display;
use std::future::Future;
use std::marker::PhantomData;

use serde_json::Value;
use tracing::{error, info, warn};

use crate::config::EngineConfig;
use crate::error::{AccessError, Result};
use crate::filter::{AggregateRequest, FilterCondition, FilterRequest, GroupByRequest};
use crate::identity::HasIdentifier;
use crate::mapper::EntityMapper;
use crate::page::{Page, PageRequest};
use crate::query::{plan_aggregate, plan_group_by, translate};
use crate::repository::Repository;
use crate::schema::{FieldValue, Queryable};

/// Generic data-access service for one record/DTO pair
///
/// # Example
///
/// ```rust,ignore
/// let service = DataService::new(InMemoryRepository::new(), EmployeeMapper);
/// let saved = service.save(dto).await?;
/// let found = service.find_by_id(saved.id.unwrap()).await?;
/// ```
pub struct DataService<R, M, E, D> {
    repository: R,
    mapper: M,
    config: EngineConfig,
    entity: &'static str,
    _types: PhantomData<fn() -> (E, D)>,
}

impl<R, M, E, D> DataService<R, M, E, D>
where
    R: Repository<E>,
    M: EntityMapper<E, D>,
    E: Queryable + HasIdentifier,
    D: HasIdentifier<Id = E::Id>,
{
    /// Create a service with the default engine configuration
    pub fn new(repository: R, mapper: M) -> Self {
        Self {
            repository,
            mapper,
            config: EngineConfig::default(),
            entity: E::schema().entity(),
            _types: PhantomData,
        }
    }

    /// Replace the engine configuration
    #[must_use]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// The entity name this service operates on
    #[must_use]
    pub fn entity(&self) -> &'static str {
        self.entity
    }

    /// Borrow the underlying repository
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Persist a DTO and return its saved representation
    pub async fn save(&self, dto: D) -> Result<D> {
        self.run("save", "", async {
            let record = self.mapper.to_record(dto);
            let saved = self
                .repository
                .save(record)
                .await
                .map_err(AccessError::operation("save"))?;
            Ok(self.mapper.to_dto(saved))
        })
        .await
    }

    /// Persist a batch of DTOs
    ///
    /// One log/report unit; atomicity is whatever the store provides.
    pub async fn save_all(&self, dtos: Vec<D>) -> Result<Vec<D>> {
        self.run("save_all", format!("count={}", dtos.len()), async {
            let records = self.mapper.to_record_list(dtos);
            let saved = self
                .repository
                .save_all(records)
                .await
                .map_err(AccessError::operation("save_all"))?;
            Ok(self.mapper.to_dto_list(saved))
        })
        .await
    }

    /// Overwrite the record with the given identifier
    ///
    /// Verifies existence first ([`AccessError::NotFound`] on a miss), then
    /// force-sets the resolved identifier on the mapped record so the DTO
    /// content cannot redirect the write to a different key.
    pub async fn update(&self, id: E::Id, dto: D) -> Result<D> {
        self.run("update", format!("id={id}"), self.perform_update("update", id, dto))
            .await
    }

    /// Overwrite a record, extracting the identifier from the DTO
    ///
    /// Fails with [`AccessError::MissingIdentifier`] when the DTO carries no
    /// identifier.
    pub async fn update_from(&self, dto: D) -> Result<D> {
        self.run("update", "id=<from dto>", async {
            let id = dto.identifier().ok_or(AccessError::MissingIdentifier {
                entity: self.entity,
            })?;
            self.perform_update("update", id, dto).await
        })
        .await
    }

    /// Best-effort bulk update
    ///
    /// Identifiers are extracted from every DTO; elements without one, and
    /// elements whose record no longer exists, are skipped with a warning —
    /// never retried, never aborting the batch. Existing records are checked
    /// with a single batched lookup. The returned list can therefore be
    /// shorter than the input; callers detecting skips must diff identifiers.
    pub async fn update_all(&self, dtos: Vec<D>) -> Result<Vec<D>> {
        self.run("update_all", format!("count={}", dtos.len()), async {
            let keyed: Vec<(Option<E::Id>, D)> =
                dtos.into_iter().map(|dto| (dto.identifier(), dto)).collect();
            let ids: Vec<E::Id> = keyed.iter().filter_map(|(id, _)| id.clone()).collect();
            let existing: HashSet<E::Id> = if ids.is_empty() {
                HashSet::new()
            } else {
                self.repository
                    .find_all_by_id(&ids)
                    .await
                    .map_err(AccessError::operation("update_all"))?
                    .iter()
                    .filter_map(HasIdentifier::identifier)
                    .collect()
            };

            let mut updates = Vec::with_capacity(keyed.len());
            for (maybe_id, dto) in keyed {
                let Some(id) = maybe_id else {
                    warn!(
                        entity = self.entity,
                        "skipping bulk update element without an identifier"
                    );
                    continue;
                };
                if !existing.contains(&id) {
                    warn!(
                        entity = self.entity,
                        id = %id,
                        "skipping bulk update for missing record"
                    );
                    continue;
                }
                let mut record = self.mapper.to_record(dto);
                record.set_identifier(id);
                updates.push(record);
            }

            if updates.is_empty() {
                return Ok(Vec::new());
            }
            let saved = self
                .repository
                .save_all(updates)
                .await
                .map_err(AccessError::operation("update_all"))?;
            Ok(self.mapper.to_dto_list(saved))
        })
        .await
    }

    /// Find a record by identifier
    pub async fn find_by_id(&self, id: E::Id) -> Result<D> {
        self.run("find_by_id", format!("id={id}"), async {
            let record = self.require_record(&id, "find_by_id").await?;
            Ok(self.mapper.to_dto(record))
        })
        .await
    }

    /// Read all records
    pub async fn find_all(&self) -> Result<Vec<D>> {
        self.run("find_all", "", async {
            let records = self
                .repository
                .find_all()
                .await
                .map_err(AccessError::operation("find_all"))?;
            Ok(self.mapper.to_dto_list(records))
        })
        .await
    }

    /// Read all records in the identifier set
    ///
    /// An empty input yields an empty result without querying the store.
    pub async fn find_multi(&self, ids: &[E::Id]) -> Result<Vec<D>> {
        self.run("find_multi", format!("count={}", ids.len()), async {
            if ids.is_empty() {
                warn!(entity = self.entity, "find_multi called without identifiers");
                return Ok(Vec::new());
            }
            let records = self
                .repository
                .find_all_by_id(ids)
                .await
                .map_err(AccessError::operation("find_multi"))?;
            Ok(self.mapper.to_dto_list(records))
        })
        .await
    }

    /// Delete a record by identifier, returning its last representation
    pub async fn delete_by_id(&self, id: E::Id) -> Result<D> {
        self.run("delete_by_id", format!("id={id}"), async {
            let record = self.require_record(&id, "delete_by_id").await?;
            self.repository
                .delete_by_id(&id)
                .await
                .map_err(AccessError::operation("delete_by_id"))?;
            Ok(self.mapper.to_dto(record))
        })
        .await
    }

    /// Delete all records in the identifier set, returning what was deleted
    ///
    /// Unknown identifiers are ignored; an empty input or an empty batch
    /// lookup yields an empty result.
    pub async fn delete_multi(&self, ids: &[E::Id]) -> Result<Vec<D>> {
        self.run("delete_multi", format!("count={}", ids.len()), async {
            if ids.is_empty() {
                warn!(entity = self.entity, "delete_multi called without identifiers");
                return Ok(Vec::new());
            }
            let records = self
                .repository
                .find_all_by_id(ids)
                .await
                .map_err(AccessError::operation("delete_multi"))?;
            if records.is_empty() {
                warn!(entity = self.entity, "delete_multi matched no records");
                return Ok(Vec::new());
            }
            let found: Vec<E::Id> = records.iter().filter_map(HasIdentifier::identifier).collect();
            self.repository
                .delete_many(&found)
                .await
                .map_err(AccessError::operation("delete_multi"))?;
            Ok(self.mapper.to_dto_list(records))
        })
        .await
    }

    /// Delete every record; `true` signals completion
    pub async fn delete_all(&self) -> Result<bool> {
        self.run("delete_all", "", async {
            self.repository
                .delete_all()
                .await
                .map_err(AccessError::operation("delete_all"))?;
            Ok(true)
        })
        .await
    }

    /// Read one page of records in store order
    pub async fn find_page(&self, page: &PageRequest) -> Result<Page<D>> {
        self.run("find_page", format!("page={}", page.page_number()), async {
            let normalized = self.normalize(page);
            let records = self
                .repository
                .find_page(&normalized)
                .await
                .map_err(AccessError::operation("find_page"))?;
            Ok(self.mapper.to_dto_page(records))
        })
        .await
    }

    /// Read all records matching a filter request
    pub async fn find_filtered(&self, filter: &FilterRequest) -> Result<Vec<D>> {
        self.run("find_filtered", format!("conditions={}", filter.conditions.len()), async {
            let query = translate(filter, E::schema())?;
            let records = self
                .repository
                .execute(&query)
                .await
                .map_err(AccessError::operation("find_filtered"))?;
            Ok(self.mapper.to_dto_list(records))
        })
        .await
    }

    /// Read one page of records matching a filter request
    pub async fn find_filtered_page(
        &self,
        filter: &FilterRequest,
        page: &PageRequest,
    ) -> Result<Page<D>> {
        self.run(
            "find_filtered_page",
            format!("conditions={} page={}", filter.conditions.len(), page.page_number()),
            async {
                let query = translate(filter, E::schema())?;
                let normalized = self.normalize(page);
                let records = self
                    .repository
                    .execute_page(&query, &normalized)
                    .await
                    .map_err(AccessError::operation("find_filtered_page"))?;
                Ok(self.mapper.to_dto_page(records))
            },
        )
        .await
    }

    /// Count records matching a filter request
    pub async fn count_filtered(&self, filter: &FilterRequest) -> Result<u64> {
        self.run("count_filtered", format!("conditions={}", filter.conditions.len()), async {
            let query = translate(filter, E::schema())?;
            self.repository
                .count(&query)
                .await
                .map_err(AccessError::operation("count_filtered"))
        })
        .await
    }

    /// Whether any record matches a filter request
    pub async fn exists_filtered(&self, filter: &FilterRequest) -> Result<bool> {
        self.run("exists_filtered", format!("conditions={}", filter.conditions.len()), async {
            let query = translate(filter, E::schema())?;
            self.repository
                .exists(&query)
                .await
                .map_err(AccessError::operation("exists_filtered"))
        })
        .await
    }

    /// Find at most one record whose field equals the raw value
    ///
    /// Built on the translation pipeline, so field resolution and value
    /// coercion behave exactly as in [`Self::find_filtered`].
    pub async fn find_one_by_field(&self, field: &str, value: Value) -> Result<Option<D>> {
        self.run("find_one_by_field", format!("field={field}"), async {
            let filter = FilterRequest::new().condition(FilterCondition::eq(field, value));
            let query = translate(&filter, E::schema())?;
            let records = self
                .repository
                .execute(&query)
                .await
                .map_err(AccessError::operation("find_one_by_field"))?;
            Ok(records.into_iter().next().map(|record| self.mapper.to_dto(record)))
        })
        .await
    }

    /// Find all records whose field equals the raw value
    pub async fn find_all_by_field(&self, field: &str, value: Value) -> Result<Vec<D>> {
        self.run("find_all_by_field", format!("field={field}"), async {
            let filter = FilterRequest::new().condition(FilterCondition::eq(field, value));
            let query = translate(&filter, E::schema())?;
            let records = self
                .repository
                .execute(&query)
                .await
                .map_err(AccessError::operation("find_all_by_field"))?;
            Ok(self.mapper.to_dto_list(records))
        })
        .await
    }

    /// Count all records
    pub async fn count(&self) -> Result<u64> {
        self.run("count", "", async {
            self.repository
                .count_all()
                .await
                .map_err(AccessError::operation("count"))
        })
        .await
    }

    /// Whether a record with the identifier exists
    pub async fn exists_by_id(&self, id: E::Id) -> Result<bool> {
        self.run("exists_by_id", format!("id={id}"), async {
            self.repository
                .exists_by_id(&id)
                .await
                .map_err(AccessError::operation("exists_by_id"))
        })
        .await
    }

    /// Compute scalar aggregates over an optionally filtered row set
    ///
    /// Result keys are `"{field}_{FUNCTION}"`, e.g. `salary_SUM`.
    pub async fn aggregate(
        &self,
        request: &AggregateRequest,
    ) -> Result<BTreeMap<String, FieldValue>> {
        self.run("aggregate", format!("aggregations={}", request.aggregations.len()), async {
            let plan = plan_aggregate(request, E::schema())?;
            let rows = self
                .repository
                .execute_aggregate(&plan)
                .await
                .map_err(AccessError::operation("aggregate"))?;
            Ok(rows.into_iter().next().unwrap_or_default())
        })
        .await
    }

    /// Compute grouped aggregates, one result map per distinct group
    ///
    /// Each map carries the group-key values under their field names plus the
    /// aggregate keys.
    pub async fn group_by(
        &self,
        request: &GroupByRequest,
    ) -> Result<Vec<BTreeMap<String, FieldValue>>> {
        self.run("group_by", format!("groups={}", request.group_by_fields.len()), async {
            let plan = plan_group_by(request, E::schema())?;
            self.repository
                .execute_aggregate(&plan)
                .await
                .map_err(AccessError::operation("group_by"))
        })
        .await
    }

    async fn perform_update(&self, operation: &'static str, id: E::Id, dto: D) -> Result<D> {
        self.require_record(&id, operation).await?;
        let mut record = self.mapper.to_record(dto);
        record.set_identifier(id);
        let saved = self
            .repository
            .save(record)
            .await
            .map_err(AccessError::operation(operation))?;
        Ok(self.mapper.to_dto(saved))
    }

    async fn require_record(&self, id: &E::Id, operation: &'static str) -> Result<E> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(AccessError::operation(operation))?
            .ok_or_else(|| AccessError::NotFound {
                entity: self.entity,
                id: id.to_string(),
            })
    }

    fn normalize(&self, page: &PageRequest) -> PageRequest {
        PageRequest {
            page: Some(page.page_number()),
            size: Some(page.effective_size(&self.config)),
        }
    }

    /// Uniform attempt/success/failure instrumentation for every operation
    async fn run<T>(
        &self,
        operation: &'static str,
        detail: impl Display,
        fut: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        info!(entity = self.entity, operation, detail = %detail, "operation attempt");
        match fut.await {
            Ok(value) => {
                info!(entity = self.entity, operation, "operation succeeded");
                Ok(value)
            }
            Err(err) => {
                error!(entity = self.entity, operation, error = %err, "operation failed");
                Err(err)
            }
        }
    }
}
