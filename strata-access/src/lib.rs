//! # strata-access
//!
//! Generic data-access framework: one reusable engine exposing CRUD, bulk,
//! paginated, filtered, and aggregate operations over any record type,
//! without per-entity boilerplate.
//!
//! ## How it fits together
//!
//! - [`filter`] — the wire-serializable query DSL (conditions, operators,
//!   sort specs, aggregate/group-by requests); pure data.
//! - [`schema`] — per-record-type field registries; the [`schema::Queryable`]
//!   trait exposes field values by name.
//! - [`coerce`] — converts raw wire values into the target field's type.
//! - [`query`] — translates the DSL into executable predicate trees and
//!   aggregate plans.
//! - [`repository`] — the store abstraction consuming those artifacts, plus
//!   an in-memory reference backend.
//! - [`service`] — the generic CRUD orchestrator composing a repository, a
//!   [`mapper::EntityMapper`], and configuration into the full operation
//!   surface for one entity.
//!
//! ## Example
//!
//! ```rust
//! use once_cell::sync::Lazy;
//! use strata_access::prelude::*;
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Task {
//!     id: Option<i64>,
//!     title: String,
//!     done: bool,
//! }
//!
//! static TASK_SCHEMA: Lazy<Schema> = Lazy::new(|| {
//!     Schema::builder("Task")
//!         .field("id", FieldType::Integer)
//!         .field("title", FieldType::Text)
//!         .field("done", FieldType::Boolean)
//!         .build()
//! });
//!
//! impl Queryable for Task {
//!     fn schema() -> &'static Schema {
//!         &TASK_SCHEMA
//!     }
//!
//!     fn field(&self, name: &str) -> Option<FieldValue> {
//!         match name {
//!             "id" => Some(self.id.map_or(FieldValue::Null, FieldValue::Integer)),
//!             "title" => Some(FieldValue::Text(self.title.clone())),
//!             "done" => Some(FieldValue::Boolean(self.done)),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! impl HasIdentifier for Task {
//!     type Id = i64;
//!
//!     fn identifier(&self) -> Option<i64> {
//!         self.id
//!     }
//!
//!     fn set_identifier(&mut self, id: i64) {
//!         self.id = Some(id);
//!     }
//! }
//!
//! // Record and DTO coincide here; real wirings map between distinct types.
//! struct TaskMapper;
//!
//! impl EntityMapper<Task, Task> for TaskMapper {
//!     fn to_dto(&self, record: Task) -> Task {
//!         record
//!     }
//!
//!     fn to_record(&self, dto: Task) -> Task {
//!         dto
//!     }
//! }
//!
//! let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! runtime.block_on(async {
//!     let service = DataService::new(InMemoryRepository::new(), TaskMapper);
//!     service
//!         .save(Task { id: Some(1), title: "write docs".into(), done: false })
//!         .await
//!         .unwrap();
//!
//!     let open = FilterRequest::new().condition(FilterCondition::eq("done", false));
//!     assert_eq!(service.count_filtered(&open).await.unwrap(), 1);
//! });
//! ```

pub mod coerce;
pub mod config;
pub mod error;
pub mod filter;
pub mod identity;
pub mod mapper;
pub mod observability;
pub mod page;
pub mod query;
pub mod repository;
pub mod schema;
pub mod service;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{AccessConfig, EngineConfig};
    pub use crate::error::{AccessError, Result};
    pub use crate::filter::{
        AggregateFunction, AggregateRequest, Aggregation, FilterCondition, FilterOperator,
        FilterRequest, GroupByRequest, LogicalOperator, SortDirection, SortOrder,
    };
    pub use crate::identity::HasIdentifier;
    pub use crate::mapper::EntityMapper;
    pub use crate::observability::init_tracing;
    pub use crate::page::{Page, PageRequest};
    pub use crate::query::{translate, Predicate, Query};
    pub use crate::repository::{
        InMemoryRepository, Repository, RepositoryError, RepositoryErrorKind, RepositoryOperation,
        RepositoryResult,
    };
    pub use crate::schema::{FieldType, FieldValue, Queryable, Schema};
    pub use crate::service::DataService;
}
