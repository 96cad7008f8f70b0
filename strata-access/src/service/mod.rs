//! CRUD orchestration
//!
//! [`DataService`] is the engine's public operation surface: one generic
//! component per entity, built from its repository, mapper, and
//! configuration.

mod base;

pub use base::DataService;
