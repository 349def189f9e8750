//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations only translate between Diesel rows and domain
//! records. Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//! private to this module. Connections come from a `bb8` pool driven by
//! `diesel-async`.
//!
//! # Example
//!
//! ```ignore
//! use schemaforge::outbound::persistence::{DbPool, DieselProjectRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/schemaforge")).await?;
//! let projects = DieselProjectRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_documentation_repository;
mod diesel_project_repository;
mod models;
mod pool;
mod schema;

pub use diesel_documentation_repository::DieselDocumentationRepository;
pub use diesel_project_repository::DieselProjectRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
