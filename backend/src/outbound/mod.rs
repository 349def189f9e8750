//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **http**: reqwest-backed relay and `$ref` document fetching
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod http;
pub mod persistence;
