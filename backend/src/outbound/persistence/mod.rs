//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! This module provides concrete implementations of the domain repository
//! ports backed by PostgreSQL via the Diesel ORM with async support through
//! `diesel-async` and `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: repository implementations only translate between
//!   Diesel models and domain types. No business logic resides here, with
//!   one deliberate exception: transactional boundaries. Creation persists a
//!   wash record with both image rows atomically, and an update applies the
//!   whole reconciliation plan inside one transaction.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) are implementation details, never exposed to
//!   the domain layer.
//! - **Strongly typed errors**: all database errors are mapped to domain
//!   persistence error types.

mod diesel_account_repository;
pub(crate) mod diesel_error_mapping;
mod diesel_wash_repository;
mod models;
mod pool;
mod schema;

pub use diesel_account_repository::DieselAccountRepository;
pub use diesel_wash_repository::DieselWashRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
