//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories implement the domain storage ports on top of `diesel-async`
//! with `bb8` pooling. Row structs (`models.rs`) and table definitions
//! (`schema.rs`) stay private to this module; callers only see domain types
//! and port errors.
//!
//! # Example
//!
//! ```no_run
//! # async fn wire() -> Result<(), Box<dyn std::error::Error>> {
//! use devevent::outbound::persistence::{DbPool, DieselEventRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/devevent")).await?;
//! let _events = DieselEventRepository::new(pool);
//! # Ok(())
//! # }
//! ```

mod diesel_basic_error_mapping;
mod diesel_booking_repository;
mod diesel_event_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_booking_repository::DieselBookingRepository;
pub use diesel_event_repository::DieselEventRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
