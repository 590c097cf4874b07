//! PostgreSQL persistence adapters using Diesel.
//!
//! Row structs and the table definition stay private to this module; the
//! rest of the crate sees only [`DieselEntryRepository`] and the pool.
//!
//! ```ignore
//! let config = PoolConfig::new("postgres://localhost/journal");
//! run_pending_migrations(config.database_url()).await?;
//! let pool = DbPool::connect(&config).await?;
//! let forms = DieselEntryRepository::new(pool, EntryCollection::Forms, clock);
//! ```

mod diesel_entry_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_entry_repository::DieselEntryRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
