//! PostgreSQL-backed `EntryRepository` using Diesel.
//!
//! All collections share the `journal_entries` table; each repository
//! instance filters on its own collection discriminator. Single inserts and
//! deletes rely on the database for atomicity.

use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use mockable::Clock;
use tracing::debug;

use super::models::{EntryRow, NewEntryRow};
use super::pool::{DbPool, PoolError};
use super::schema::journal_entries;
use crate::domain::ports::{EntryRepository, EntryRepositoryError};
use crate::domain::{Entry, EntryCollection, EntryDraft, EntryId};

/// Diesel implementation of [`EntryRepository`].
#[derive(Clone)]
pub struct DieselEntryRepository {
    pool: DbPool,
    collection: EntryCollection,
    clock: Arc<dyn Clock>,
}

impl DieselEntryRepository {
    /// Repository for `collection` over `pool`.
    pub fn new(pool: DbPool, collection: EntryCollection, clock: Arc<dyn Clock>) -> Self {
        Self {
            pool,
            collection,
            clock,
        }
    }
}

fn map_pool_error(error: PoolError) -> EntryRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            EntryRepositoryError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> EntryRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    if let DieselError::DatabaseError(kind, info) = &error {
        debug!(?kind, message = info.message(), "diesel operation failed");
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            EntryRepositoryError::connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            EntryRepositoryError::write("duplicate entry identifier")
        }
        DieselError::DeserializationError(_) => {
            EntryRepositoryError::query("stored entry could not be decoded")
        }
        _ => EntryRepositoryError::query("database error"),
    }
}

#[async_trait]
impl EntryRepository for DieselEntryRepository {
    async fn create(&self, draft: EntryDraft) -> Result<Entry, EntryRepositoryError> {
        let entry = draft.stamp(self.clock.as_ref());
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(journal_entries::table)
            .values(NewEntryRow::new(&entry, self.collection))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(entry)
    }

    async fn list(&self) -> Result<Vec<Entry>, EntryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<EntryRow> = journal_entries::table
            .filter(journal_entries::collection.eq(self.collection.as_str()))
            .order(journal_entries::seq.asc())
            .select(EntryRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Entry::from).collect())
    }

    async fn delete(&self, id: &EntryId) -> Result<bool, EntryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(
            journal_entries::table
                .filter(journal_entries::id.eq(*id.as_uuid()))
                .filter(journal_entries::collection.eq(self.collection.as_str())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }
}
