//! Driven port for entry persistence.
//!
//! Each repository instance is bound to one
//! [`EntryCollection`](crate::domain::EntryCollection); adapters translate
//! between their medium and [`Entry`] without applying validation.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tokio::sync::RwLock;

use crate::domain::{Entry, EntryDraft, EntryId};

/// Failures surfaced by entry store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntryRepositoryError {
    /// The backing medium could not be reached.
    #[error("entry store connection failed: {message}")]
    Connection {
        /// Adapter-specific description.
        message: String,
    },
    /// Reading or decoding stored entries failed.
    #[error("entry store query failed: {message}")]
    Query {
        /// Adapter-specific description.
        message: String,
    },
    /// Persisting a change failed.
    #[error("entry store write failed: {message}")]
    Write {
        /// Adapter-specific description.
        message: String,
    },
}

impl EntryRepositoryError {
    /// Helper for connectivity failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for read failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Helper for write failures.
    pub fn write(message: impl Into<String>) -> Self {
        Self::Write {
            message: message.into(),
        }
    }
}

/// Persistence port for one entry collection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EntryRepository: Send + Sync {
    /// Assign an identifier and timestamp to `draft`, store it, and return
    /// the stored entry.
    async fn create(&self, draft: EntryDraft) -> Result<Entry, EntryRepositoryError>;

    /// Every stored entry in a stable order; insertion order where the
    /// medium preserves it. Empty when nothing is stored.
    async fn list(&self) -> Result<Vec<Entry>, EntryRepositoryError>;

    /// Remove the entry named by `id`. Returns `false` when no such entry
    /// exists, leaving the store untouched.
    async fn delete(&self, id: &EntryId) -> Result<bool, EntryRepositoryError>;
}

/// Process-local store used for development and tests.
pub struct InMemoryEntryRepository {
    entries: RwLock<Vec<Entry>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryEntryRepository {
    /// Empty store stamping entries with `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            clock,
        }
    }
}

#[async_trait]
impl EntryRepository for InMemoryEntryRepository {
    async fn create(&self, draft: EntryDraft) -> Result<Entry, EntryRepositoryError> {
        let entry = draft.stamp(self.clock.as_ref());
        self.entries.write().await.push(entry.clone());
        Ok(entry)
    }

    async fn list(&self) -> Result<Vec<Entry>, EntryRepositoryError> {
        Ok(self.entries.read().await.clone())
    }

    async fn delete(&self, id: &EntryId) -> Result<bool, EntryRepositoryError> {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|entry| entry.id != *id);
        Ok(entries.len() != before)
    }
}
