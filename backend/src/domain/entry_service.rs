//! Entry use-cases: validate, persist, list and delete.
//!
//! Handlers call this service rather than the repository so validation and
//! the mapping from storage failures to [`Error`] live in one place.

use std::sync::Arc;

use serde_json::{Map, Value, json};
use tracing::{error, info};

use super::ports::{EntryRepository, EntryRepositoryError};
use super::{Entry, EntryCollection, EntryDraft, EntryId, Error, ValidationError};

/// Use-case service for one entry collection.
#[derive(Clone)]
pub struct EntryService {
    collection: EntryCollection,
    repository: Arc<dyn EntryRepository>,
}

impl EntryService {
    /// Bind the service to `collection`, persisting through `repository`.
    pub fn new(collection: EntryCollection, repository: Arc<dyn EntryRepository>) -> Self {
        Self {
            collection,
            repository,
        }
    }

    /// Collection this service manages.
    #[must_use]
    pub fn collection(&self) -> EntryCollection {
        self.collection
    }

    /// Validate `payload` and store it as a new entry.
    ///
    /// # Errors
    /// [`ErrorCode::InvalidRequest`](super::ErrorCode::InvalidRequest) naming
    /// the missing fields, or an internal error when the store fails. Nothing
    /// is persisted when validation fails.
    pub async fn submit(&self, payload: &Map<String, Value>) -> Result<Entry, Error> {
        let draft = EntryDraft::from_payload(self.collection, payload)
            .map_err(|err| validation_error(&err))?;
        let entry = self
            .repository
            .create(draft)
            .await
            .map_err(|err| self.storage_error("create", &err))?;
        info!(collection = %self.collection, entry_id = %entry.id, "entry stored");
        Ok(entry)
    }

    /// All stored entries in store order.
    ///
    /// # Errors
    /// Internal error when the store fails.
    pub async fn list(&self) -> Result<Vec<Entry>, Error> {
        self.repository
            .list()
            .await
            .map_err(|err| self.storage_error("list", &err))
    }

    /// Delete the entry named by the raw path segment `raw_id`.
    ///
    /// # Errors
    /// [`ErrorCode::NotFound`](super::ErrorCode::NotFound) when no entry
    /// matches (including identifiers that are not UUIDs), or an internal
    /// error when the store fails.
    pub async fn delete(&self, raw_id: &str) -> Result<EntryId, Error> {
        let Some(id) = EntryId::parse(raw_id) else {
            return Err(entry_not_found(raw_id));
        };
        let removed = self
            .repository
            .delete(&id)
            .await
            .map_err(|err| self.storage_error("delete", &err))?;
        if !removed {
            return Err(entry_not_found(raw_id));
        }
        info!(collection = %self.collection, entry_id = %id, "entry deleted");
        Ok(id)
    }

    fn storage_error(&self, operation: &'static str, err: &EntryRepositoryError) -> Error {
        error!(collection = %self.collection, operation, error = %err, "entry store failure");
        Error::internal(format!("failed to {operation} entries"))
    }
}

fn validation_error(err: &ValidationError) -> Error {
    let details = match err {
        ValidationError::MissingFields(missing) => json!({
            "code": "missing_field",
            "missingFields": missing,
        }),
        ValidationError::NulCharacter { field } => json!({
            "code": "invalid_character",
            "field": field,
        }),
    };
    Error::invalid_request(err.to_string()).with_details(details)
}

fn entry_not_found(raw_id: &str) -> Error {
    Error::not_found("Entry not found").with_details(json!({ "id": raw_id }))
}
