//! Internal Diesel row structs.
//!
//! Rows never leave the persistence module; the repository converts them to
//! and from [`Entry`].

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::journal_entries;
use crate::domain::{Entry, EntryCollection, EntryId};

/// Row read back from `journal_entries`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = journal_entries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EntryRow {
    pub id: Uuid,
    pub title: String,
    pub entry_date: String,
    pub content: String,
    pub mood: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<EntryRow> for Entry {
    fn from(row: EntryRow) -> Self {
        Self {
            id: EntryId::from_uuid(row.id),
            title: row.title,
            date: row.entry_date,
            content: row.content,
            mood: row.mood,
            timestamp: row.created_at,
        }
    }
}

/// Insertable row; `seq` is left to the database.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = journal_entries)]
pub(crate) struct NewEntryRow<'a> {
    pub id: Uuid,
    pub collection: &'a str,
    pub title: &'a str,
    pub entry_date: &'a str,
    pub content: &'a str,
    pub mood: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}

impl<'a> NewEntryRow<'a> {
    pub(crate) fn new(entry: &'a Entry, collection: EntryCollection) -> Self {
        Self {
            id: *entry.id.as_uuid(),
            collection: collection.as_str(),
            title: entry.title.as_str(),
            entry_date: entry.date.as_str(),
            content: entry.content.as_str(),
            mood: entry.mood.as_deref(),
            created_at: entry.timestamp,
        }
    }
}
