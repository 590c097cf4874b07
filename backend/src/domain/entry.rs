//! Journal entries and the collections that hold them.
//!
//! Two collections share one entry shape. They differ only in which fields a
//! submission must carry and in the wire name of the free-text field, so the
//! form surface keeps `notes` while the journal surface keeps `content`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::validation::{ValidationError, reject_nul, validate_required};

/// Store-assigned entry identifier.
///
/// # Examples
/// ```
/// use journal_backend::domain::EntryId;
///
/// assert!(EntryId::parse("999").is_none());
/// let id = EntryId::generate();
/// assert_eq!(EntryId::parse(&id.to_string()), Some(id));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    /// Mint a fresh identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse a path segment. Anything that is not a UUID cannot name an
    /// entry, so it yields `None` rather than an error.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::from_str(raw.trim()).ok().map(Self)
    }

    /// Underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Logical collection an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryCollection {
    /// Submissions from the contact-style form (`/api/submit-form`).
    Forms,
    /// Journal entries (`/api/journal/entries`).
    Journal,
}

impl EntryCollection {
    /// Stable storage discriminator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Forms => "forms",
            Self::Journal => "journal",
        }
    }

    /// Fields a submission must carry, in the order they are reported.
    #[must_use]
    pub const fn required_fields(self) -> &'static [&'static str] {
        match self {
            Self::Forms => &["title", "date", "notes"],
            Self::Journal => &["date", "title", "content"],
        }
    }

    /// Wire name of the free-text field.
    #[must_use]
    pub const fn text_field(self) -> &'static str {
        match self {
            Self::Forms => "notes",
            Self::Journal => "content",
        }
    }

    /// File name used by the flat-file store.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Forms => "form-submissions.json",
            Self::Journal => "journal-entries.json",
        }
    }
}

impl fmt::Display for EntryCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated submission not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDraft {
    /// Entry title.
    pub title: String,
    /// Date string exactly as submitted.
    pub date: String,
    /// Free text (`notes` or `content` on the wire).
    pub content: String,
    /// Optional mood tag.
    pub mood: Option<String>,
}

impl EntryDraft {
    /// Validate a raw payload against `collection`'s required fields and
    /// extract the draft.
    ///
    /// Values are not type-checked: non-string scalars are kept as their
    /// JSON text.
    ///
    /// # Errors
    /// Returns [`ValidationError`] naming every missing required field, or
    /// the first text field holding a NUL character.
    ///
    /// # Examples
    /// ```
    /// use journal_backend::domain::{EntryCollection, EntryDraft};
    /// use serde_json::json;
    ///
    /// let payload = json!({"title": "Day 2"});
    /// let err = EntryDraft::from_payload(EntryCollection::Forms, payload.as_object().unwrap())
    ///     .unwrap_err();
    /// assert_eq!(err.missing_fields(), ["date", "notes"]);
    /// ```
    pub fn from_payload(
        collection: EntryCollection,
        payload: &Map<String, Value>,
    ) -> Result<Self, ValidationError> {
        validate_required(payload, collection.required_fields())?;
        let text = |field: &str| {
            reject_nul(field, payload.get(field).map(value_text).unwrap_or_default())
        };
        let mood = payload
            .get("mood")
            .filter(|value| !value.is_null())
            .map(|value| reject_nul("mood", value_text(value)))
            .transpose()?;
        Ok(Self {
            title: text("title")?,
            date: text("date")?,
            content: text(collection.text_field())?,
            mood,
        })
    }

    /// Assign an identifier and creation time, producing the stored form.
    #[must_use]
    pub fn stamp(self, clock: &dyn Clock) -> Entry {
        Entry {
            id: EntryId::generate(),
            title: self.title,
            date: self.date,
            content: self.content,
            mood: self.mood,
            timestamp: clock.utc(),
        }
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Persisted entry.
///
/// ## Invariants
/// - `id` is unique within its collection.
/// - `timestamp` is set once when the entry is stored and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Store-assigned identifier.
    pub id: EntryId,
    /// Entry title.
    pub title: String,
    /// Date string exactly as submitted.
    pub date: String,
    /// Free text.
    #[serde(alias = "notes")]
    pub content: String,
    /// Optional mood tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    /// Server-assigned creation time.
    pub timestamp: DateTime<Utc>,
}
