//! Wire shapes for the entry endpoints, plus OpenAPI schemas for domain
//! types that stay free of utoipa.
//!
//! The two surfaces expose one [`Entry`] under different text-field names:
//! `notes` for form submissions, `content` for journal entries.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::Entry;

/// Stored form submission as returned by `GET /api/submit-form`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FormEntryBody {
    /// Store-assigned identifier.
    pub id: Uuid,
    /// Entry title.
    #[schema(example = "Day 1")]
    pub title: String,
    /// Date exactly as submitted.
    #[schema(example = "2024-01-01")]
    pub date: String,
    /// Free text.
    #[schema(example = "Arrived")]
    pub notes: String,
    /// Optional mood tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    /// Server-assigned creation time.
    pub timestamp: DateTime<Utc>,
}

impl From<Entry> for FormEntryBody {
    fn from(entry: Entry) -> Self {
        Self {
            id: *entry.id.as_uuid(),
            title: entry.title,
            date: entry.date,
            notes: entry.content,
            mood: entry.mood,
            timestamp: entry.timestamp,
        }
    }
}

/// Stored journal entry as returned by the journal endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct JournalEntryBody {
    /// Store-assigned identifier.
    pub id: Uuid,
    /// Entry title.
    #[schema(example = "Day 1")]
    pub title: String,
    /// Date exactly as submitted.
    #[schema(example = "2024-01-01")]
    pub date: String,
    /// Free text.
    #[schema(example = "Arrived in Lisbon")]
    pub content: String,
    /// Optional mood tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "happy")]
    pub mood: Option<String>,
    /// Server-assigned creation time.
    pub timestamp: DateTime<Utc>,
}

impl From<Entry> for JournalEntryBody {
    fn from(entry: Entry) -> Self {
        Self {
            id: *entry.id.as_uuid(),
            title: entry.title,
            date: entry.date,
            content: entry.content,
            mood: entry.mood,
            timestamp: entry.timestamp,
        }
    }
}

/// `POST /api/submit-form` success body.
#[derive(Debug, Serialize, ToSchema)]
pub struct SubmittedBody {
    /// Always `true`.
    pub success: bool,
    /// Confirmation text.
    #[schema(example = "Form submitted successfully")]
    pub message: &'static str,
    /// Identifier of the stored submission.
    pub id: Uuid,
}

/// `GET /api/submit-form` success body.
#[derive(Debug, Serialize, ToSchema)]
pub struct FormEntriesBody {
    /// Always `true`.
    pub success: bool,
    /// Stored submissions in store order.
    pub entries: Vec<FormEntryBody>,
}

/// `GET /api/journal/entries` success body.
#[derive(Debug, Serialize, ToSchema)]
pub struct JournalEntriesBody {
    /// Always `true`.
    pub success: bool,
    /// Stored entries in store order.
    pub entries: Vec<JournalEntryBody>,
}

/// `POST /api/journal/entries` success body.
#[derive(Debug, Serialize, ToSchema)]
pub struct JournalEntryCreatedBody {
    /// Always `true`.
    pub success: bool,
    /// The stored entry.
    pub entry: JournalEntryBody,
}

/// Success body carrying only a confirmation message.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageBody {
    /// Always `true`.
    pub success: bool,
    /// Confirmation text.
    #[schema(example = "Entry deleted successfully")]
    pub message: &'static str,
}

/// Request body for `POST /api/submit-form`.
///
/// Documentation only: handlers accept any JSON object and report missing
/// fields themselves. Values need not be strings.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct FormSubmissionSchema {
    #[schema(example = "Day 1")]
    title: String,
    #[schema(example = "2024-01-01")]
    date: String,
    #[schema(example = "Arrived")]
    notes: String,
    mood: Option<String>,
}

/// Request body for `POST /api/journal/entries`.
///
/// Documentation only, as for [`FormSubmissionSchema`].
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct JournalSubmissionSchema {
    #[schema(example = "2024-01-01")]
    date: String,
    #[schema(example = "Day 1")]
    title: String,
    #[schema(example = "Arrived in Lisbon")]
    content: String,
    #[schema(example = "happy")]
    mood: Option<String>,
}

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// No such entry.
    #[schema(rename = "not_found")]
    NotFound,
    /// Signing keys could not be fetched.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for the error envelope every failure returns.
#[derive(ToSchema)]
#[schema(as = ErrorEnvelope, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorEnvelopeSchema {
    /// Always `false`.
    #[schema(example = false)]
    success: bool,
    /// Stable machine-readable error code.
    code: ErrorCodeSchema,
    /// Human-readable message.
    #[schema(example = "Missing required fields: date, notes")]
    message: String,
    /// Supplementary details, such as the missing field names.
    details: Option<serde_json::Value>,
    /// Correlation identifier echoed in the `trace-id` header.
    #[schema(example = "6f9619ff-8b86-d011-b42d-00c04fc964ff")]
    trace_id: Option<String>,
}
