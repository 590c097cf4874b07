//! Domain types and use-cases.
//!
//! Purpose: keep entry semantics, validation and the auth failure taxonomy
//! free of HTTP and storage concerns. Inbound adapters translate requests into
//! these types; outbound adapters implement [`ports`].
//!
//! Public surface:
//! - [`Entry`], [`EntryDraft`], [`EntryId`], [`EntryCollection`]: the stored
//!   record and its lifecycle.
//! - [`EntryService`]: validate-then-persist use-cases per collection.
//! - [`validate_required`]: required-field check over raw payloads.
//! - [`AuthError`], [`BearerToken`], [`Caller`]: auth guard primitives.
//! - [`Error`], [`ErrorCode`]: transport-agnostic failures.

pub mod auth;
pub mod entry;
pub mod entry_service;
pub mod error;
pub mod ports;
pub mod trace_id;
pub mod validation;

pub use self::auth::{AuthError, BearerToken, Caller};
pub use self::entry::{Entry, EntryCollection, EntryDraft, EntryId};
pub use self::entry_service::EntryService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::trace_id::TraceId;
pub use self::validation::{ValidationError, reject_nul, validate_required};
