//! Shared HTTP adapter state.
//!
//! Handlers receive this via `web::Data` and only see domain services and
//! ports, so they stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::TokenVerifier;
use crate::domain::EntryService;

/// Whether journal routes demand a bearer token.
#[derive(Clone)]
pub enum AuthPolicy {
    /// Journal routes are open.
    Disabled,
    /// Every journal request must carry a token accepted by the verifier.
    Required(Arc<dyn TokenVerifier>),
}

impl AuthPolicy {
    /// `true` when tokens are checked.
    #[must_use]
    pub fn is_required(&self) -> bool {
        matches!(self, Self::Required(_))
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Form submissions (`/api/submit-form`).
    pub forms: EntryService,
    /// Journal entries (`/api/journal/entries`).
    pub journal: EntryService,
    /// Guard applied to the journal routes.
    pub auth: AuthPolicy,
    /// Backend label reported by `/api/health`.
    pub store: &'static str,
}

impl HttpState {
    /// Bundle one service per collection.
    pub fn new(
        forms: EntryService,
        journal: EntryService,
        auth: AuthPolicy,
        store: &'static str,
    ) -> Self {
        Self {
            forms,
            journal,
            auth,
            store,
        }
    }
}
