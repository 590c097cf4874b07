//! Driven port for bearer-token verification.

use async_trait::async_trait;

use crate::domain::{AuthError, BearerToken, Caller};

/// Verifies a bearer token and yields the caller it identifies.
///
/// Implementations check signature, audience, issuer and expiry; they hold
/// no per-session state.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Verify `token`.
    async fn verify(&self, token: &BearerToken) -> Result<Caller, AuthError>;
}
