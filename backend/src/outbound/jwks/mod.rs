//! Bearer-token verification against an issuer's published JWKS.
//!
//! - [`HttpKeySetSource`] fetches the key set over HTTPS.
//! - [`CachedKeySet`] keeps it for a bounded time and decides when to
//!   refetch.
//! - [`JwtVerifier`] implements the
//!   [`TokenVerifier`](crate::domain::ports::TokenVerifier) port on top.

mod cache;
mod http_source;
mod verifier;

use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;

pub use cache::{CachedKeySet, KeySetCachePolicy};
pub use http_source::{HttpKeySetSource, well_known_jwks_url};
pub use verifier::{JwtVerifier, JwtVerifierConfig};

/// Failures fetching a key set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeySetFetchError {
    /// The endpoint could not be reached or timed out.
    #[error("key set request failed: {message}")]
    Transport {
        /// Transport error text.
        message: String,
    },
    /// The endpoint answered with a non-success status.
    #[error("key set endpoint returned status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },
    /// The body was not a JWKS document.
    #[error("key set payload is invalid: {message}")]
    Decode {
        /// Decoder error text.
        message: String,
    },
}

/// Where signing keys come from.
#[async_trait]
pub trait KeySetSource: Send + Sync {
    /// Fetch the issuer's current key set. A single attempt; retries are the
    /// caller's policy.
    async fn fetch(&self) -> Result<JwkSet, KeySetFetchError>;
}
