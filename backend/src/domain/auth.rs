//! Bearer-token primitives for the auth guard.
//!
//! Token verification itself happens behind the
//! [`TokenVerifier`](super::ports::TokenVerifier) port; this module owns the
//! header parsing and the failure taxonomy shared by every adapter.

use std::fmt;

use zeroize::Zeroizing;

use super::Error;

/// Reasons a request is denied by the auth guard.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No `Authorization` header was sent.
    #[error("authorization header is missing")]
    MissingHeader,
    /// The header is not exactly `Bearer <token>`.
    #[error("authorization header must be 'Bearer <token>'")]
    MalformedHeader,
    /// The token could not be decoded as a JWT.
    #[error("bearer token is malformed")]
    MalformedToken,
    /// The token names a signing key the issuer does not publish.
    #[error("bearer token was signed with an unknown key")]
    UnknownKey,
    /// The token's expiry has passed.
    #[error("bearer token has expired")]
    ExpiredToken,
    /// Audience, issuer, algorithm or another claim did not match.
    #[error("bearer token claims are invalid: {reason}")]
    InvalidClaims {
        /// Which check failed.
        reason: String,
    },
    /// The signature does not verify against the matched key.
    #[error("bearer token signature is invalid")]
    InvalidSignature,
    /// The issuer's key set could not be fetched and nothing usable is
    /// cached.
    #[error("signing keys are unavailable: {message}")]
    KeySetUnavailable {
        /// Transport or decode failure description.
        message: String,
    },
}

impl AuthError {
    /// Helper for claim mismatches.
    pub fn invalid_claims(reason: impl Into<String>) -> Self {
        Self::InvalidClaims {
            reason: reason.into(),
        }
    }

    /// Helper for key-set fetch failures.
    pub fn key_set_unavailable(message: impl Into<String>) -> Self {
        Self::KeySetUnavailable {
            message: message.into(),
        }
    }

    /// Stable identifier reported in error details.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::MissingHeader => "missing_header",
            Self::MalformedHeader => "malformed_header",
            Self::MalformedToken => "malformed_token",
            Self::UnknownKey => "unknown_key",
            Self::ExpiredToken => "expired_token",
            Self::InvalidClaims { .. } => "invalid_claims",
            Self::InvalidSignature => "invalid_signature",
            Self::KeySetUnavailable { .. } => "key_set_unavailable",
        }
    }
}

impl From<AuthError> for Error {
    fn from(value: AuthError) -> Self {
        let details = serde_json::json!({ "reason": value.kind() });
        let error = match value {
            AuthError::KeySetUnavailable { .. } => {
                Self::service_unavailable("authentication is temporarily unavailable")
            }
            other => Self::unauthorized(other.to_string()),
        };
        error.with_details(details)
    }
}

/// Raw bearer credential taken from the `Authorization` header.
///
/// The token text is zeroised on drop and never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(Zeroizing<String>);

impl BearerToken {
    /// Parse an `Authorization` header value.
    ///
    /// The scheme is matched case-insensitively; the value must split into
    /// exactly two whitespace-separated parts.
    ///
    /// # Errors
    /// [`AuthError::MissingHeader`] when `header` is `None`,
    /// [`AuthError::MalformedHeader`] for anything other than
    /// `Bearer <token>`.
    ///
    /// # Examples
    /// ```
    /// use journal_backend::domain::{AuthError, BearerToken};
    ///
    /// let token = BearerToken::from_header(Some("Bearer abc.def.ghi")).unwrap();
    /// assert_eq!(token.as_str(), "abc.def.ghi");
    /// assert_eq!(BearerToken::from_header(None), Err(AuthError::MissingHeader));
    /// assert_eq!(
    ///     BearerToken::from_header(Some("Basic abc")),
    ///     Err(AuthError::MalformedHeader)
    /// );
    /// ```
    pub fn from_header(header: Option<&str>) -> Result<Self, AuthError> {
        let header = header.ok_or(AuthError::MissingHeader)?;
        let mut parts = header.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => {
                Ok(Self(Zeroizing::new(token.to_owned())))
            }
            _ => Err(AuthError::MalformedHeader),
        }
    }

    /// Token text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

/// Identity established by a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    subject: String,
}

impl Caller {
    /// Construct from the token's `sub` claim.
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
        }
    }

    /// Verified subject identifier.
    #[must_use]
    pub fn subject(&self) -> &str {
        self.subject.as_str()
    }
}
