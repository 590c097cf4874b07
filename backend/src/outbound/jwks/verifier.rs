//! JWT verification against cached issuer keys.

use async_trait::async_trait;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use serde::Deserialize;
use tracing::debug;

use super::{CachedKeySet, KeySetSource};
use crate::domain::ports::TokenVerifier;
use crate::domain::{AuthError, BearerToken, Caller};

/// Claims every accepted token must satisfy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JwtVerifierConfig {
    /// Expected `iss`.
    pub issuer: String,
    /// Expected `aud`.
    pub audience: String,
    /// Signature algorithms accepted in the token header.
    pub algorithms: Vec<Algorithm>,
    /// Clock skew tolerated on `exp` and `nbf`, in seconds.
    pub leeway_secs: u64,
}

impl JwtVerifierConfig {
    /// RS256-only config with a one-minute leeway.
    pub fn new(issuer: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
            audience: audience.into(),
            algorithms: vec![Algorithm::RS256],
            leeway_secs: 60,
        }
    }

    /// Replace the accepted algorithms.
    #[must_use]
    pub fn with_algorithms(mut self, algorithms: Vec<Algorithm>) -> Self {
        self.algorithms = algorithms;
        self
    }
}

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
}

/// [`TokenVerifier`] backed by a JWKS key cache.
pub struct JwtVerifier<S> {
    keys: CachedKeySet<S>,
    config: JwtVerifierConfig,
}

impl<S: KeySetSource> JwtVerifier<S> {
    /// Verify tokens with `config`, resolving keys through `keys`.
    pub fn new(keys: CachedKeySet<S>, config: JwtVerifierConfig) -> Self {
        Self { keys, config }
    }

    fn validation_for(&self, algorithm: Algorithm) -> Validation {
        let mut validation = Validation::new(algorithm);
        validation.set_audience(&[self.config.audience.as_str()]);
        validation.set_issuer(&[self.config.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "aud", "iss", "sub"]);
        validation.leeway = self.config.leeway_secs;
        validation
    }
}

#[async_trait]
impl<S: KeySetSource> TokenVerifier for JwtVerifier<S> {
    async fn verify(&self, token: &BearerToken) -> Result<Caller, AuthError> {
        let header = decode_header(token.as_str()).map_err(|_| AuthError::MalformedToken)?;
        if !self.config.algorithms.contains(&header.alg) {
            return Err(AuthError::invalid_claims(format!(
                "algorithm {:?} is not accepted",
                header.alg
            )));
        }
        let kid = header.kid.ok_or(AuthError::UnknownKey)?;
        let jwk = self.keys.key_for(&kid).await?;
        let key = DecodingKey::from_jwk(&jwk).map_err(|err| {
            debug!(%err, kid, "published key is unusable");
            AuthError::UnknownKey
        })?;

        let data = decode::<Claims>(token.as_str(), &key, &self.validation_for(header.alg))
            .map_err(|err| map_decode_error(err.kind()))?;
        Ok(Caller::new(data.claims.sub))
    }
}

fn map_decode_error(kind: &ErrorKind) -> AuthError {
    match kind {
        ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
        ErrorKind::InvalidAudience => AuthError::invalid_claims("audience"),
        ErrorKind::InvalidIssuer => AuthError::invalid_claims("issuer"),
        ErrorKind::InvalidSubject => AuthError::invalid_claims("subject"),
        ErrorKind::ImmatureSignature => AuthError::invalid_claims("not yet valid"),
        ErrorKind::InvalidAlgorithm => AuthError::invalid_claims("algorithm"),
        ErrorKind::MissingRequiredClaim(claim) => {
            AuthError::invalid_claims(format!("missing {claim}"))
        }
        ErrorKind::InvalidToken
        | ErrorKind::Base64(_)
        | ErrorKind::Json(_)
        | ErrorKind::Utf8(_) => AuthError::MalformedToken,
        _ => AuthError::InvalidSignature,
    }
}
