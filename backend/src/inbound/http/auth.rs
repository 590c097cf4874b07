//! Bearer-token guard for the journal routes.
//!
//! Handlers take a [`JournalAccess`] argument; extraction fails with a 401
//! (or 503 when signing keys are unavailable) before the handler body runs.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use tracing::{debug, info};

use super::state::{AuthPolicy, HttpState};
use crate::domain::{AuthError, BearerToken, Caller, Error};

/// Proof that the request may use the journal routes.
#[derive(Debug, Clone)]
pub struct JournalAccess {
    caller: Option<Caller>,
}

impl JournalAccess {
    /// Verified caller; `None` when auth is disabled.
    #[must_use]
    pub fn caller(&self) -> Option<&Caller> {
        self.caller.as_ref()
    }
}

impl FromRequest for JournalAccess {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let policy = req
            .app_data::<web::Data<HttpState>>()
            .map(|state| state.auth.clone());
        let header = req
            .headers()
            .get(AUTHORIZATION)
            .map(|value| value.to_str().map(str::to_owned));

        Box::pin(async move {
            let verifier = match policy {
                Some(AuthPolicy::Disabled) => return Ok(Self { caller: None }),
                Some(AuthPolicy::Required(verifier)) => verifier,
                None => return Err(Error::internal("HTTP state is not configured")),
            };
            let header = match header {
                Some(Ok(value)) => Some(value),
                Some(Err(_)) => return Err(AuthError::MalformedHeader.into()),
                None => None,
            };
            let token = BearerToken::from_header(header.as_deref())?;
            match verifier.verify(&token).await {
                Ok(caller) => {
                    info!(subject = caller.subject(), "journal access granted");
                    Ok(Self {
                        caller: Some(caller),
                    })
                }
                Err(err) => {
                    debug!(reason = err.kind(), "journal access denied");
                    Err(err.into())
                }
            }
        })
    }
}
