//! Reqwest-backed key set source.

use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use reqwest::{Client, Url, header};

use super::{KeySetFetchError, KeySetSource};

const USER_AGENT: &str = concat!("journal-backend/", env!("CARGO_PKG_VERSION"));

/// Fetches the JWKS document from one endpoint.
pub struct HttpKeySetSource {
    client: Client,
    endpoint: Url,
}

impl HttpKeySetSource {
    /// Build a source with a per-request `timeout`.
    ///
    /// # Errors
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client, endpoint })
    }

    /// Endpoint this source reads.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl KeySetSource for HttpKeySetSource {
    async fn fetch(&self) -> Result<JwkSet, KeySetFetchError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(KeySetFetchError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(map_transport_error)?;
        parse_key_set(&body)
    }
}

fn map_transport_error(error: reqwest::Error) -> KeySetFetchError {
    let message = if error.is_timeout() {
        "request timed out".to_owned()
    } else {
        error.to_string()
    };
    KeySetFetchError::Transport { message }
}

fn parse_key_set(body: &[u8]) -> Result<JwkSet, KeySetFetchError> {
    serde_json::from_slice(body).map_err(|error| KeySetFetchError::Decode {
        message: error.to_string(),
    })
}

/// Conventional JWKS location for an issuer:
/// `<issuer>/.well-known/jwks.json`.
///
/// # Examples
/// ```
/// use journal_backend::outbound::jwks::well_known_jwks_url;
/// use url::Url;
///
/// let issuer = Url::parse("https://tenant.example.com").unwrap();
/// assert_eq!(
///     well_known_jwks_url(&issuer).as_str(),
///     "https://tenant.example.com/.well-known/jwks.json"
/// );
/// ```
#[must_use]
pub fn well_known_jwks_url(issuer: &Url) -> Url {
    let mut base = issuer.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(".well-known/jwks.json").unwrap_or(base)
}
