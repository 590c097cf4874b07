//! Service configuration loaded via OrthoConfig.
//!
//! Every field can come from a CLI flag, a `JOURNAL_*` environment variable
//! or a config file. [`AppSettings::resolve`] turns the loose settings into a
//! [`RuntimeConfig`] and rejects incomplete combinations before anything
//! binds or connects.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use jsonwebtoken::Algorithm;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::outbound::jwks::well_known_jwks_url;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3001;
const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_STATIC_DIR: &str = "public";
const DEFAULT_KEY_TTL_SECS: u64 = 3600;

/// Raw settings as loaded.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "JOURNAL")]
pub struct AppSettings {
    /// Listen address.
    pub host: Option<String>,
    /// Listen port.
    pub port: Option<u16>,
    /// Entry store backend: `postgres`, `file` or `memory`.
    pub store: Option<String>,
    /// PostgreSQL connection string; required for the `postgres` store.
    pub database_url: Option<String>,
    /// Directory for the `file` store.
    pub data_dir: Option<PathBuf>,
    /// Directory holding `index.html`.
    pub static_dir: Option<PathBuf>,
    /// Require bearer tokens on the journal routes.
    #[ortho_config(default = false)]
    pub auth_required: bool,
    /// JWKS endpoint; derived from the issuer when omitted.
    pub auth_jwks_url: Option<String>,
    /// Expected token issuer.
    pub auth_issuer: Option<String>,
    /// Expected token audience.
    pub auth_audience: Option<String>,
    /// Comma-separated accepted algorithms, `RS256` by default.
    pub auth_algorithms: Option<String>,
    /// Signing-key cache lifetime in seconds.
    pub auth_key_ttl_secs: Option<u64>,
}

/// Rejected configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// `store` named no known backend.
    #[error("unknown store '{value}'; expected postgres, file or memory")]
    UnknownStore {
        /// Value supplied.
        value: String,
    },
    /// The postgres store was selected without a connection string.
    #[error("store 'postgres' requires database_url (JOURNAL_DATABASE_URL)")]
    MissingDatabaseUrl,
    /// Auth is enabled but a required setting is absent.
    #[error("auth_required is set but {setting} is missing")]
    MissingAuthSetting {
        /// Setting name.
        setting: &'static str,
    },
    /// The JWKS endpoint could not be determined.
    #[error("invalid JWKS URL '{value}': {message}")]
    InvalidJwksUrl {
        /// URL or issuer supplied.
        value: String,
        /// Parser message.
        message: String,
    },
    /// An algorithm name was not recognised.
    #[error("unknown signing algorithm '{value}'")]
    UnknownAlgorithm {
        /// Name supplied.
        value: String,
    },
}

/// Selected entry store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreSettings {
    /// PostgreSQL via Diesel.
    Postgres {
        /// Connection string.
        database_url: String,
    },
    /// JSON files under `data_dir`.
    File {
        /// Directory holding the collection files.
        data_dir: PathBuf,
    },
    /// Process-local memory.
    Memory,
}

impl StoreSettings {
    /// Label reported by `/api/health`.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Postgres { .. } => "postgres",
            Self::File { .. } => "file",
            Self::Memory => "memory",
        }
    }
}

/// Token verification settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSettings {
    /// Where signing keys are published.
    pub jwks_url: Url,
    /// Expected `iss`.
    pub issuer: String,
    /// Expected `aud`.
    pub audience: String,
    /// Accepted algorithms.
    pub algorithms: Vec<Algorithm>,
    /// Signing-key cache lifetime.
    pub key_ttl: Duration,
}

/// Validated configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Listen address.
    pub host: String,
    /// Listen port.
    pub port: u16,
    /// Entry store.
    pub store: StoreSettings,
    /// Front-end asset directory.
    pub static_dir: PathBuf,
    /// `None` when the journal routes are open.
    pub auth: Option<AuthSettings>,
}

impl AppSettings {
    /// Validate and apply defaults.
    ///
    /// # Errors
    /// [`SettingsError`] for unknown store or algorithm names, and for the
    /// postgres store or auth enabled without their required settings.
    pub fn resolve(&self) -> Result<RuntimeConfig, SettingsError> {
        Ok(RuntimeConfig {
            host: self.host.clone().unwrap_or_else(|| DEFAULT_HOST.to_owned()),
            port: self.port.unwrap_or(DEFAULT_PORT),
            store: self.store_settings()?,
            static_dir: self
                .static_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR)),
            auth: self.auth_settings()?,
        })
    }

    fn store_settings(&self) -> Result<StoreSettings, SettingsError> {
        match self.store.as_deref().map(str::trim).unwrap_or("postgres") {
            "postgres" => self
                .database_url
                .clone()
                .filter(|url| !url.trim().is_empty())
                .map(|database_url| StoreSettings::Postgres { database_url })
                .ok_or(SettingsError::MissingDatabaseUrl),
            "file" => Ok(StoreSettings::File {
                data_dir: self
                    .data_dir
                    .clone()
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            }),
            "memory" => Ok(StoreSettings::Memory),
            other => Err(SettingsError::UnknownStore {
                value: other.to_owned(),
            }),
        }
    }

    fn auth_settings(&self) -> Result<Option<AuthSettings>, SettingsError> {
        if !self.auth_required {
            return Ok(None);
        }
        let issuer = required(self.auth_issuer.as_deref(), "auth_issuer")?;
        let audience = required(self.auth_audience.as_deref(), "auth_audience")?;
        let jwks_url = match self.auth_jwks_url.as_deref() {
            Some(raw) => parse_url(raw)?,
            None => well_known_jwks_url(&parse_url(&issuer)?),
        };
        Ok(Some(AuthSettings {
            jwks_url,
            issuer,
            audience,
            algorithms: parse_algorithms(self.auth_algorithms.as_deref().unwrap_or("RS256"))?,
            key_ttl: Duration::from_secs(self.auth_key_ttl_secs.unwrap_or(DEFAULT_KEY_TTL_SECS)),
        }))
    }
}

fn required(value: Option<&str>, setting: &'static str) -> Result<String, SettingsError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
        .ok_or(SettingsError::MissingAuthSetting { setting })
}

fn parse_url(raw: &str) -> Result<Url, SettingsError> {
    Url::parse(raw.trim()).map_err(|err| SettingsError::InvalidJwksUrl {
        value: raw.to_owned(),
        message: err.to_string(),
    })
}

fn parse_algorithms(raw: &str) -> Result<Vec<Algorithm>, SettingsError> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| {
            Algorithm::from_str(name).map_err(|_| SettingsError::UnknownAlgorithm {
                value: name.to_owned(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    //! Configuration loading and validation.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::{fixture, rstest};

    const VARS: [&str; 12] = [
        "JOURNAL_HOST",
        "JOURNAL_PORT",
        "JOURNAL_STORE",
        "JOURNAL_DATABASE_URL",
        "JOURNAL_DATA_DIR",
        "JOURNAL_STATIC_DIR",
        "JOURNAL_AUTH_REQUIRED",
        "JOURNAL_AUTH_JWKS_URL",
        "JOURNAL_AUTH_ISSUER",
        "JOURNAL_AUTH_AUDIENCE",
        "JOURNAL_AUTH_ALGORITHMS",
        "JOURNAL_AUTH_KEY_TTL_SECS",
    ];

    fn load_with(overrides: &[(&str, &str)]) -> AppSettings {
        let vars = VARS.map(|name| {
            let value = overrides
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value).to_owned());
            (name, value)
        });
        let _guard = lock_env(vars);
        AppSettings::load_from_iter([OsString::from("journal-backend")])
            .expect("config should load")
    }

    #[fixture]
    fn bare() -> AppSettings {
        AppSettings {
            host: None,
            port: None,
            store: Some("memory".to_owned()),
            database_url: None,
            data_dir: None,
            static_dir: None,
            auth_required: false,
            auth_jwks_url: None,
            auth_issuer: None,
            auth_audience: None,
            auth_algorithms: None,
            auth_key_ttl_secs: None,
        }
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let settings = load_with(&[("JOURNAL_DATABASE_URL", "postgres://localhost/journal")]);
        let config = settings.resolve().expect("valid");
        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.static_dir, PathBuf::from(DEFAULT_STATIC_DIR));
        assert_eq!(
            config.store,
            StoreSettings::Postgres {
                database_url: "postgres://localhost/journal".to_owned()
            }
        );
        assert!(config.auth.is_none());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let settings = load_with(&[
            ("JOURNAL_PORT", "8080"),
            ("JOURNAL_STORE", "file"),
            ("JOURNAL_DATA_DIR", "/var/lib/journal"),
        ]);
        let config = settings.resolve().expect("valid");
        assert_eq!(config.port, 8080);
        assert_eq!(
            config.store,
            StoreSettings::File {
                data_dir: PathBuf::from("/var/lib/journal")
            }
        );
    }

    #[rstest]
    fn postgres_without_url_is_rejected(mut bare: AppSettings) {
        bare.store = None;
        assert_eq!(bare.resolve(), Err(SettingsError::MissingDatabaseUrl));
    }

    #[rstest]
    fn unknown_stores_are_rejected(mut bare: AppSettings) {
        bare.store = Some("mongo".to_owned());
        assert!(matches!(
            bare.resolve(),
            Err(SettingsError::UnknownStore { .. })
        ));
    }

    #[rstest]
    #[case(None, Some("journal"), "auth_issuer")]
    #[case(Some("https://issuer.test/"), None, "auth_audience")]
    fn auth_needs_issuer_and_audience(
        mut bare: AppSettings,
        #[case] issuer: Option<&str>,
        #[case] audience: Option<&str>,
        #[case] missing: &'static str,
    ) {
        bare.auth_required = true;
        bare.auth_issuer = issuer.map(str::to_owned);
        bare.auth_audience = audience.map(str::to_owned);
        assert_eq!(
            bare.resolve(),
            Err(SettingsError::MissingAuthSetting { setting: missing })
        );
    }

    #[rstest]
    fn jwks_url_defaults_to_the_issuer_well_known_path(mut bare: AppSettings) {
        bare.auth_required = true;
        bare.auth_issuer = Some("https://issuer.test/tenant/".to_owned());
        bare.auth_audience = Some("journal".to_owned());

        let auth = bare.resolve().expect("valid").auth.expect("auth enabled");
        assert_eq!(
            auth.jwks_url.as_str(),
            "https://issuer.test/tenant/.well-known/jwks.json"
        );
        assert_eq!(auth.algorithms, vec![Algorithm::RS256]);
        assert_eq!(auth.key_ttl, Duration::from_secs(DEFAULT_KEY_TTL_SECS));
    }

    #[rstest]
    fn algorithms_are_parsed_from_a_list(mut bare: AppSettings) {
        bare.auth_required = true;
        bare.auth_issuer = Some("https://issuer.test/".to_owned());
        bare.auth_audience = Some("journal".to_owned());
        bare.auth_algorithms = Some("RS256, ES256".to_owned());

        let auth = bare.resolve().expect("valid").auth.expect("auth enabled");
        assert_eq!(auth.algorithms, vec![Algorithm::RS256, Algorithm::ES256]);

        bare.auth_algorithms = Some("none".to_owned());
        assert!(matches!(
            bare.resolve(),
            Err(SettingsError::UnknownAlgorithm { .. })
        ));
    }
}
