//! Builders turning validated settings into adapters and HTTP state.
//!
//! Store construction is fail-fast: for PostgreSQL the migrations run and a
//! connection is probed before anything binds.

use std::sync::Arc;
use std::time::Duration;

use mockable::{Clock, DefaultClock};
use tracing::info;

use journal_backend::config::{AuthSettings, RuntimeConfig, StoreSettings};
use journal_backend::domain::ports::{EntryRepository, InMemoryEntryRepository};
use journal_backend::domain::{EntryCollection, EntryService};
use journal_backend::inbound::http::state::{AuthPolicy, HttpState};
use journal_backend::outbound::file_store::JsonFileEntryRepository;
use journal_backend::outbound::jwks::{
    CachedKeySet, HttpKeySetSource, JwtVerifier, JwtVerifierConfig, KeySetCachePolicy,
};
use journal_backend::outbound::persistence::{
    DbPool, DieselEntryRepository, MigrationError, PoolConfig, PoolError, run_pending_migrations,
};

const KEY_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Failures while preparing the service.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// Schema migrations could not be applied.
    #[error(transparent)]
    Migration(#[from] MigrationError),
    /// The database pool could not be built or probed.
    #[error(transparent)]
    Pool(#[from] PoolError),
    /// The key-set HTTP client could not be built.
    #[error("failed to build key set client: {0}")]
    KeySetClient(#[from] reqwest::Error),
}

type Repositories = (Arc<dyn EntryRepository>, Arc<dyn EntryRepository>);

async fn build_repositories(
    store: &StoreSettings,
    clock: &Arc<dyn Clock>,
) -> Result<Repositories, StartupError> {
    let repositories: Repositories = match store {
        StoreSettings::Postgres { database_url } => {
            run_pending_migrations(database_url).await?;
            let pool = DbPool::connect(&PoolConfig::new(database_url.as_str())).await?;
            (
                Arc::new(DieselEntryRepository::new(
                    pool.clone(),
                    EntryCollection::Forms,
                    Arc::clone(clock),
                )),
                Arc::new(DieselEntryRepository::new(
                    pool,
                    EntryCollection::Journal,
                    Arc::clone(clock),
                )),
            )
        }
        StoreSettings::File { data_dir } => (
            Arc::new(JsonFileEntryRepository::new(
                data_dir.clone(),
                EntryCollection::Forms,
                Arc::clone(clock),
            )),
            Arc::new(JsonFileEntryRepository::new(
                data_dir.clone(),
                EntryCollection::Journal,
                Arc::clone(clock),
            )),
        ),
        StoreSettings::Memory => (
            Arc::new(InMemoryEntryRepository::new(Arc::clone(clock))),
            Arc::new(InMemoryEntryRepository::new(Arc::clone(clock))),
        ),
    };
    info!(store = store.label(), "entry store ready");
    Ok(repositories)
}

fn build_auth_policy(
    auth: Option<&AuthSettings>,
    clock: &Arc<dyn Clock>,
) -> Result<AuthPolicy, StartupError> {
    let Some(auth) = auth else {
        info!("journal routes are open; bearer tokens are not checked");
        return Ok(AuthPolicy::Disabled);
    };
    let source = HttpKeySetSource::new(auth.jwks_url.clone(), KEY_FETCH_TIMEOUT)?;
    let policy = KeySetCachePolicy {
        ttl: auth.key_ttl,
        ..KeySetCachePolicy::default()
    };
    let keys = CachedKeySet::new(source, policy, Arc::clone(clock));
    let config = JwtVerifierConfig::new(auth.issuer.as_str(), auth.audience.as_str())
        .with_algorithms(auth.algorithms.clone());
    info!(jwks_url = %auth.jwks_url, issuer = %auth.issuer, "bearer tokens required");
    Ok(AuthPolicy::Required(Arc::new(JwtVerifier::new(keys, config))))
}

/// Build the HTTP state for `config`.
///
/// # Errors
/// [`StartupError`] when the store is unreachable or the key-set client
/// cannot be built.
pub async fn build_http_state(config: &RuntimeConfig) -> Result<HttpState, StartupError> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let (forms, journal) = build_repositories(&config.store, &clock).await?;
    let auth = build_auth_policy(config.auth.as_ref(), &clock)?;
    Ok(HttpState::new(
        EntryService::new(EntryCollection::Forms, forms),
        EntryService::new(EntryCollection::Journal, journal),
        auth,
        config.store.label(),
    ))
}
