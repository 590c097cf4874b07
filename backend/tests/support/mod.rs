//! Shared helpers for the HTTP integration suite.
//!
//! Builds the same app the server binary does over in-memory or file-backed
//! stores.

use std::path::Path;
use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use mockable::{Clock, DefaultClock};

use journal_backend::Trace;
use journal_backend::domain::ports::{EntryRepository, InMemoryEntryRepository};
use journal_backend::domain::{EntryCollection, EntryService};
use journal_backend::inbound::http::configure;
use journal_backend::inbound::http::health::HealthState;
use journal_backend::inbound::http::pages::SiteRoot;
use journal_backend::inbound::http::state::{AuthPolicy, HttpState};
use journal_backend::outbound::file_store::JsonFileEntryRepository;

/// State over in-memory stores.
pub fn memory_state(auth: AuthPolicy) -> HttpState {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    state_over(
        Arc::new(InMemoryEntryRepository::new(Arc::clone(&clock))),
        Arc::new(InMemoryEntryRepository::new(clock)),
        auth,
        "memory",
    )
}

/// State over JSON files in `data_dir`.
pub fn file_state(data_dir: &Path, auth: AuthPolicy) -> HttpState {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    state_over(
        Arc::new(JsonFileEntryRepository::new(
            data_dir,
            EntryCollection::Forms,
            Arc::clone(&clock),
        )),
        Arc::new(JsonFileEntryRepository::new(
            data_dir,
            EntryCollection::Journal,
            clock,
        )),
        auth,
        "file",
    )
}

fn state_over(
    forms: Arc<dyn EntryRepository>,
    journal: Arc<dyn EntryRepository>,
    auth: AuthPolicy,
    store: &'static str,
) -> HttpState {
    HttpState::new(
        EntryService::new(EntryCollection::Forms, forms),
        EntryService::new(EntryCollection::Journal, journal),
        auth,
        store,
    )
}

/// App wired exactly as the server wires it, minus Swagger.
pub fn app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let health = HealthState::new();
    health.mark_ready();
    App::new()
        .app_data(web::Data::new(state))
        .app_data(web::Data::new(health))
        .app_data(web::Data::new(SiteRoot::new(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/public"
        ))))
        .wrap(Trace)
        .configure(configure)
}
