//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use mockable::DefaultClock;

use super::health::HealthState;
use super::pages::SiteRoot;
use super::state::{AuthPolicy, HttpState};
use crate::Trace;
use crate::domain::ports::InMemoryEntryRepository;
use crate::domain::{EntryCollection, EntryService};

/// State backed by fresh in-memory stores with auth disabled.
pub fn memory_state() -> HttpState {
    let service = |collection| {
        EntryService::new(
            collection,
            Arc::new(InMemoryEntryRepository::new(Arc::new(DefaultClock))),
        )
    };
    HttpState::new(
        service(EntryCollection::Forms),
        service(EntryCollection::Journal),
        AuthPolicy::Disabled,
        "memory",
    )
}

/// Fully routed app over `state`, serving pages from `site`.
pub fn test_app(
    state: HttpState,
    site: SiteRoot,
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
        .app_data(web::Data::new(site))
        .wrap(Trace)
        .configure(super::configure)
}
