//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;
pub use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;

use journal_backend::Trace;
#[cfg(debug_assertions)]
use journal_backend::doc::ApiDoc;
use journal_backend::inbound::http::configure;
use journal_backend::inbound::http::health::HealthState;
use journal_backend::inbound::http::pages::SiteRoot;
use journal_backend::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    site: web::Data<SiteRoot>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        site,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(site)
        .wrap(Trace);

    // Swagger is registered ahead of the catch-all page fallback.
    #[cfg(debug_assertions)]
    let app = app.service(
        SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    app.configure(configure)
}

/// Construct the HTTP server.
///
/// # Returns
/// A [`Server`] that must be awaited to drive the listener. `health_state`
/// is marked ready once the socket is bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let ServerConfig {
        http_state,
        site,
        bind_addr,
    } = config;
    let deps = AppDependencies {
        health_state: health_state.clone(),
        http_state: web::Data::new(http_state),
        site: web::Data::new(site),
    };

    let server = HttpServer::new(move || build_app(deps.clone()))
        .bind((bind_addr.0.as_str(), bind_addr.1))?
        .run();

    info!(host = %bind_addr.0, port = bind_addr.1, "listening");
    health_state.mark_ready();
    Ok(server)
}
