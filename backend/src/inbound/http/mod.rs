//! HTTP inbound adapter.
//!
//! ```text
//! POST   /api/submit-form
//! GET    /api/submit-form
//! GET    /api/journal/entries
//! POST   /api/journal/entries
//! DELETE /api/journal/entries/{id}
//! GET    /api/health
//! GET    /health/ready, /health/live
//! GET    /            (index page; also the fallback for unknown GETs)
//! ```

pub mod auth;
pub mod error;
pub mod forms;
pub mod health;
pub mod journal;
pub mod pages;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;

use actix_web::web;

pub use error::{ApiResult, json_error_handler};

/// Register every route on `cfg`.
///
/// Callers supply the [`state::HttpState`], [`health::HealthState`] and
/// [`pages::SiteRoot`] as app data and wrap the app in
/// [`Trace`](crate::Trace).
///
/// # Examples
/// ```no_run
/// use actix_web::{App, web};
/// use journal_backend::inbound::http::configure;
///
/// let _app = App::new().configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .service(health::api_health)
        .service(health::ready)
        .service(health::live)
        .service(forms::submit_form)
        .service(forms::list_forms)
        .service(journal::list_entries)
        .service(journal::create_entry)
        .service(journal::delete_entry)
        .service(pages::index)
        .default_service(web::to(pages::fallback));
}
