//! OpenAPI document for the HTTP surface.
//!
//! Served through Swagger UI at `/docs` in debug builds.

use crate::inbound::http::health::HealthBody;
use crate::inbound::http::schemas::{
    ErrorCodeSchema, ErrorEnvelopeSchema, FormEntriesBody, FormEntryBody, FormSubmissionSchema,
    JournalEntriesBody, JournalEntryBody, JournalEntryCreatedBody, JournalSubmissionSchema,
    MessageBody, SubmittedBody,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Registers the bearer-token scheme used by the journal routes.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);
        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "Identity-provider token; required on journal routes when auth is enabled.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Journal backend API",
        description = "Form submissions and travel journal entries."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::forms::submit_form,
        crate::inbound::http::forms::list_forms,
        crate::inbound::http::journal::list_entries,
        crate::inbound::http::journal::create_entry,
        crate::inbound::http::journal::delete_entry,
        crate::inbound::http::health::api_health,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorCodeSchema,
        ErrorEnvelopeSchema,
        FormEntriesBody,
        FormEntryBody,
        FormSubmissionSchema,
        HealthBody,
        JournalEntriesBody,
        JournalEntryBody,
        JournalEntryCreatedBody,
        JournalSubmissionSchema,
        MessageBody,
        SubmittedBody,
    )),
    tags(
        (name = "forms", description = "Form submissions"),
        (name = "journal", description = "Journal entries"),
        (name = "health", description = "Health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/api/submit-form")]
    #[case("/api/journal/entries")]
    #[case("/api/journal/entries/{id}")]
    #[case("/api/health")]
    fn documents_every_api_route(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "{path} is undocumented");
    }

    #[rstest]
    fn registers_the_bearer_scheme_and_error_envelope() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("BearerToken"));
        assert!(components.schemas.contains_key("ErrorEnvelope"));
    }
}
