//! Journal entry handlers.
//!
//! Every route takes [`JournalAccess`], so when auth is enabled the bearer
//! token is checked before the handler body runs.

use actix_web::{HttpResponse, delete, get, post, web};
use serde_json::{Map, Value};
use tracing::info;

use super::ApiResult;
use super::auth::JournalAccess;
use super::schemas::{
    ErrorEnvelopeSchema, JournalEntriesBody, JournalEntryBody, JournalEntryCreatedBody,
    JournalSubmissionSchema, MessageBody,
};
use super::state::HttpState;
use crate::domain::Caller;

fn subject(access: &JournalAccess) -> &str {
    access.caller().map_or("anonymous", Caller::subject)
}

/// List journal entries.
#[utoipa::path(
    get,
    path = "/api/journal/entries",
    responses(
        (status = 200, description = "Stored entries", body = JournalEntriesBody),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorEnvelopeSchema),
        (status = 503, description = "Signing keys unavailable", body = ErrorEnvelopeSchema),
        (status = 500, description = "Store failure", body = ErrorEnvelopeSchema)
    ),
    tags = ["journal"],
    operation_id = "listJournalEntries",
    security(("BearerToken" = []))
)]
#[get("/api/journal/entries")]
pub async fn list_entries(
    access: JournalAccess,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<JournalEntriesBody>> {
    let entries = state.journal.list().await?;
    info!(subject = subject(&access), count = entries.len(), "journal entries listed");
    Ok(web::Json(JournalEntriesBody {
        success: true,
        entries: entries.into_iter().map(JournalEntryBody::from).collect(),
    }))
}

/// Store a journal entry.
#[utoipa::path(
    post,
    path = "/api/journal/entries",
    request_body = JournalSubmissionSchema,
    responses(
        (status = 200, description = "Entry stored", body = JournalEntryCreatedBody),
        (status = 400, description = "Missing fields or malformed body", body = ErrorEnvelopeSchema),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorEnvelopeSchema),
        (status = 503, description = "Signing keys unavailable", body = ErrorEnvelopeSchema),
        (status = 500, description = "Store failure", body = ErrorEnvelopeSchema)
    ),
    tags = ["journal"],
    operation_id = "createJournalEntry",
    security(("BearerToken" = []))
)]
#[post("/api/journal/entries")]
pub async fn create_entry(
    access: JournalAccess,
    state: web::Data<HttpState>,
    payload: web::Json<Map<String, Value>>,
) -> ApiResult<web::Json<JournalEntryCreatedBody>> {
    let entry = state.journal.submit(&payload).await?;
    info!(subject = subject(&access), entry_id = %entry.id, "journal entry created");
    Ok(web::Json(JournalEntryCreatedBody {
        success: true,
        entry: entry.into(),
    }))
}

/// Delete a journal entry.
#[utoipa::path(
    delete,
    path = "/api/journal/entries/{id}",
    params(("id" = String, Path, description = "Entry identifier")),
    responses(
        (status = 200, description = "Entry deleted", body = MessageBody),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorEnvelopeSchema),
        (status = 404, description = "No such entry", body = ErrorEnvelopeSchema),
        (status = 503, description = "Signing keys unavailable", body = ErrorEnvelopeSchema),
        (status = 500, description = "Store failure", body = ErrorEnvelopeSchema)
    ),
    tags = ["journal"],
    operation_id = "deleteJournalEntry",
    security(("BearerToken" = []))
)]
#[delete("/api/journal/entries/{id}")]
pub async fn delete_entry(
    access: JournalAccess,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = state.journal.delete(&path).await?;
    info!(subject = subject(&access), entry_id = %id, "journal entry deleted");
    Ok(HttpResponse::Ok().json(MessageBody {
        success: true,
        message: "Entry deleted successfully",
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockTokenVerifier;
    use crate::domain::AuthError;
    use crate::inbound::http::pages::SiteRoot;
    use crate::inbound::http::state::AuthPolicy;
    use crate::inbound::http::test_utils::{memory_state, test_app};
    use actix_web::http::StatusCode;
    use actix_web::http::header::AUTHORIZATION;
    use actix_web::test;
    use rstest::rstest;
    use serde_json::json;
    use std::sync::Arc;

    fn guarded_state() -> HttpState {
        let mut verifier = MockTokenVerifier::new();
        verifier.expect_verify().returning(|token| {
            if token.as_str() == "good" {
                Ok(Caller::new("user-123"))
            } else {
                Err(AuthError::InvalidSignature)
            }
        });
        let mut state = memory_state();
        state.auth = AuthPolicy::Required(Arc::new(verifier));
        state
    }

    fn new_entry() -> Value {
        json!({"date": "2024-01-01", "title": "Day 1", "content": "Arrived", "mood": "happy"})
    }

    #[rstest]
    #[actix_web::test]
    async fn entries_can_be_created_listed_and_deleted() {
        let app = test::init_service(test_app(memory_state(), SiteRoot::new("public"))).await;

        let req = test::TestRequest::post()
            .uri("/api/journal/entries")
            .set_json(new_entry())
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(created["success"], json!(true));
        assert_eq!(created["entry"]["mood"], json!("happy"));
        let id = created["entry"]["id"].as_str().unwrap_or_default().to_owned();

        let req = test::TestRequest::delete()
            .uri(&format!("/api/journal/entries/{id}"))
            .to_request();
        let deleted: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(deleted["message"], json!("Entry deleted successfully"));

        let req = test::TestRequest::get().uri("/api/journal/entries").to_request();
        let listed: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(listed["entries"], json!([]));
    }

    #[rstest]
    #[case("999")]
    #[case("6f9619ff-8b86-d011-b42d-00c04fc964ff")]
    #[actix_web::test]
    async fn unknown_ids_are_not_found(#[case] id: &str) {
        let app = test::init_service(test_app(memory_state(), SiteRoot::new("public"))).await;

        let req = test::TestRequest::delete()
            .uri(&format!("/api/journal/entries/{id}"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[rstest]
    #[case(None)]
    #[case(Some("Bearer bad"))]
    #[actix_web::test]
    async fn guarded_routes_reject_bad_tokens(#[case] header: Option<&str>) {
        let app = test::init_service(test_app(guarded_state(), SiteRoot::new("public"))).await;

        let mut req = test::TestRequest::post()
            .uri("/api/journal/entries")
            .set_json(new_entry());
        if let Some(value) = header {
            req = req.insert_header((AUTHORIZATION, value));
        }
        let res = test::call_service(&app, req.to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri("/api/journal/entries")
            .insert_header((AUTHORIZATION, "Bearer good"))
            .to_request();
        let listed: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(listed["entries"], json!([]));
    }

    #[rstest]
    #[actix_web::test]
    async fn guarded_routes_admit_valid_tokens() {
        let app = test::init_service(test_app(guarded_state(), SiteRoot::new("public"))).await;

        let req = test::TestRequest::post()
            .uri("/api/journal/entries")
            .insert_header((AUTHORIZATION, "Bearer good"))
            .set_json(new_entry())
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[rstest]
    #[actix_web::test]
    async fn journal_entries_require_content_not_notes() {
        let app = test::init_service(test_app(memory_state(), SiteRoot::new("public"))).await;

        let req = test::TestRequest::post()
            .uri("/api/journal/entries")
            .set_json(json!({"date": "2024-01-01", "title": "Day 1", "notes": "Arrived"}))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["details"]["missingFields"], json!(["content"]));
    }
}
