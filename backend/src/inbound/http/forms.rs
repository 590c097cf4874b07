//! Form submission handlers.
//!
//! ```text
//! POST /api/submit-form {"title":"Day 1","date":"2024-01-01","notes":"Arrived"}
//! GET  /api/submit-form
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde_json::{Map, Value};

use super::ApiResult;
use super::schemas::{
    ErrorEnvelopeSchema, FormEntriesBody, FormEntryBody, FormSubmissionSchema, SubmittedBody,
};
use super::state::HttpState;

/// Store a form submission.
#[utoipa::path(
    post,
    path = "/api/submit-form",
    request_body = FormSubmissionSchema,
    responses(
        (status = 200, description = "Submission stored", body = SubmittedBody),
        (status = 400, description = "Missing fields or malformed body", body = ErrorEnvelopeSchema),
        (status = 500, description = "Store failure", body = ErrorEnvelopeSchema)
    ),
    tags = ["forms"],
    operation_id = "submitForm"
)]
#[post("/api/submit-form")]
pub async fn submit_form(
    state: web::Data<HttpState>,
    payload: web::Json<Map<String, Value>>,
) -> ApiResult<HttpResponse> {
    let entry = state.forms.submit(&payload).await?;
    Ok(HttpResponse::Ok().json(SubmittedBody {
        success: true,
        message: "Form submitted successfully",
        id: *entry.id.as_uuid(),
    }))
}

/// List every stored submission.
#[utoipa::path(
    get,
    path = "/api/submit-form",
    responses(
        (status = 200, description = "Stored submissions", body = FormEntriesBody),
        (status = 500, description = "Store failure", body = ErrorEnvelopeSchema)
    ),
    tags = ["forms"],
    operation_id = "listForms"
)]
#[get("/api/submit-form")]
pub async fn list_forms(state: web::Data<HttpState>) -> ApiResult<web::Json<FormEntriesBody>> {
    let entries = state.forms.list().await?;
    Ok(web::Json(FormEntriesBody {
        success: true,
        entries: entries.into_iter().map(FormEntryBody::from).collect(),
    }))
}
