//! HTTP mapping for domain errors.
//!
//! Every failure leaves the service as
//! `{"success": false, "code", "message", "details"?, "traceId"?}` with a
//! status derived from the [`ErrorCode`].

use actix_web::error::JsonPayloadError;
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use tracing::debug;

use crate::domain::{Error, ErrorCode};
use crate::middleware::TRACE_ID_HEADER;

/// Result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

#[derive(Serialize)]
struct ErrorEnvelope<'a> {
    success: bool,
    #[serde(flatten)]
    error: &'a Error,
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if error.code() == ErrorCode::InternalError {
        let mut redacted = Error::internal("Internal server error");
        if let Some(id) = error.trace_id() {
            redacted = redacted.with_trace_id(id);
        }
        redacted
    } else {
        error.clone()
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        let body = redact_if_internal(self);
        builder.json(ErrorEnvelope {
            success: false,
            error: &body,
        })
    }
}

/// `JsonConfig` error handler turning body decode failures into the
/// `invalid_request` envelope.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "rejected request body");
    let message = match &err {
        JsonPayloadError::ContentType => "Content-Type must be application/json",
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            "Request body is too large"
        }
        _ => "Request body must be a JSON object",
    };
    Error::invalid_request(message).into()
}

#[cfg(test)]
mod tests;
