//! Tests for HTTP error mapping.

use super::*;
use actix_web::body::to_bytes;
use actix_web::test::TestRequest;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn internal_error() -> Error {
    Error::internal("connection refused by 10.0.0.5")
        .with_trace_id(TRACE_ID)
        .with_details(json!({"secret": "x"}))
}

async fn envelope(response: HttpResponse) -> Value {
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    serde_json::from_slice(&bytes).expect("error envelope is JSON")
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("no auth"), StatusCode::UNAUTHORIZED)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::service_unavailable("keys down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] error: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), status);
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted(internal_error: Error) {
    let response = ResponseError::error_response(&internal_error);
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response
            .headers()
            .get(TRACE_ID_HEADER)
            .and_then(|value| value.to_str().ok()),
        Some(TRACE_ID)
    );

    let body = envelope(response).await;
    assert_eq!(
        body,
        json!({
            "success": false,
            "code": "internal_error",
            "message": "Internal server error",
            "traceId": TRACE_ID,
        })
    );
}

#[rstest]
#[actix_web::test]
async fn client_errors_keep_message_and_details() {
    let error = Error::invalid_request("Missing required fields: date")
        .with_details(json!({"missingFields": ["date"]}));

    let response = ResponseError::error_response(&error);
    assert!(response.headers().get(TRACE_ID_HEADER).is_none());

    let body = envelope(response).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["code"], json!("invalid_request"));
    assert_eq!(body["message"], json!("Missing required fields: date"));
    assert_eq!(body["details"]["missingFields"], json!(["date"]));
    assert!(body.get("traceId").is_none());
}

#[rstest]
#[case(JsonPayloadError::ContentType, "Content-Type must be application/json")]
#[case(
    JsonPayloadError::Deserialize(
        serde_json::from_str::<serde_json::Map<String, Value>>("[1]")
            .expect_err("arrays are not objects")
    ),
    "Request body must be a JSON object"
)]
#[actix_web::test]
async fn malformed_bodies_become_invalid_requests(
    #[case] error: JsonPayloadError,
    #[case] message: &str,
) {
    let req = TestRequest::default().to_http_request();
    let response = json_error_handler(error, &req).error_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = envelope(response).await;
    assert_eq!(body["code"], json!("invalid_request"));
    assert_eq!(body["message"], json!(message));
}
