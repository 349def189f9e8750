//! Tests for HTTP error mapping.

use super::*;
use crate::domain::Error;
use actix_web::ResponseError;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[fixture]
fn internal_error_case(expected_trace_id: String) -> Error {
    Error::internal("boom")
        .with_trace_id(expected_trace_id)
        .with_details(json!({"secret": "x"}))
}

#[fixture]
fn invalid_document_case(expected_trace_id: String) -> Error {
    Error::invalid_request("Invalid OpenAPI schema")
        .with_trace_id(expected_trace_id)
        .with_details(json!({"message": "must have required property 'info'"}))
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::unresolvable_reference("cycle"), StatusCode::UNPROCESSABLE_ENTITY)]
#[case(Error::empty_schema("no paths"), StatusCode::UNPROCESSABLE_ENTITY)]
#[case(Error::cancelled("gone"), StatusCode::REQUEST_TIMEOUT)]
#[case(Error::usage("misuse"), StatusCode::INTERNAL_SERVER_ERROR)]
#[case(Error::upstream_failure("502 from upstream"), StatusCode::BAD_GATEWAY)]
#[case(Error::service_unavailable("db down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] err: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&err), status);
}

async fn assert_error_response(
    error: Error,
    expected_status: StatusCode,
    expected_trace_id: Option<&str>,
) -> serde_json::Value {
    let response = ResponseError::error_response(&error);
    assert_eq!(response.status(), expected_status);

    let header = response.headers().get(TRACE_ID_HEADER);
    match expected_trace_id {
        Some(expected) => {
            let trace_id = header
                .expect("trace-id header is set by error_response")
                .to_str()
                .expect("trace-id not valid UTF-8");
            assert_eq!(trace_id, expected);
        }
        None => assert!(header.is_none(), "trace-id header should not be present"),
    }

    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");

    serde_json::from_slice(&bytes).expect("error JSON deserialisation succeeds")
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted(
    #[from(internal_error_case)] internal_error: Error,
    expected_trace_id: String,
) {
    let body = assert_error_response(
        internal_error,
        StatusCode::INTERNAL_SERVER_ERROR,
        Some(expected_trace_id.as_str()),
    )
    .await;
    assert_eq!(
        body,
        json!({
            "code": "internal_error",
            "error": "Internal server error",
            "traceId": TRACE_ID,
        })
    );
}

#[rstest]
#[actix_web::test]
async fn client_errors_keep_message_and_details(
    #[from(invalid_document_case)] invalid: Error,
    expected_trace_id: String,
) {
    let body =
        assert_error_response(invalid, StatusCode::BAD_REQUEST, Some(expected_trace_id.as_str()))
            .await;
    assert_eq!(body["code"], json!("invalid_request"));
    assert_eq!(body["error"], json!("Invalid OpenAPI schema"));
    assert_eq!(
        body["details"]["message"],
        json!("must have required property 'info'")
    );
}

#[rstest]
#[actix_web::test]
async fn usage_errors_are_not_redacted() {
    let body = assert_error_response(
        Error::usage("duplicate path /a"),
        StatusCode::INTERNAL_SERVER_ERROR,
        None,
    )
    .await;
    assert_eq!(body["code"], json!("usage_error"));
    assert_eq!(body["error"], json!("duplicate path /a"));
}

#[rstest]
#[actix_web::test]
async fn error_without_trace_id_omits_trace_header() {
    let error = Error::empty_schema("Invalid schema: No paths found");

    let body = assert_error_response(error, StatusCode::UNPROCESSABLE_ENTITY, None).await;
    assert!(body.get("traceId").is_none());
    assert_eq!(body["error"], json!("Invalid schema: No paths found"));
}

#[rstest]
fn redaction_keeps_the_trace_id() {
    let error = Error::internal("connection string leaked").with_trace_id(TRACE_ID);
    let redacted = redact_if_internal(&error);
    assert_eq!(redacted.message(), "Internal server error");
    assert_eq!(redacted.trace_id(), Some(TRACE_ID));
    assert!(redacted.details().is_none());
}

#[test]
fn from_actix_error_is_redacted_internal_error() {
    use actix_web::error;

    let actix_err = error::ErrorBadRequest("boom");
    let err: Error = actix_err.into();

    assert_eq!(err.code(), ErrorCode::InternalError);
    assert_eq!(err.message(), "Internal server error");
    assert_eq!(err.trace_id(), None);
    assert_eq!(err.details(), None);
}
