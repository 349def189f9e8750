//! Tests for domain error construction and serialisation.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
fn convenience_constructors_set_codes() {
    let cases = [
        (Error::invalid_request("bad"), ErrorCode::InvalidRequest),
        (Error::not_found("missing"), ErrorCode::NotFound),
        (
            Error::unresolvable_reference("dangling"),
            ErrorCode::UnresolvableReference,
        ),
        (Error::empty_schema("no paths"), ErrorCode::EmptySchema),
        (Error::cancelled("stopped"), ErrorCode::Cancelled),
        (Error::usage("misuse"), ErrorCode::UsageError),
        (Error::upstream_failure("502"), ErrorCode::UpstreamFailure),
        (Error::service_unavailable("db"), ErrorCode::ServiceUnavailable),
        (Error::internal("boom"), ErrorCode::InternalError),
    ];
    for (err, code) in cases {
        assert_eq!(err.code(), code);
    }
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
fn new_substitutes_a_generic_message_for_blank_input() {
    let err = Error::new(ErrorCode::InternalError, "");
    assert_eq!(err.message(), "Unknown error");
}

#[rstest]
fn try_with_trace_id_rejects_empty_values() {
    let result = Error::invalid_request("bad").try_with_trace_id("   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyTraceId)));
}

#[rstest]
#[tokio::test]
async fn new_captures_trace_id_in_scope(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id.parse().expect("valid UUID");
    let error = TraceId::scope(trace_id, async move { Error::internal("boom") }).await;

    assert_eq!(error.trace_id(), Some(expected_trace_id.as_str()));
}

#[rstest]
fn serialises_message_under_error_key(expected_trace_id: String) {
    let err = Error::invalid_request("Invalid OpenAPI schema")
        .with_details(json!("paths must be an object"))
        .with_trace_id(expected_trace_id.clone());

    let value = serde_json::to_value(&err).expect("error serialises");
    assert_eq!(
        value,
        json!({
            "code": "invalid_request",
            "error": "Invalid OpenAPI schema",
            "traceId": expected_trace_id,
            "details": "paths must be an object",
        })
    );
}

#[rstest]
fn omits_absent_optional_fields() {
    let value = serde_json::to_value(Error::empty_schema("no paths")).expect("error serialises");
    assert_eq!(value, json!({ "code": "empty_schema", "error": "no paths" }));
}

#[rstest]
#[case(json!({ "code": "not_found", "error": "  " }))]
#[case(json!({ "code": "not_found", "error": "gone", "traceId": "" }))]
fn deserialisation_enforces_invariants(#[case] payload: Value) {
    let result: Result<Error, _> = serde_json::from_value(payload);
    assert!(result.is_err());
}

#[rstest]
fn round_trips_through_json() {
    let err = Error::unresolvable_reference("missing #/components/schemas/Pet")
        .with_details(json!({ "reference": "#/components/schemas/Pet" }));
    let decoded: Error =
        serde_json::from_value(serde_json::to_value(&err).expect("serialises")).expect("decodes");
    assert_eq!(decoded, err);
}
