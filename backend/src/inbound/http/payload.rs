//! JSON body extraction settings shared by every route.
//!
//! Extraction failures are reported with the same envelope as domain errors
//! instead of actix's plain-text defaults.

use actix_web::{HttpRequest, error::JsonPayloadError, web};
use serde_json::json;
use tracing::debug;

use crate::domain::Error;

/// Largest accepted request body (10 MiB); OpenAPI documents can be large.
pub const JSON_BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Build the [`web::JsonConfig`] registered as app data.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use schemaforge::inbound::http::payload::json_config;
///
/// let _app = App::new().app_data(json_config());
/// ```
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_BODY_LIMIT)
        .error_handler(|err, req| payload_error(err, req).into())
}

fn payload_error(err: JsonPayloadError, req: &HttpRequest) -> Error {
    debug!(error = %err, path = %req.path(), "rejected request body");
    match err {
        JsonPayloadError::OverflowKnownLength { length, limit } => {
            Error::invalid_request("Request body too large")
                .with_details(json!({ "length": length, "limit": limit }))
        }
        JsonPayloadError::Overflow { limit } => {
            Error::invalid_request("Request body too large").with_details(json!({ "limit": limit }))
        }
        JsonPayloadError::ContentType => {
            Error::invalid_request("Content-Type must be application/json")
        }
        JsonPayloadError::Deserialize(source) if source.is_eof() => {
            Error::invalid_request("No data provided")
        }
        JsonPayloadError::Deserialize(source) => Error::invalid_request("Malformed JSON body")
            .with_details(json!({ "reason": source.to_string() })),
        other => Error::invalid_request("Malformed JSON body")
            .with_details(json!({ "reason": other.to_string() })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use rstest::rstest;

    #[rstest]
    fn empty_bodies_read_as_no_data() {
        let source = serde_json::from_str::<serde_json::Value>("").expect_err("eof");
        let req = TestRequest::default().to_http_request();
        let err = payload_error(JsonPayloadError::Deserialize(source), &req);
        assert_eq!(err.message(), "No data provided");
    }

    #[rstest]
    fn syntax_errors_carry_the_parser_reason() {
        let source = serde_json::from_str::<serde_json::Value>("{nope}").expect_err("syntax");
        let req = TestRequest::default().to_http_request();
        let err = payload_error(JsonPayloadError::Deserialize(source), &req);
        assert_eq!(err.message(), "Malformed JSON body");
        assert!(err.details().and_then(|d| d.get("reason")).is_some());
    }

    #[rstest]
    fn oversize_bodies_report_the_limit() {
        let req = TestRequest::default().to_http_request();
        let err = payload_error(
            JsonPayloadError::OverflowKnownLength {
                length: JSON_BODY_LIMIT + 1,
                limit: JSON_BODY_LIMIT,
            },
            &req,
        );
        assert_eq!(
            err.details().and_then(|d| d.get("limit")),
            Some(&json!(JSON_BODY_LIMIT))
        );
    }
}
