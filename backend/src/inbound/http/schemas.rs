//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for the service's own
//! OpenAPI document using utoipa's external schema registration. Each wrapper
//! carries the serde attributes of the payload it documents so field names
//! match the wire format.

use serde::Serialize;
use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCodeSchema {
    /// The request or document is malformed or fails validation.
    InvalidRequest,
    /// The requested resource does not exist.
    NotFound,
    /// A `$ref` could not be resolved.
    UnresolvableReference,
    /// The document declares no paths.
    EmptySchema,
    /// Reference resolution was abandoned.
    Cancelled,
    /// The pipeline was driven incorrectly.
    UsageError,
    /// A relayed upstream call failed.
    UpstreamFailure,
    /// A backing service is unavailable.
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::Error)]
#[serde(rename_all = "camelCase")]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[serde(rename = "error")]
    #[schema(example = "Invalid OpenAPI schema")]
    message: String,
    /// Correlation identifier, echoed in the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details, such as validation defects.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::Project`].
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::Project)]
pub struct ProjectSchema {
    #[schema(value_type = String, example = "6c2a6f0e-2f51-4c8e-9f0e-1e5b3c4d5a6b")]
    id: String,
    #[schema(example = "Billing API")]
    project_name: String,
    description: Option<String>,
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    user_id: String,
}

/// OpenAPI schema for [`crate::domain::Documentation`].
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::Documentation)]
pub struct DocumentationSchema {
    #[schema(value_type = String)]
    id: String,
    #[schema(value_type = String)]
    project_id: String,
    #[schema(example = "Payments v2")]
    title: String,
    description: Option<String>,
    /// Stored OpenAPI document, if one was attached.
    openapi_schema: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::PartialSchema;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[test]
    fn error_schema_uses_wire_field_names() {
        let schema_json = schema_to_json::<ErrorSchema>();
        assert_eq!(ErrorSchema::name(), "crate.domain.Error");
        assert!(schema_json.contains("\"error\""), "message is sent as error");
        assert!(schema_json.contains("traceId"), "trace id is camelCase");
    }

    #[test]
    fn error_code_schema_variants_match_domain() {
        let schema_json = schema_to_json::<ErrorCodeSchema>();
        for code in [
            "invalid_request",
            "not_found",
            "unresolvable_reference",
            "empty_schema",
            "cancelled",
            "usage_error",
            "upstream_failure",
            "service_unavailable",
            "internal_error",
        ] {
            assert!(schema_json.contains(code), "missing {code}");
        }
    }

    #[test]
    fn project_schema_has_expected_name() {
        assert_eq!(ProjectSchema::name(), "crate.domain.Project");
        assert!(schema_to_json::<ProjectSchema>().contains("project_name"));
    }

    #[test]
    fn documentation_schema_exposes_the_stored_document() {
        assert!(schema_to_json::<DocumentationSchema>().contains("openapi_schema"));
    }
}
