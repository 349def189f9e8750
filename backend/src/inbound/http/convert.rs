//! Conversion endpoints.
//!
//! ```text
//! POST /convert          OpenAPI document -> flattened operations
//! POST /convert/openapi  example payloads -> synthesized OpenAPI document
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use utoipa::ToSchema;

use crate::domain::openapi::{FlattenedApi, SynthesisRequest, SynthesizedDocument};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Response wrapping the flattened operations.
#[derive(Debug, Serialize, ToSchema)]
pub struct ConvertResponse {
    /// Path -> uppercase method -> operation summary.
    #[schema(value_type = serde_json::Value)]
    pub ans: FlattenedApi,
}

/// Example payloads to infer a document from.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SynthesizeRequestBody {
    /// Example request body; must be a non-empty object.
    #[schema(value_type = Option<serde_json::Value>)]
    pub input: Option<Value>,
    /// Example response body; must be a non-empty object.
    #[schema(value_type = Option<serde_json::Value>)]
    pub output: Option<Value>,
    /// Parameter objects copied verbatim into the operation.
    #[schema(value_type = Option<Vec<serde_json::Value>>)]
    pub parameters: Option<Vec<Value>>,
}

impl From<SynthesizeRequestBody> for SynthesisRequest {
    fn from(body: SynthesizeRequestBody) -> Self {
        Self {
            input: body.input,
            output: body.output,
            parameters: body.parameters,
        }
    }
}

/// Response wrapping the synthesized document.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SynthesizeResponse {
    #[schema(value_type = serde_json::Value)]
    pub openapi_schema: SynthesizedDocument,
}

/// Validate an OpenAPI 3.0 document and return its flattened operations.
///
/// Reference resolution is abandoned when the client goes away: dropping the
/// handler future cancels the token handed to the pipeline.
#[utoipa::path(
    post,
    path = "/convert",
    request_body(content = serde_json::Value, description = "OpenAPI 3.0 document"),
    responses(
        (status = 200, description = "Flattened operations", body = ConvertResponse),
        (status = 400, description = "Empty or invalid document", body = ErrorSchema),
        (status = 422, description = "Unresolvable reference or no paths", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["conversion"],
    operation_id = "convertDocument"
)]
#[post("/convert")]
pub async fn convert(
    state: web::Data<HttpState>,
    payload: web::Json<Value>,
) -> ApiResult<web::Json<ConvertResponse>> {
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();
    let ans = state
        .conversion
        .convert(payload.into_inner(), &cancel)
        .await?;
    Ok(web::Json(ConvertResponse { ans }))
}

/// Infer a single-operation OpenAPI document from example payloads.
#[utoipa::path(
    post,
    path = "/convert/openapi",
    request_body = SynthesizeRequestBody,
    responses(
        (status = 200, description = "Synthesized document", body = SynthesizeResponse),
        (status = 400, description = "Missing or empty examples", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["conversion"],
    operation_id = "synthesizeDocument"
)]
#[post("/convert/openapi")]
pub async fn synthesize(
    state: web::Data<HttpState>,
    payload: web::Json<SynthesizeRequestBody>,
) -> ApiResult<web::Json<SynthesizeResponse>> {
    let openapi_schema = state
        .conversion
        .synthesize(payload.into_inner().into())
        .await?;
    Ok(web::Json(SynthesizeResponse { openapi_schema }))
}

#[cfg(test)]
#[path = "convert_tests.rs"]
mod tests;
