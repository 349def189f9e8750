//! Authenticated GET relay.
//!
//! ```text
//! GET /test  {"url": ..., "apikey": ..., "Authorization": ...}
//! ```
//!
//! The target URL and credentials travel in a JSON body even though the
//! method is GET; the upstream JSON answer is returned unchanged.

use actix_web::{HttpResponse, get, web};
use serde::Deserialize;
use tracing::info;
use utoipa::ToSchema;

use crate::domain::ports::RelayRequest;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, require};

const URL: FieldName = FieldName::new("url");

/// Body of `GET /test`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RelayRequestBody {
    #[schema(example = "https://api.example.com/v1/items")]
    pub url: Option<String>,
    /// Sent upstream as the `apikey` header.
    pub apikey: Option<String>,
    /// Sent upstream as the `Authorization` header.
    #[serde(rename = "Authorization")]
    pub authorization: Option<String>,
}

/// Forward a GET request and return the upstream JSON body.
#[utoipa::path(
    get,
    path = "/test",
    request_body = RelayRequestBody,
    responses(
        (status = 200, description = "Upstream JSON body", body = serde_json::Value),
        (status = 400, description = "Missing or invalid url", body = ErrorSchema),
        (status = 502, description = "Upstream call failed", body = ErrorSchema),
        (status = 503, description = "Upstream timed out", body = ErrorSchema)
    ),
    tags = ["relay"],
    operation_id = "relayRequest"
)]
#[get("/test")]
pub async fn relay(
    state: web::Data<HttpState>,
    payload: web::Json<RelayRequestBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let request = RelayRequest {
        url: require(body.url, URL)?,
        api_key: body.apikey,
        authorization: body.authorization,
    };
    info!(url = %request.url, "relaying request");
    let upstream = state.relay.forward(&request).await?;
    Ok(HttpResponse::Ok().json(upstream))
}
