//! Documentation endpoints.
//!
//! ```text
//! GET  /api/v1/documentations
//! GET  /api/v1/documentations/{project_id}
//! POST /api/v1/documentations/add
//! GET  /api/v1/documentation/{doc_id}/schema
//! POST /api/v1/documentations/{doc_id}/add/schema
//! ```
//!
//! Entries are returned as arrays even when a single row is addressed, which
//! is the shape existing clients consume.

use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::{DocumentationValidationError, Error, NewDocumentation};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{DocumentationSchema, ErrorSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, blank_field_error, parse_uuid, require};

const PROJECT_ID: FieldName = FieldName::new("project_id");
const TITLE: FieldName = FieldName::new("title");
const DOC_ID: FieldName = FieldName::new("doc_id");

/// Body of `POST /api/v1/documentations/add`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct AddDocumentationRequest {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub project_id: Option<String>,
    #[schema(example = "Payments v2")]
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProjectPath {
    project_id: String,
}

#[derive(Debug, Deserialize)]
pub struct DocumentationPath {
    doc_id: String,
}

fn parse_add_documentation(body: AddDocumentationRequest) -> Result<NewDocumentation, Error> {
    let project_id = parse_uuid(&require(body.project_id, PROJECT_ID)?, PROJECT_ID)?;
    let title = require(body.title, TITLE)?;
    NewDocumentation::try_new(project_id, title, body.description).map_err(|err| match err {
        DocumentationValidationError::EmptyTitle => blank_field_error(TITLE),
    })
}

/// List every documentation entry.
#[utoipa::path(
    get,
    path = "/api/v1/documentations",
    responses(
        (status = 200, description = "All documentation entries", body = [DocumentationSchema]),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["documentations"],
    operation_id = "listDocumentations"
)]
#[get("/documentations")]
pub async fn list_documentations(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let entries = state.documentations.list().await?;
    Ok(HttpResponse::Ok().json(entries))
}

/// List the documentation entries of one project.
#[utoipa::path(
    get,
    path = "/api/v1/documentations/{project_id}",
    params(("project_id" = String, Path, description = "Owning project")),
    responses(
        (status = 200, description = "Entries of the project", body = [DocumentationSchema]),
        (status = 400, description = "Invalid project id", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["documentations"],
    operation_id = "listProjectDocumentations"
)]
#[get("/documentations/{project_id}")]
pub async fn list_project_documentations(
    state: web::Data<HttpState>,
    path: web::Path<ProjectPath>,
) -> ApiResult<HttpResponse> {
    let project_id = parse_uuid(&path.project_id, PROJECT_ID)?;
    let entries = state.documentations.list_by_project(&project_id).await?;
    Ok(HttpResponse::Ok().json(entries))
}

/// Store a documentation entry without a schema.
#[utoipa::path(
    post,
    path = "/api/v1/documentations/add",
    request_body = AddDocumentationRequest,
    responses(
        (status = 201, description = "Inserted entry", body = [DocumentationSchema]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["documentations"],
    operation_id = "addDocumentation"
)]
#[post("/documentations/add")]
pub async fn add_documentation(
    state: web::Data<HttpState>,
    payload: web::Json<AddDocumentationRequest>,
) -> ApiResult<HttpResponse> {
    let draft = parse_add_documentation(payload.into_inner())?;
    let stored = state.documentations.insert(&draft).await?;
    Ok(HttpResponse::Created().json(vec![stored]))
}

/// Fetch one entry together with its stored schema.
///
/// An unknown identifier yields an empty array.
#[utoipa::path(
    get,
    path = "/api/v1/documentation/{doc_id}/schema",
    params(("doc_id" = String, Path, description = "Documentation identifier")),
    responses(
        (status = 200, description = "Matching entries", body = [DocumentationSchema]),
        (status = 400, description = "Invalid documentation id", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["documentations"],
    operation_id = "getDocumentationSchema"
)]
#[get("/documentation/{doc_id}/schema")]
pub async fn documentation_schema(
    state: web::Data<HttpState>,
    path: web::Path<DocumentationPath>,
) -> ApiResult<HttpResponse> {
    let doc_id = parse_uuid(&path.doc_id, DOC_ID)?;
    let entry = state.documentations.find_by_id(&doc_id).await?;
    Ok(HttpResponse::Ok().json(entry.into_iter().collect::<Vec<_>>()))
}

/// Attach an OpenAPI document to an entry, replacing any previous one.
#[utoipa::path(
    post,
    path = "/api/v1/documentations/{doc_id}/add/schema",
    params(("doc_id" = String, Path, description = "Documentation identifier")),
    request_body(content = serde_json::Value, description = "OpenAPI document to store"),
    responses(
        (status = 201, description = "Updated entry", body = [DocumentationSchema]),
        (status = 400, description = "Invalid documentation id", body = ErrorSchema),
        (status = 404, description = "Unknown documentation id", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["documentations"],
    operation_id = "addDocumentationSchema"
)]
#[post("/documentations/{doc_id}/add/schema")]
pub async fn add_documentation_schema(
    state: web::Data<HttpState>,
    path: web::Path<DocumentationPath>,
    payload: web::Json<Value>,
) -> ApiResult<HttpResponse> {
    let doc_id = parse_uuid(&path.doc_id, DOC_ID)?;
    let schema = payload.into_inner();
    let updated = state
        .documentations
        .update_schema(&doc_id, &schema)
        .await?
        .ok_or_else(|| Error::not_found(format!("documentation {doc_id} not found")))?;
    Ok(HttpResponse::Created().json(vec![updated]))
}

#[cfg(test)]
#[path = "documentations_tests.rs"]
mod tests;
