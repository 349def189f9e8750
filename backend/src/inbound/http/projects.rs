//! Project endpoints.
//!
//! ```text
//! GET  /api/v1/projects
//! GET  /api/v1/projects/user/{user_id}
//! POST /api/v1/projects/add
//! ```

use actix_web::{get, post, web};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::{Error, NewProject, Project, ProjectValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, ProjectSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, blank_field_error, parse_uuid, require};

const PROJECT_NAME: FieldName = FieldName::new("project_name");
const USER_ID: FieldName = FieldName::new("user_id");

/// Body of `POST /api/v1/projects/add`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct AddProjectRequest {
    #[schema(example = "Billing API")]
    pub project_name: Option<String>,
    pub description: Option<String>,
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UserPath {
    user_id: String,
}

fn parse_add_project(body: AddProjectRequest) -> Result<NewProject, Error> {
    let name = require(body.project_name, PROJECT_NAME)?;
    let user_id = parse_uuid(&require(body.user_id, USER_ID)?, USER_ID)?;
    NewProject::try_new(name, body.description, user_id).map_err(|err| match err {
        ProjectValidationError::EmptyName => blank_field_error(PROJECT_NAME),
    })
}

/// List every project.
#[utoipa::path(
    get,
    path = "/api/v1/projects",
    responses(
        (status = 200, description = "All projects", body = [ProjectSchema]),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["projects"],
    operation_id = "listProjects"
)]
#[get("/projects")]
pub async fn list_projects(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Project>>> {
    Ok(web::Json(state.projects.list().await?))
}

/// List the projects owned by one user.
#[utoipa::path(
    get,
    path = "/api/v1/projects/user/{user_id}",
    params(("user_id" = String, Path, description = "Owner identifier")),
    responses(
        (status = 200, description = "Projects of the user", body = [ProjectSchema]),
        (status = 400, description = "Invalid user id", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["projects"],
    operation_id = "listUserProjects"
)]
#[get("/projects/user/{user_id}")]
pub async fn list_user_projects(
    state: web::Data<HttpState>,
    path: web::Path<UserPath>,
) -> ApiResult<web::Json<Vec<Project>>> {
    let user_id = parse_uuid(&path.user_id, USER_ID)?;
    Ok(web::Json(state.projects.list_by_user(&user_id).await?))
}

/// Store a project and return the inserted rows.
#[utoipa::path(
    post,
    path = "/api/v1/projects/add",
    request_body = AddProjectRequest,
    responses(
        (status = 200, description = "Inserted project", body = [ProjectSchema]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["projects"],
    operation_id = "addProject"
)]
#[post("/projects/add")]
pub async fn add_project(
    state: web::Data<HttpState>,
    payload: web::Json<AddProjectRequest>,
) -> ApiResult<web::Json<Vec<Project>>> {
    let draft = parse_add_project(payload.into_inner())?;
    let project = state.projects.insert(&draft).await?;
    Ok(web::Json(vec![project]))
}
