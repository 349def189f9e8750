//! OpenAPI documentation for the service's own REST API.
//!
//! [`ApiDoc`] registers every handler under [`crate::inbound::http`] together
//! with the schema wrappers from [`crate::inbound::http::schemas`], so domain
//! types stay free of utoipa derives. The document backs Swagger UI in debug
//! builds and is printed by the `openapi-dump` binary.

use crate::inbound::http::convert::{ConvertResponse, SynthesizeRequestBody, SynthesizeResponse};
use crate::inbound::http::documentations::AddDocumentationRequest;
use crate::inbound::http::projects::AddProjectRequest;
use crate::inbound::http::relay::RelayRequestBody;
use crate::inbound::http::schemas::{
    DocumentationSchema, ErrorCodeSchema, ErrorSchema, ProjectSchema,
};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "SchemaForge API",
        description = "Validate, flatten and synthesize OpenAPI 3.0 documents; \
                       store project documentation; relay authenticated requests."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::convert::convert,
        crate::inbound::http::convert::synthesize,
        crate::inbound::http::projects::list_projects,
        crate::inbound::http::projects::list_user_projects,
        crate::inbound::http::projects::add_project,
        crate::inbound::http::documentations::list_documentations,
        crate::inbound::http::documentations::list_project_documentations,
        crate::inbound::http::documentations::add_documentation,
        crate::inbound::http::documentations::documentation_schema,
        crate::inbound::http::documentations::add_documentation_schema,
        crate::inbound::http::relay::relay,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        ProjectSchema,
        DocumentationSchema,
        ConvertResponse,
        SynthesizeRequestBody,
        SynthesizeResponse,
        AddProjectRequest,
        AddDocumentationRequest,
        RelayRequestBody,
    )),
    tags(
        (name = "conversion", description = "OpenAPI validation, flattening and synthesis"),
        (name = "projects", description = "Project records"),
        (name = "documentations", description = "Documentation records and stored schemas"),
        (name = "relay", description = "Authenticated request forwarding"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
