//! Test helpers for inbound HTTP components.

use actix_web::{App, web};

use super::payload::json_config;
use super::state::HttpState;
use super::{convert, documentations, projects, relay};

/// Build an app exposing every REST route against `state`.
pub fn test_app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .app_data(json_config())
        .service(convert::convert)
        .service(convert::synthesize)
        .service(relay::relay)
        .service(
            web::scope("/api/v1")
                .service(projects::list_projects)
                .service(projects::list_user_projects)
                .service(projects::add_project)
                .service(documentations::list_documentations)
                .service(documentations::add_documentation)
                .service(documentations::list_project_documentations)
                .service(documentations::documentation_schema)
                .service(documentations::add_documentation_schema),
        )
}
