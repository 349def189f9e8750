//! Builders wiring outbound adapters into the HTTP state.

use std::sync::Arc;

use actix_web::web;

use schemaforge::domain::ConversionService;
use schemaforge::domain::openapi::Dereferencer;
use schemaforge::inbound::http::state::HttpState;
use schemaforge::outbound::http::{ReqwestHttpRelay, ReqwestReferenceSource};
use schemaforge::outbound::persistence::{
    DbPool, DieselDocumentationRepository, DieselProjectRepository,
};
use tracing::info;

use super::{AdapterSettings, ServerConfig};

fn client_error(err: reqwest::Error) -> std::io::Error {
    std::io::Error::other(format!("http client construction failed: {err}"))
}

/// Build the conversion service with a network-backed reference source.
fn build_conversion(adapters: &AdapterSettings) -> std::io::Result<ConversionService> {
    let source = ReqwestReferenceSource::new(adapters.reference_timeout).map_err(client_error)?;
    let dereferencer = Dereferencer::new(Arc::new(source))
        .with_max_depth(adapters.reference_max_depth)
        .with_max_nodes(adapters.reference_max_nodes)
        .with_max_documents(adapters.reference_max_documents);
    Ok(ConversionService::new(dereferencer).with_synthesis_max_depth(adapters.synthesis_max_depth))
}

fn attach_repositories(state: HttpState, pool: Option<&DbPool>) -> HttpState {
    match pool {
        Some(pool) => state.with_repositories(
            Arc::new(DieselProjectRepository::new(pool.clone())),
            Arc::new(DieselDocumentationRepository::new(pool.clone())),
        ),
        None => {
            info!("persistence ports served by fixtures");
            state
        }
    }
}

/// Build the shared HTTP state from the server configuration.
///
/// # Errors
/// Returns [`std::io::Error`] when an HTTP client cannot be constructed.
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let conversion = build_conversion(&config.adapters)?;
    let relay = ReqwestHttpRelay::new(config.adapters.relay_timeout).map_err(client_error)?;
    let state = HttpState::new(Arc::new(conversion)).with_relay(Arc::new(relay));
    Ok(web::Data::new(attach_repositories(
        state,
        config.db_pool.as_ref(),
    )))
}
