//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    DocumentConversion, DocumentationRepository, FixtureDocumentationRepository,
    FixtureHttpRelay, FixtureProjectRepository, HttpRelay, ProjectRepository,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub conversion: Arc<dyn DocumentConversion>,
    pub projects: Arc<dyn ProjectRepository>,
    pub documentations: Arc<dyn DocumentationRepository>,
    pub relay: Arc<dyn HttpRelay>,
}

impl HttpState {
    /// Construct state around a conversion port, backing every other port
    /// with its fixture.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use schemaforge::domain::ConversionService;
    /// use schemaforge::domain::openapi::Dereferencer;
    /// use schemaforge::domain::ports::FixtureReferenceSource;
    /// use schemaforge::inbound::http::state::HttpState;
    ///
    /// let service = ConversionService::new(Dereferencer::new(Arc::new(FixtureReferenceSource)));
    /// let state = HttpState::new(Arc::new(service));
    /// let _relay = state.relay.clone();
    /// ```
    pub fn new(conversion: Arc<dyn DocumentConversion>) -> Self {
        Self {
            conversion,
            projects: Arc::new(FixtureProjectRepository),
            documentations: Arc::new(FixtureDocumentationRepository),
            relay: Arc::new(FixtureHttpRelay),
        }
    }

    /// Replace the persistence ports.
    #[must_use]
    pub fn with_repositories(
        mut self,
        projects: Arc<dyn ProjectRepository>,
        documentations: Arc<dyn DocumentationRepository>,
    ) -> Self {
        self.projects = projects;
        self.documentations = documentations;
        self
    }

    /// Replace the relay port.
    #[must_use]
    pub fn with_relay(mut self, relay: Arc<dyn HttpRelay>) -> Self {
        self.relay = relay;
        self
    }
}
