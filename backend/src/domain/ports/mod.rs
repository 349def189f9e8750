//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod document_conversion;
mod documentation_repository;
mod http_relay;
mod project_repository;
mod reference_source;

#[cfg(test)]
pub use document_conversion::MockDocumentConversion;
pub use document_conversion::DocumentConversion;
#[cfg(test)]
pub use documentation_repository::MockDocumentationRepository;
pub use documentation_repository::{
    DocumentationRepository, DocumentationRepositoryError, FixtureDocumentationRepository,
};
#[cfg(test)]
pub use http_relay::MockHttpRelay;
pub use http_relay::{FixtureHttpRelay, HttpRelay, HttpRelayError, RelayRequest};
#[cfg(test)]
pub use project_repository::MockProjectRepository;
pub use project_repository::{FixtureProjectRepository, ProjectRepository, ProjectRepositoryError};
#[cfg(test)]
pub use reference_source::MockReferenceSource;
pub use reference_source::{FixtureReferenceSource, ReferenceSource, ReferenceSourceError};
