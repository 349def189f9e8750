//! Port abstraction for API documentation persistence.

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::{Documentation, Error, NewDocumentation};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by documentation repository adapters.
    pub enum DocumentationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "documentation repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "documentation repository query failed: {message}",
    }
}

/// Port for documentation entries and their attached OpenAPI documents.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentationRepository: Send + Sync {
    /// Every stored documentation entry.
    async fn list(&self) -> Result<Vec<Documentation>, DocumentationRepositoryError>;

    /// Entries belonging to one project.
    async fn list_by_project(
        &self,
        project_id: &Uuid,
    ) -> Result<Vec<Documentation>, DocumentationRepositoryError>;

    /// A single entry, if it exists.
    async fn find_by_id(
        &self,
        id: &Uuid,
    ) -> Result<Option<Documentation>, DocumentationRepositoryError>;

    /// Store a new entry and return the stored row.
    async fn insert(
        &self,
        documentation: &NewDocumentation,
    ) -> Result<Documentation, DocumentationRepositoryError>;

    /// Replace the stored OpenAPI document of an entry.
    ///
    /// Returns `None` when no entry has the given identifier.
    async fn update_schema(
        &self,
        id: &Uuid,
        schema: &Value,
    ) -> Result<Option<Documentation>, DocumentationRepositoryError>;
}

/// Fixture implementation used when no database is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDocumentationRepository;

#[async_trait]
impl DocumentationRepository for FixtureDocumentationRepository {
    async fn list(&self) -> Result<Vec<Documentation>, DocumentationRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_by_project(
        &self,
        _project_id: &Uuid,
    ) -> Result<Vec<Documentation>, DocumentationRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_by_id(
        &self,
        _id: &Uuid,
    ) -> Result<Option<Documentation>, DocumentationRepositoryError> {
        Ok(None)
    }

    async fn insert(
        &self,
        documentation: &NewDocumentation,
    ) -> Result<Documentation, DocumentationRepositoryError> {
        Ok(documentation.clone().into_documentation())
    }

    async fn update_schema(
        &self,
        _id: &Uuid,
        _schema: &Value,
    ) -> Result<Option<Documentation>, DocumentationRepositoryError> {
        Ok(None)
    }
}

impl From<DocumentationRepositoryError> for Error {
    fn from(err: DocumentationRepositoryError) -> Self {
        match err {
            DocumentationRepositoryError::Connection { message } => {
                Error::service_unavailable(message)
            }
            DocumentationRepositoryError::Query { message } => Error::internal(message),
        }
    }
}
