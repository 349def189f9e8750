//! Port abstraction for project persistence adapters and their errors.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Error, NewProject, Project};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by project repository adapters.
    pub enum ProjectRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "project repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "project repository query failed: {message}",
    }
}

/// Port for reading and creating projects.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Every stored project.
    async fn list(&self) -> Result<Vec<Project>, ProjectRepositoryError>;

    /// Projects owned by one user.
    async fn list_by_user(&self, user_id: &Uuid) -> Result<Vec<Project>, ProjectRepositoryError>;

    /// Store a new project and return the stored row.
    async fn insert(&self, project: &NewProject) -> Result<Project, ProjectRepositoryError>;
}

/// Fixture implementation used when no database is configured.
///
/// Reads return nothing; inserts echo the draft back without storing it.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureProjectRepository;

#[async_trait]
impl ProjectRepository for FixtureProjectRepository {
    async fn list(&self) -> Result<Vec<Project>, ProjectRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_by_user(&self, _user_id: &Uuid) -> Result<Vec<Project>, ProjectRepositoryError> {
        Ok(Vec::new())
    }

    async fn insert(&self, project: &NewProject) -> Result<Project, ProjectRepositoryError> {
        Ok(project.clone().into_project())
    }
}

impl From<ProjectRepositoryError> for Error {
    fn from(err: ProjectRepositoryError) -> Self {
        match err {
            ProjectRepositoryError::Connection { message } => Error::service_unavailable(message),
            ProjectRepositoryError::Query { message } => Error::internal(message),
        }
    }
}
