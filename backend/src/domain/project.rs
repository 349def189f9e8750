//! Project data model.
//!
//! A project groups API documentation entries and belongs to one user.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors returned by [`NewProject::try_new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProjectValidationError {
    /// The project name was blank.
    #[error("project_name must not be empty")]
    EmptyName,
}

/// Persisted project record.
///
/// Serialises with the column names clients already consume:
/// `{"id", "project_name", "description", "user_id"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub project_name: String,
    pub description: Option<String>,
    pub user_id: Uuid,
}

/// Validated draft for a project that has not been stored yet.
///
/// # Examples
/// ```
/// use schemaforge::domain::NewProject;
/// use uuid::Uuid;
///
/// let draft = NewProject::try_new("Billing API", None, Uuid::nil()).expect("valid draft");
/// assert_eq!(draft.project_name(), "Billing API");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    id: Uuid,
    project_name: String,
    description: Option<String>,
    user_id: Uuid,
}

impl NewProject {
    /// Validate the draft and assign it a fresh identifier.
    pub fn try_new(
        project_name: impl Into<String>,
        description: Option<String>,
        user_id: Uuid,
    ) -> Result<Self, ProjectValidationError> {
        let project_name = project_name.into();
        if project_name.trim().is_empty() {
            return Err(ProjectValidationError::EmptyName);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            project_name,
            description,
            user_id,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn project_name(&self) -> &str {
        self.project_name.as_str()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    /// The record as it will read back once stored.
    pub fn into_project(self) -> Project {
        Project {
            id: self.id,
            project_name: self.project_name,
            description: self.description,
            user_id: self.user_id,
        }
    }
}
