//! API documentation data model.
//!
//! A documentation entry belongs to a project and optionally stores the
//! OpenAPI document clients attached to it.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Validation errors returned by [`NewDocumentation::try_new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentationValidationError {
    /// The title was blank.
    #[error("title must not be empty")]
    EmptyTitle,
}

/// Persisted documentation record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Documentation {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub openapi_schema: Option<Value>,
}

/// Validated draft for a documentation entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocumentation {
    id: Uuid,
    project_id: Uuid,
    title: String,
    description: Option<String>,
}

impl NewDocumentation {
    /// Validate the draft and assign it a fresh identifier.
    pub fn try_new(
        project_id: Uuid,
        title: impl Into<String>,
        description: Option<String>,
    ) -> Result<Self, DocumentationValidationError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(DocumentationValidationError::EmptyTitle);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            project_id,
            title,
            description,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn project_id(&self) -> Uuid {
        self.project_id
    }

    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The record as it will read back once stored; no schema is attached yet.
    pub fn into_documentation(self) -> Documentation {
        Documentation {
            id: self.id,
            project_id: self.project_id,
            title: self.title,
            description: self.description,
            openapi_schema: None,
        }
    }
}
