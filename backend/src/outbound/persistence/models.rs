//! Internal Diesel row structs.
//!
//! These types never leave the persistence layer.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{api_documentation, projects};
use crate::domain::{Documentation, NewDocumentation, NewProject, Project};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProjectRow {
    pub id: Uuid,
    pub project_name: String,
    pub description: Option<String>,
    pub user_id: Uuid,
    #[expect(dead_code, reason = "ordering column, not part of the record")]
    pub created_at: DateTime<Utc>,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Self {
            id: row.id,
            project_name: row.project_name,
            description: row.description,
            user_id: row.user_id,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = projects)]
pub(crate) struct NewProjectRow<'a> {
    pub id: Uuid,
    pub project_name: &'a str,
    pub description: Option<&'a str>,
    pub user_id: Uuid,
}

impl<'a> From<&'a NewProject> for NewProjectRow<'a> {
    fn from(draft: &'a NewProject) -> Self {
        Self {
            id: draft.id(),
            project_name: draft.project_name(),
            description: draft.description(),
            user_id: draft.user_id(),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = api_documentation)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DocumentationRow {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub openapi_schema: Option<serde_json::Value>,
}

impl From<DocumentationRow> for Documentation {
    fn from(row: DocumentationRow) -> Self {
        Self {
            id: row.id,
            project_id: row.project_id,
            title: row.title,
            description: row.description,
            openapi_schema: row.openapi_schema,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = api_documentation)]
pub(crate) struct NewDocumentationRow<'a> {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: &'a str,
    pub description: Option<&'a str>,
}

impl<'a> From<&'a NewDocumentation> for NewDocumentationRow<'a> {
    fn from(draft: &'a NewDocumentation) -> Self {
        Self {
            id: draft.id(),
            project_id: draft.project_id(),
            title: draft.title(),
            description: draft.description(),
        }
    }
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = api_documentation)]
pub(crate) struct SchemaUpdate<'a> {
    pub openapi_schema: &'a serde_json::Value,
    pub updated_at: DateTime<Utc>,
}
