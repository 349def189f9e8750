//! PostgreSQL-backed `DocumentationRepository` implementation using Diesel ORM.
//!
//! Attached OpenAPI documents are stored verbatim in a `jsonb` column.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::ports::{DocumentationRepository, DocumentationRepositoryError};
use crate::domain::{Documentation, NewDocumentation};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{DocumentationRow, NewDocumentationRow, SchemaUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::api_documentation;

/// Diesel-backed implementation of the documentation repository port.
#[derive(Clone)]
pub struct DieselDocumentationRepository {
    pool: DbPool,
}

impl DieselDocumentationRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> DocumentationRepositoryError {
    map_basic_pool_error(error, |message| {
        DocumentationRepositoryError::connection(message)
    })
}

fn map_diesel_error(error: diesel::result::Error) -> DocumentationRepositoryError {
    map_basic_diesel_error(
        error,
        DocumentationRepositoryError::query,
        DocumentationRepositoryError::connection,
    )
}

fn into_documentation(rows: Vec<DocumentationRow>) -> Vec<Documentation> {
    rows.into_iter().map(Documentation::from).collect()
}

#[async_trait]
impl DocumentationRepository for DieselDocumentationRepository {
    async fn list(&self) -> Result<Vec<Documentation>, DocumentationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = api_documentation::table
            .select(DocumentationRow::as_select())
            .order_by(api_documentation::created_at)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(into_documentation(rows))
    }

    async fn list_by_project(
        &self,
        project_id: &Uuid,
    ) -> Result<Vec<Documentation>, DocumentationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = api_documentation::table
            .filter(api_documentation::project_id.eq(*project_id))
            .select(DocumentationRow::as_select())
            .order_by(api_documentation::created_at)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(into_documentation(rows))
    }

    async fn find_by_id(
        &self,
        id: &Uuid,
    ) -> Result<Option<Documentation>, DocumentationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<DocumentationRow> = api_documentation::table
            .find(*id)
            .select(DocumentationRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Documentation::from))
    }

    async fn insert(
        &self,
        documentation: &NewDocumentation,
    ) -> Result<Documentation, DocumentationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: DocumentationRow = diesel::insert_into(api_documentation::table)
            .values(NewDocumentationRow::from(documentation))
            .returning(DocumentationRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(row.into())
    }

    async fn update_schema(
        &self,
        id: &Uuid,
        schema: &Value,
    ) -> Result<Option<Documentation>, DocumentationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<DocumentationRow> = diesel::update(api_documentation::table.find(*id))
            .set(SchemaUpdate {
                openapi_schema: schema,
                updated_at: Utc::now(),
            })
            .returning(DocumentationRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Documentation::from))
    }
}
