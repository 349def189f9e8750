//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly.

diesel::table! {
    /// Projects grouping API documentation, one owner each.
    projects (id) {
        id -> Uuid,
        project_name -> Text,
        description -> Nullable<Text>,
        user_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Documentation entries and the OpenAPI document attached to them.
    api_documentation (id) {
        id -> Uuid,
        project_id -> Uuid,
        title -> Text,
        description -> Nullable<Text>,
        openapi_schema -> Nullable<Jsonb>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(api_documentation -> projects (project_id));
diesel::allow_tables_to_appear_in_same_query!(projects, api_documentation);
