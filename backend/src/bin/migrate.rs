//! Apply pending database migrations.
//!
//! Reads the database URL the same way the server does (`--database-url` or
//! `SCHEMAFORGE_DATABASE_URL`) and runs every migration embedded from
//! `backend/migrations`.

use std::error::Error;

use diesel::Connection;
use diesel::pg::PgConnection;
use ortho_config::OrthoConfig;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use schemaforge::settings::AppSettings;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let settings = AppSettings::load().map_err(|e| format!("failed to load settings: {e}"))?;
    let url = settings
        .database_url()
        .ok_or("SCHEMAFORGE_DATABASE_URL must be set to run migrations")?;

    let mut conn = PgConnection::establish(url)?;
    let applied = conn.run_pending_migrations(MIGRATIONS)?;
    if applied.is_empty() {
        println!("database schema is up to date");
    }
    for version in applied {
        println!("applied migration {version}");
    }
    Ok(())
}
