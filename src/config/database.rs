//! Database configuration module.
//!
//! This module handles the `SQLite` connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! structs without hand-written SQL or a migration tool.

use crate::entities::SimulationRun;
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use tracing::{debug, info};

/// Default location of the `SQLite` file when `DATABASE_URL` is unset.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/energysim.sqlite?mode=rwc";

/// Gets the database URL from the `DATABASE_URL` environment variable,
/// falling back to a local `SQLite` file.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the configured database and makes sure all
/// tables exist.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    debug!("Connecting to database at {}", database_url);

    let db = Database::connect(&database_url).await?;
    create_tables(&db).await?;
    info!("Database ready");
    Ok(db)
}

/// Creates all tables that do not exist yet, using `SeaORM`'s schema generation.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut simulation_run_table = schema.create_table_from_entity(SimulationRun);
    simulation_run_table.if_not_exists();

    db.execute(builder.build(&simulation_run_table)).await?;

    Ok(())
}
