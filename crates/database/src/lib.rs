//! Database plumbing for the MaxxZone gym backend.
//!
//! The pool is built explicitly at process start and handed to the services
//! that need it; nothing in this crate holds global state.

pub mod connection;
pub mod migrations;

pub use connection::prepare_database;
pub use migrations::run_migrations;

use anyhow::Result;
use maxxzone_config::DatabaseConfig;
use sqlx::SqlitePool;

/// Connect and bring the schema up to date. The standard entrypoint for both
/// the server binary and the integration tests.
pub async fn initialize_database(config: &DatabaseConfig) -> Result<SqlitePool> {
    let pool = prepare_database(config).await?;
    run_migrations(&pool).await?;
    Ok(pool)
}
