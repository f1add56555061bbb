//! Database layer: connection pool, migrations, entity models, and
//! repositories.
//!
//! Repositories are stateless structs of associated functions that take a
//! pool reference, so call sites never hold per-repository state. Simple
//! CRUD returns `sqlx::Error`; listing queries that apply the pagination
//! contract return [`clipstream_core::error::CoreError`] directly.

pub mod models;
pub mod query;
pub mod repositories;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use clipstream_core::error::CoreError;

/// Alias so downstream crates don't import sqlx for the pool type.
pub type DbPool = PgPool;

/// Create the connection pool used by the whole process.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
}

/// Round-trip check used at startup and by the liveness endpoint.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply embedded migrations from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Log a storage failure with context and collapse it to an opaque
/// internal error. Detail stays in the logs, never in the response.
pub(crate) fn db_internal(context: &'static str, err: sqlx::Error) -> CoreError {
    tracing::error!(error = %err, context, "database query failed");
    CoreError::Internal(context.to_string())
}
