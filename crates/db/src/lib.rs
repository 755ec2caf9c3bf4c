//! PostgreSQL access for the employee directory.
//!
//! The `employees` table is owned by the HR tooling; this crate only reads it.

pub mod models;
pub mod repositories;
pub mod store;

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

pub type DbPool = sqlx::PgPool;

/// Upper bound on pooled connections. Each recognition performs at most one
/// short lookup, so a small pool is plenty.
const MAX_CONNECTIONS: u32 = 10;

fn pool_options(acquire_timeout: Duration) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(acquire_timeout)
}

/// Create a connection pool from a database URL, connecting eagerly.
pub async fn create_pool(database_url: &str, acquire_timeout: Duration) -> Result<DbPool, sqlx::Error> {
    pool_options(acquire_timeout).connect(database_url).await
}

/// Create a pool that defers connecting until first use.
///
/// Fails only if `database_url` cannot be parsed.
pub fn create_lazy_pool(database_url: &str, acquire_timeout: Duration) -> Result<DbPool, sqlx::Error> {
    pool_options(acquire_timeout).connect_lazy(database_url)
}

/// Verify the database answers a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
