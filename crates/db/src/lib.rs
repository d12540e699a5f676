//! Storage layer for the SmartShop worker.
//!
//! Alerts live in PostgreSQL and are accessed through `sqlx`; products and
//! their price history live in MongoDB. Each repository is a zero-sized
//! struct whose methods take the store handle as their first argument.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod mongo;
pub mod repositories;

pub use mongo::{connect_mongo, mongo_health_check, MongoDb};

pub type DbPool = sqlx::PgPool;

/// Upper bound on pooled Postgres connections. The worker is sequential, so
/// a handful is plenty.
const MAX_CONNECTIONS: u32 = 5;

/// How long to wait for a pooled connection before giving up.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Create a pool that opens connections on first use.
///
/// Only fails if the URL cannot be parsed. An unreachable server surfaces
/// later as per-query errors.
pub fn create_lazy_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect_lazy(database_url)
}

/// Round-trip a trivial query to prove the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
