//! Database pool setup.
//!
//! `PostgreSQL` backs two things here: tower-sessions and the durable
//! client-state store. Catalog data never touches this database.

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Maximum connections in the pool.
const MAX_CONNECTIONS: u32 = 5;

/// Create the `PostgreSQL` connection pool.
///
/// # Errors
///
/// Returns `sqlx::Error` if the database is unreachable.
pub async fn create_pool(database_url: &SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect(database_url.expose_secret())
        .await
}
