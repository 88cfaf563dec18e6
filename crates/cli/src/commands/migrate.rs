//! Database migration commands.

use tower_sessions_sqlx_store::PostgresStore;

use cedar_thread_storefront::config::StorefrontConfig;
use cedar_thread_storefront::db;

/// Run the storefront migrations: the client-state table plus the
/// tower-sessions schema.
pub async fn storefront() -> Result<(), Box<dyn std::error::Error>> {
    let config = StorefrontConfig::from_env()?;
    let pool = db::create_pool(&config.database_url).await?;

    tracing::info!("running storefront migrations");
    sqlx::migrate!("../storefront/migrations").run(&pool).await?;

    tracing::info!("running session store migrations");
    let session_store = PostgresStore::new(pool);
    session_store.migrate().await?;

    tracing::info!("storefront migrations complete");
    Ok(())
}
