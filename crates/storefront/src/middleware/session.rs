//! Session middleware configuration.
//!
//! Sets up `PostgreSQL`-backed sessions using tower-sessions. The session
//! carries only the opaque scope id that namespaces the client-state store;
//! everything the customer sees (user, cart, wishlist) lives in that store.

use sqlx::PgPool;
use tower_sessions::{Expiry, Session, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

use crate::client_state::ScopeId;
use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "ct_session";

/// Session key holding the client-state scope id.
const SCOPE_KEY: &str = "client_scope";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer with `PostgreSQL` store.
///
/// # Arguments
///
/// * `pool` - `PostgreSQL` connection pool
/// * `config` - Storefront configuration (for the base URL scheme)
#[must_use]
pub fn create_session_layer(
    pool: &PgPool,
    config: &StorefrontConfig,
) -> SessionManagerLayer<PostgresStore> {
    // Create the PostgreSQL session store
    // Note: The sessions table must be created via migration
    let store = PostgresStore::new(pool.clone());

    // Determine if we're in production (HTTPS)
    let is_secure = config.base_url.starts_with("https://");

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(is_secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// Get the session's client-state scope, minting one on first use.
pub async fn client_scope(session: &Session) -> ScopeId {
    if let Ok(Some(scope)) = session.get::<ScopeId>(SCOPE_KEY).await {
        return scope;
    }

    let scope = ScopeId::generate();
    if let Err(e) = session.insert(SCOPE_KEY, scope).await {
        // The scope still works for this request; the next request mints a
        // fresh one and starts from defaults.
        tracing::error!(error = %e, "failed to persist client scope in session");
    }
    scope
}
