//! Durable client-state store backed by `PostgreSQL`.
//!
//! Values live in `storefront.client_state` (one row per `(scope, key)`),
//! written with an upsert so concurrent writers resolve to last-write-wins.
//! Change notification uses the same in-process bus as the in-memory store;
//! every server task serving a scope shares one process, so the bus reaches
//! all of them.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

use super::{ChangeBus, ChangeEvent, ClientKey, ScopeId, StateStore, StoreError, Subscription};

/// `PostgreSQL`-backed [`StateStore`].
///
/// The `storefront.client_state` table is created by migration
/// `0001_client_state.sql`.
#[derive(Debug, Clone)]
pub struct PostgresStateStore {
    pool: PgPool,
    bus: ChangeBus,
}

impl PostgresStateStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            bus: ChangeBus::new(),
        }
    }
}

#[async_trait]
impl StateStore for PostgresStateStore {
    async fn read(&self, scope: ScopeId, key: ClientKey) -> Value {
        let row: Result<Option<String>, sqlx::Error> = sqlx::query_scalar(
            "SELECT value FROM storefront.client_state WHERE scope = $1 AND key = $2",
        )
        .bind(scope.as_uuid())
        .bind(key.as_str())
        .fetch_optional(&self.pool)
        .await;

        let raw = match row {
            Ok(Some(raw)) => raw,
            Ok(None) => return key.default_value(),
            Err(e) => {
                tracing::warn!(%scope, %key, error = %e, "client state read failed, using default");
                return key.default_value();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(%scope, %key, error = %e, "malformed client state, using default");
                key.default_value()
            }
        }
    }

    async fn write(&self, scope: ScopeId, key: ClientKey, value: &Value) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value)?;

        sqlx::query(
            r"
            INSERT INTO storefront.client_state (scope, key, value, updated_at)
            VALUES ($1, $2, $3, now())
            ON CONFLICT (scope, key)
            DO UPDATE SET value = EXCLUDED.value, updated_at = now()
            ",
        )
        .bind(scope.as_uuid())
        .bind(key.as_str())
        .bind(raw)
        .execute(&self.pool)
        .await?;

        self.bus.publish(ChangeEvent { scope, key });
        Ok(())
    }

    async fn clear(&self, scope: ScopeId, key: ClientKey) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM storefront.client_state WHERE scope = $1 AND key = $2")
            .bind(scope.as_uuid())
            .bind(key.as_str())
            .execute(&self.pool)
            .await?;

        self.bus.publish(ChangeEvent { scope, key });
        Ok(())
    }

    fn subscribe(&self, scope: ScopeId) -> Subscription {
        self.bus.subscribe(scope)
    }
}
