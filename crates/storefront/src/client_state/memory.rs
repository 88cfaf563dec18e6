//! In-memory client-state store.
//!
//! The test and development implementation of [`StateStore`]. Shares the
//! exact notification semantics of the durable store, so observer behavior
//! verified against this implementation carries over.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;

use super::{ChangeBus, ChangeEvent, ClientKey, ScopeId, StateStore, StoreError, Subscription};

/// HashMap-backed [`StateStore`].
#[derive(Debug)]
pub struct MemoryStateStore {
    entries: RwLock<HashMap<(ScopeId, ClientKey), String>>,
    bus: ChangeBus,
}

impl MemoryStateStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            bus: ChangeBus::new(),
        }
    }

    fn load(&self, scope: ScopeId, key: ClientKey) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(&(scope, key))
            .cloned()
    }

    /// Store raw text without serialization, bypassing the JSON contract.
    ///
    /// Exists so tests can exercise the malformed-entry path.
    #[cfg(test)]
    fn insert_raw(&self, scope: ScopeId, key: ClientKey, raw: &str) {
        self.entries
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert((scope, key), raw.to_owned());
    }
}

impl Default for MemoryStateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn read(&self, scope: ScopeId, key: ClientKey) -> Value {
        let Some(raw) = self.load(scope, key) else {
            return key.default_value();
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
        self.entries
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert((scope, key), raw);
        self.bus.publish(ChangeEvent { scope, key });
        Ok(())
    }

    async fn clear(&self, scope: ScopeId, key: ClientKey) -> Result<(), StoreError> {
        self.entries
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .remove(&(scope, key));
        self.bus.publish(ChangeEvent { scope, key });
        Ok(())
    }

    fn subscribe(&self, scope: ScopeId) -> Subscription {
        self.bus.subscribe(scope)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_write_then_read_deep_equal() {
        let store = MemoryStateStore::new();
        let scope = ScopeId::generate();
        let cart = json!([
            { "productId": 1, "name": "Linen Shirt", "price": "39.00", "quantity": 2 },
            { "productId": 7, "name": "Wool Scarf", "price": "29.50" }
        ]);

        store.write(scope, ClientKey::Cart, &cart).await.unwrap();
        assert_eq!(store.read(scope, ClientKey::Cart).await, cart);
    }

    #[tokio::test]
    async fn test_absent_key_reads_default() {
        let store = MemoryStateStore::new();
        let scope = ScopeId::generate();
        assert_eq!(store.read(scope, ClientKey::User).await, Value::Null);
        assert_eq!(store.read(scope, ClientKey::Cart).await, json!([]));
        assert_eq!(store.read(scope, ClientKey::Wishlist).await, json!([]));
    }

    #[tokio::test]
    async fn test_malformed_entry_reads_default_without_panicking() {
        let store = MemoryStateStore::new();
        let scope = ScopeId::generate();
        store.insert_raw(scope, ClientKey::Cart, "{not json!");
        store.insert_raw(scope, ClientKey::User, "\u{1}binary\u{2}");

        assert_eq!(store.read(scope, ClientKey::Cart).await, json!([]));
        assert_eq!(store.read(scope, ClientKey::User).await, Value::Null);
    }

    #[tokio::test]
    async fn test_scopes_are_isolated() {
        let store = MemoryStateStore::new();
        let a = ScopeId::generate();
        let b = ScopeId::generate();

        store
            .write(a, ClientKey::Wishlist, &json!([{ "productId": 3 }]))
            .await
            .unwrap();

        assert_eq!(store.read(b, ClientKey::Wishlist).await, json!([]));
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let store = MemoryStateStore::new();
        let scope = ScopeId::generate();

        store
            .write(scope, ClientKey::Cart, &json!([{ "productId": 1 }]))
            .await
            .unwrap();
        store
            .write(scope, ClientKey::Cart, &json!([{ "productId": 2 }]))
            .await
            .unwrap();

        assert_eq!(
            store.read(scope, ClientKey::Cart).await,
            json!([{ "productId": 2 }])
        );
    }

    #[tokio::test]
    async fn test_write_notifies_subscriber_before_returning() {
        let store = MemoryStateStore::new();
        let scope = ScopeId::generate();
        let mut sub = store.subscribe(scope);

        store
            .write(scope, ClientKey::Cart, &json!([{ "productId": 1 }]))
            .await
            .unwrap();

        // The event is already buffered: no further writes are needed for
        // the subscriber to observe the change.
        let event = sub.next().await.unwrap();
        assert_eq!(event.key, ClientKey::Cart);
        assert_eq!(
            store.read(scope, ClientKey::Cart).await,
            json!([{ "productId": 1 }])
        );
    }

    #[tokio::test]
    async fn test_clear_resets_to_default_and_notifies() {
        let store = MemoryStateStore::new();
        let scope = ScopeId::generate();
        store
            .write(scope, ClientKey::User, &json!({ "name": "Ada", "email": "ada@example.com" }))
            .await
            .unwrap();

        let mut sub = store.subscribe(scope);
        store.clear(scope, ClientKey::User).await.unwrap();

        assert_eq!(store.read(scope, ClientKey::User).await, Value::Null);
        let event = sub.next().await.unwrap();
        assert_eq!(event.key, ClientKey::User);
    }
}
