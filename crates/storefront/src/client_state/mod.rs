//! Per-session client-state store.
//!
//! # Architecture
//!
//! Three independent values survive page navigation within a browsing
//! session: the signed-in user, the cart, and the wishlist. Each is stored
//! as JSON text under a `(scope, key)` pair, where the scope is an opaque
//! id carried by the session cookie.
//!
//! The store is an injectable trait with two implementations:
//!
//! - [`MemoryStateStore`] - in-memory, used in tests and development
//! - [`PostgresStateStore`] - durable, used in production
//!
//! Every write broadcasts a [`ChangeEvent`] so independently rendered UI
//! regions (header badges, nav bar) re-read their state without a server
//! round-trip per region. Observers register via [`StateStore::subscribe`];
//! the returned [`Subscription`] unsubscribes when dropped.
//!
//! # Consistency
//!
//! Last-write-wins. Concurrent writers of the same scope race; the later
//! physical write persists and losers learn of it from the next event they
//! receive. Values here are display state, never a system of record:
//! unreadable or malformed entries degrade to per-key defaults.

pub mod badge;
mod memory;
mod postgres;

pub use memory::MemoryStateStore;
pub use postgres::PostgresStateStore;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::broadcast;
use uuid::Uuid;

/// Broadcast channel capacity.
///
/// Events are coalescing signals (observers re-read all keys on receipt),
/// so a lagged receiver loses nothing but redundant wake-ups.
const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// Opaque id for one browsing session's client state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ScopeId(Uuid);

impl ScopeId {
    /// Generate a fresh scope id for a new browsing session.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for ScopeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The three client-state keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientKey {
    User,
    Cart,
    Wishlist,
}

impl ClientKey {
    /// All keys, in the order observers re-read them.
    pub const ALL: [Self; 3] = [Self::User, Self::Cart, Self::Wishlist];

    /// Storage key string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Cart => "cart",
            Self::Wishlist => "wishlist",
        }
    }

    /// Value surfaced for an absent or malformed entry.
    #[must_use]
    pub fn default_value(&self) -> Value {
        match self {
            Self::User => Value::Null,
            Self::Cart | Self::Wishlist => Value::Array(Vec::new()),
        }
    }
}

impl std::fmt::Display for ClientKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Announcement that one client-state key changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent {
    pub scope: ScopeId,
    pub key: ClientKey,
}

/// Errors from store mutations.
///
/// Reads never error: unreadable state degrades to the key default.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Value could not be serialized to JSON text.
    #[error("serialize error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Durable backend rejected the operation.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Injectable client-state store.
///
/// Route handlers hold this as `Arc<dyn StateStore>`; tests inject
/// [`MemoryStateStore`].
#[async_trait]
pub trait StateStore: Send + Sync + 'static {
    /// Read the value stored under `(scope, key)`.
    ///
    /// Absent, unreadable, or malformed entries are logged and surfaced as
    /// [`ClientKey::default_value`]; this call never fails.
    async fn read(&self, scope: ScopeId, key: ClientKey) -> Value;

    /// Persist `value` under `(scope, key)` and broadcast the change.
    ///
    /// The write is visible to `read` before any subscriber observes the
    /// event.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if serialization or the durable backend
    /// fails. Callers log and continue; client state is a cache.
    async fn write(&self, scope: ScopeId, key: ClientKey, value: &Value) -> Result<(), StoreError>;

    /// Remove the value stored under `(scope, key)` and broadcast.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the durable backend fails.
    async fn clear(&self, scope: ScopeId, key: ClientKey) -> Result<(), StoreError>;

    /// Register an observer for `scope`.
    ///
    /// The returned [`Subscription`] yields every [`ChangeEvent`] for the
    /// scope, including the subscriber's own writes, and unsubscribes when
    /// dropped.
    fn subscribe(&self, scope: ScopeId) -> Subscription;
}

/// In-process change-notification bus shared by store implementations.
#[derive(Debug, Clone)]
pub(crate) struct ChangeBus {
    tx: broadcast::Sender<ChangeEvent>,
}

impl ChangeBus {
    pub(crate) fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Announce a change. Dropped silently when nobody is listening.
    pub(crate) fn publish(&self, event: ChangeEvent) {
        let _ = self.tx.send(event);
    }

    pub(crate) fn subscribe(&self, scope: ScopeId) -> Subscription {
        Subscription {
            scope,
            rx: self.tx.subscribe(),
        }
    }

    #[cfg(test)]
    pub(crate) fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// Live observer registration. Dropping it unsubscribes.
pub struct Subscription {
    scope: ScopeId,
    rx: broadcast::Receiver<ChangeEvent>,
}

impl Subscription {
    /// Wait for the next change in this subscription's scope.
    ///
    /// Returns `None` once the store has been dropped. A lagged receiver
    /// skips ahead; skipped events are harmless because observers re-read
    /// every key on receipt.
    pub async fn next(&mut self) -> Option<ChangeEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) if event.scope == self.scope => return Some(event),
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(scope = %self.scope, skipped, "change subscription lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_key_defaults() {
        assert_eq!(ClientKey::User.default_value(), Value::Null);
        assert_eq!(ClientKey::Cart.default_value(), serde_json::json!([]));
        assert_eq!(ClientKey::Wishlist.default_value(), serde_json::json!([]));
    }

    #[test]
    fn test_key_strings() {
        assert_eq!(ClientKey::User.as_str(), "user");
        assert_eq!(ClientKey::Cart.as_str(), "cart");
        assert_eq!(ClientKey::Wishlist.as_str(), "wishlist");
    }

    #[tokio::test]
    async fn test_subscription_filters_other_scopes() {
        let bus = ChangeBus::new();
        let ours = ScopeId::generate();
        let theirs = ScopeId::generate();
        let mut sub = bus.subscribe(ours);

        bus.publish(ChangeEvent {
            scope: theirs,
            key: ClientKey::Cart,
        });
        bus.publish(ChangeEvent {
            scope: ours,
            key: ClientKey::Wishlist,
        });

        let event = sub.next().await.unwrap();
        assert_eq!(event.scope, ours);
        assert_eq!(event.key, ClientKey::Wishlist);
    }

    #[tokio::test]
    async fn test_subscription_ends_when_bus_dropped() {
        let bus = ChangeBus::new();
        let mut sub = bus.subscribe(ScopeId::generate());
        drop(bus);
        assert!(sub.next().await.is_none());
    }

    #[test]
    fn test_drop_unsubscribes() {
        let bus = ChangeBus::new();
        let sub = bus.subscribe(ScopeId::generate());
        assert_eq!(bus.receiver_count(), 1);
        drop(sub);
        assert_eq!(bus.receiver_count(), 0);
    }
}
