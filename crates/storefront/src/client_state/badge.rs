//! Header badge observers.
//!
//! The header cart/wishlist badges and the nav bar are rendered as
//! independent fragments. Each browsing session gets one [`HeaderBadges`]
//! observer that subscribes to the client-state store, re-reads all three
//! keys on every change, and tracks a transient "blink" highlight for a
//! badge whose count just grew.
//!
//! The observer owns a background task; dropping the observer aborts it.
//! [`BadgeRegistry`] keeps one observer per active scope with idle
//! eviction, so an abandoned session releases its task.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::Value;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::{ClientKey, ScopeId, StateStore};

/// How long a badge stays highlighted after its count grows.
pub const BLINK_WINDOW: Duration = Duration::from_secs(3);

/// Idle time after which a scope's observer is evicted.
const REGISTRY_IDLE: Duration = Duration::from_secs(30 * 60);

/// Upper bound on concurrently tracked scopes.
const REGISTRY_CAPACITY: u64 = 10_000;

/// What the header fragments render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BadgeSnapshot {
    pub cart_count: usize,
    pub wishlist_count: usize,
    pub signed_in: bool,
    pub cart_blinking: bool,
    pub wishlist_blinking: bool,
}

#[derive(Debug, Clone, Copy, Default)]
struct Counts {
    cart: usize,
    wishlist: usize,
    signed_in: bool,
}

#[derive(Debug, Default)]
struct BadgeState {
    counts: Counts,
    /// A baseline has been established; growth comparisons are meaningful.
    primed: bool,
    cart_blink_until: Option<Instant>,
    wishlist_blink_until: Option<Instant>,
}

impl BadgeState {
    /// Fold freshly read counts into the state.
    ///
    /// Arms a blink only on growth against an established baseline; equal
    /// or shrinking counts never arm and never extend a running blink.
    fn apply(&mut self, new: Counts, now: Instant) {
        if self.primed {
            if new.cart > self.counts.cart {
                self.cart_blink_until = Some(now + BLINK_WINDOW);
            }
            if new.wishlist > self.counts.wishlist {
                self.wishlist_blink_until = Some(now + BLINK_WINDOW);
            }
        }
        self.primed = true;
        self.counts = new;
    }

    fn snapshot(&self, now: Instant) -> BadgeSnapshot {
        BadgeSnapshot {
            cart_count: self.counts.cart,
            wishlist_count: self.counts.wishlist,
            signed_in: self.counts.signed_in,
            cart_blinking: self.cart_blink_until.is_some_and(|t| now < t),
            wishlist_blinking: self.wishlist_blink_until.is_some_and(|t| now < t),
        }
    }
}

/// Per-scope observer behind the header badge fragments.
pub struct HeaderBadges {
    state: Arc<Mutex<BadgeState>>,
    store: Arc<dyn StateStore>,
    scope: ScopeId,
    task: JoinHandle<()>,
}

impl HeaderBadges {
    /// Subscribe to `scope` and start observing.
    ///
    /// The subscription is taken before the task starts, so no write made
    /// after `attach` returns can be missed.
    #[must_use]
    pub fn attach(store: Arc<dyn StateStore>, scope: ScopeId) -> Self {
        let state = Arc::new(Mutex::new(BadgeState::default()));
        let mut subscription = store.subscribe(scope);

        let task = {
            let state = Arc::clone(&state);
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                // Establish the baseline, then fold in every change.
                let counts = read_counts(store.as_ref(), scope).await;
                lock(&state).apply(counts, Instant::now());

                while subscription.next().await.is_some() {
                    let counts = read_counts(store.as_ref(), scope).await;
                    lock(&state).apply(counts, Instant::now());
                }
            })
        };

        Self {
            state,
            store,
            scope,
            task,
        }
    }

    /// Current badge state without touching the store.
    #[must_use]
    pub fn snapshot(&self) -> BadgeSnapshot {
        lock(&self.state).snapshot(Instant::now())
    }

    /// Re-read the store and return the updated state.
    ///
    /// Fragment handlers call this so the rendered counts are authoritative
    /// even if the observer task has not been scheduled yet. Growth is
    /// still armed exactly once: whichever path folds the new counts in
    /// first wins, and the other sees no further growth.
    pub async fn sync_now(&self) -> BadgeSnapshot {
        let counts = read_counts(self.store.as_ref(), self.scope).await;
        let now = Instant::now();
        let mut state = lock(&self.state);
        state.apply(counts, now);
        state.snapshot(now)
    }
}

impl Drop for HeaderBadges {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn lock(state: &Mutex<BadgeState>) -> std::sync::MutexGuard<'_, BadgeState> {
    state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

async fn read_counts(store: &dyn StateStore, scope: ScopeId) -> Counts {
    let user = store.read(scope, ClientKey::User).await;
    let cart = store.read(scope, ClientKey::Cart).await;
    let wishlist = store.read(scope, ClientKey::Wishlist).await;

    Counts {
        cart: list_len(&cart),
        wishlist: list_len(&wishlist),
        signed_in: !user.is_null(),
    }
}

fn list_len(value: &Value) -> usize {
    value.as_array().map_or(0, Vec::len)
}

/// One [`HeaderBadges`] per active scope, evicted when idle.
///
/// Eviction drops the observer, which aborts its task: no session can leak
/// a subscription or a timer.
pub struct BadgeRegistry {
    store: Arc<dyn StateStore>,
    observers: moka::future::Cache<ScopeId, Arc<HeaderBadges>>,
}

impl BadgeRegistry {
    #[must_use]
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        let observers = moka::future::Cache::builder()
            .max_capacity(REGISTRY_CAPACITY)
            .time_to_idle(REGISTRY_IDLE)
            .build();

        Self { store, observers }
    }

    /// The observer for `scope`, attached on first use.
    pub async fn for_scope(&self, scope: ScopeId) -> Arc<HeaderBadges> {
        self.observers
            .get_with(scope, async {
                Arc::new(HeaderBadges::attach(Arc::clone(&self.store), scope))
            })
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use tokio::task::yield_now;
    use tokio::time::advance;

    use super::super::MemoryStateStore;
    use super::*;

    fn setup() -> (Arc<MemoryStateStore>, ScopeId) {
        (Arc::new(MemoryStateStore::new()), ScopeId::generate())
    }

    async fn write_cart(store: &MemoryStateStore, scope: ScopeId, len: usize) {
        let entries: Vec<Value> = (0..len).map(|i| json!({ "productId": i })).collect();
        store
            .write(scope, ClientKey::Cart, &Value::Array(entries))
            .await
            .unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_growth_blinks_once_then_expires() {
        let (store, scope) = setup();
        let badges = HeaderBadges::attach(store.clone(), scope);

        // Baseline: empty cart, no blink.
        let snap = badges.sync_now().await;
        assert_eq!(snap.cart_count, 0);
        assert!(!snap.cart_blinking);

        write_cart(&store, scope, 1).await;
        let snap = badges.sync_now().await;
        assert_eq!(snap.cart_count, 1);
        assert!(snap.cart_blinking);
        assert!(!snap.wishlist_blinking);

        advance(BLINK_WINDOW + Duration::from_millis(10)).await;
        assert!(!badges.snapshot().cart_blinking);

        // A re-render without growth stays dark.
        let snap = badges.sync_now().await;
        assert!(!snap.cart_blinking);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rerender_does_not_extend_blink() {
        let (store, scope) = setup();
        let badges = HeaderBadges::attach(store.clone(), scope);
        badges.sync_now().await;

        write_cart(&store, scope, 1).await;
        badges.sync_now().await;

        // Two seconds in: still blinking, and an unrelated re-render must
        // not re-arm the window.
        advance(Duration::from_secs(2)).await;
        let snap = badges.sync_now().await;
        assert!(snap.cart_blinking);

        // 1.5s later the original 3s window has passed. If the re-render
        // above had re-armed, this would still blink.
        advance(Duration::from_millis(1500)).await;
        assert!(!badges.snapshot().cart_blinking);
    }

    #[tokio::test(start_paused = true)]
    async fn test_preexisting_state_is_baseline_not_growth() {
        let (store, scope) = setup();
        write_cart(&store, scope, 2).await;

        let badges = HeaderBadges::attach(store.clone(), scope);
        let snap = badges.sync_now().await;
        assert_eq!(snap.cart_count, 2);
        assert!(!snap.cart_blinking);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shrinking_never_blinks() {
        let (store, scope) = setup();
        let badges = HeaderBadges::attach(store.clone(), scope);
        badges.sync_now().await;

        write_cart(&store, scope, 2).await;
        badges.sync_now().await;
        advance(BLINK_WINDOW + Duration::from_millis(10)).await;

        write_cart(&store, scope, 1).await;
        let snap = badges.sync_now().await;
        assert_eq!(snap.cart_count, 1);
        assert!(!snap.cart_blinking);
    }

    #[tokio::test(start_paused = true)]
    async fn test_observer_task_folds_events_in() {
        let (store, scope) = setup();
        let badges = HeaderBadges::attach(store.clone(), scope);

        // Let the task establish its baseline.
        for _ in 0..10 {
            yield_now().await;
        }

        write_cart(&store, scope, 3).await;
        store
            .write(scope, ClientKey::User, &json!({ "name": "Ada", "email": "ada@example.com" }))
            .await
            .unwrap();

        let mut seen = BadgeSnapshot::default();
        for _ in 0..50 {
            yield_now().await;
            seen = badges.snapshot();
            if seen.cart_count == 3 && seen.signed_in {
                break;
            }
        }
        assert_eq!(seen.cart_count, 3);
        assert!(seen.signed_in);
        assert!(seen.cart_blinking);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_releases_observer_task() {
        let (store, scope) = setup();
        let badges = HeaderBadges::attach(store.clone(), scope);
        let abort = badges.task.abort_handle();

        drop(badges);
        for _ in 0..10 {
            yield_now().await;
        }
        assert!(abort.is_finished());

        // Writes after disposal go nowhere special.
        write_cart(&store, scope, 1).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_registry_returns_same_observer_per_scope() {
        let (store, scope) = setup();
        let registry = BadgeRegistry::new(store.clone());

        let a = registry.for_scope(scope).await;
        let b = registry.for_scope(scope).await;
        assert!(Arc::ptr_eq(&a, &b));

        let other = registry.for_scope(ScopeId::generate()).await;
        assert!(!Arc::ptr_eq(&a, &other));
    }
}
