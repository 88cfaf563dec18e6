//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::CatalogClient;
use crate::client_state::StateStore;
use crate::client_state::badge::BadgeRegistry;
use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the catalog client and the client-state store.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: CatalogClient,
    store: Arc<dyn StateStore>,
    badges: BadgeRegistry,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `store` - Client-state store implementation to inject
    #[must_use]
    pub fn new(config: StorefrontConfig, store: Arc<dyn StateStore>) -> Self {
        let catalog = CatalogClient::new(&config.catalog);
        let badges = BadgeRegistry::new(Arc::clone(&store));

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                store,
                badges,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog API client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    /// Get a reference to the client-state store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn StateStore> {
        &self.inner.store
    }

    /// Get a reference to the badge observer registry.
    #[must_use]
    pub fn badges(&self) -> &BadgeRegistry {
        &self.inner.badges
    }
}
