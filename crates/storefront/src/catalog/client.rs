//! Catalog API client implementation.
//!
//! Plain REST over `reqwest` with `serde` JSON bodies. Product reads are
//! cached with `moka` (5-minute TTL); order reads carry the user's bearer
//! token and are never cached.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, instrument};

use cedar_thread_core::{Email, Order, OrderId, OrderStatus, Product};

use crate::catalog::CatalogError;
use crate::config::CatalogApiConfig;
use crate::models::StoredUser;

/// Cached catalog values.
#[derive(Clone)]
enum CacheValue {
    Products(Vec<Product>),
}

/// Client for the catalog REST API.
///
/// Cheaply cloneable via `Arc`. Product listings are cached for 5 minutes.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<String, CacheValue>,
}

/// Cache TTL for product reads.
const CACHE_TTL: Duration = Duration::from_secs(300);

/// Cache key for the full product listing.
const PRODUCTS_KEY: &str = "products";

impl CatalogClient {
    /// Create a new catalog API client.
    #[must_use]
    pub fn new(config: &CatalogApiConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(CatalogClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.trim_end_matches('/').to_string(),
                cache,
            }),
        }
    }

    /// Execute a request and deserialize the JSON answer.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, CatalogError> {
        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(CatalogError::RateLimited(retry_after));
        }

        // Read the body as text first for better error diagnostics.
        let body = response.text().await?;

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(
                body.chars().take(200).collect::<String>(),
            ));
        }

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "catalog API returned non-success status"
            );
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        match serde_json::from_str(&body) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %body.chars().take(500).collect::<String>(),
                    "failed to parse catalog API response"
                );
                Err(CatalogError::Parse(e))
            }
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Get the full product listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Vec<Product>, CatalogError> {
        if let Some(CacheValue::Products(products)) =
            self.inner.cache.get(PRODUCTS_KEY).await
        {
            debug!("cache hit for products");
            return Ok(products);
        }

        let products: Vec<Product> = self
            .execute(self.inner.client.get(self.url("/api/products")))
            .await?;

        self.inner
            .cache
            .insert(
                PRODUCTS_KEY.to_string(),
                CacheValue::Products(products.clone()),
            )
            .await;

        Ok(products)
    }

    /// Get a single product by id.
    ///
    /// The backend serves the catalog as one listing; the detail view picks
    /// its product out of the (cached) list.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if no such product exists, or an
    /// error if the API request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn product(&self, id: cedar_thread_core::ProductId) -> Result<Product, CatalogError> {
        let products = self.products().await?;
        products
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| CatalogError::NotFound(format!("product {id}")))
    }

    // =========================================================================
    // Order Methods (bearer-authenticated, never cached)
    // =========================================================================

    /// Get the orders placed by `email`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the token is rejected.
    #[instrument(skip(self, token), fields(email = %email))]
    pub async fn orders_for(&self, email: &Email, token: &str) -> Result<Vec<Order>, CatalogError> {
        self.execute(
            self.inner
                .client
                .get(self.url(&format!("/api/orders/user/email/{email}")))
                .bearer_auth(token),
        )
        .await
    }

    /// Request cancellation of an order.
    ///
    /// The backend owns the transition; on success the updated order is
    /// returned and the caller refetches the listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the backend rejects
    /// the transition.
    #[instrument(skip(self, token), fields(order_id = %id))]
    pub async fn cancel_order(&self, id: OrderId, token: &str) -> Result<Order, CatalogError> {
        self.execute(
            self.inner
                .client
                .put(self.url(&format!("/api/orders/{id}")))
                .bearer_auth(token)
                .json(&json!({ "status": OrderStatus::Cancelled })),
        )
        .await
    }

    // =========================================================================
    // Auth Forward
    // =========================================================================

    /// Forward a login to the backend and return the issued user.
    ///
    /// Credentials are never inspected or stored here; the backend answers
    /// with the user object (including its bearer token) that the caller
    /// writes into the client-state store.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the credentials are
    /// rejected.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &Email, password: &str) -> Result<StoredUser, CatalogError> {
        self.execute(
            self.inner
                .client
                .post(self.url("/api/auth/login"))
                .json(&json!({ "email": email, "password": password })),
        )
        .await
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Invalidate all cached catalog data.
    pub async fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}
