//! Catalog API client and catalog-side operations.
//!
//! # Architecture
//!
//! - The catalog backend is the source of truth - NO local sync, direct
//!   REST calls with `reqwest`
//! - In-memory caching via `moka` for product reads (5 minute TTL)
//! - Orders are per-user data and are never cached
//!
//! # Example
//!
//! ```rust,ignore
//! use cedar_thread_storefront::catalog::CatalogClient;
//!
//! let client = CatalogClient::new(&config.catalog);
//!
//! // Browse the catalog
//! let products = client.products().await?;
//! let product = client.product(ProductId::new(3)).await?;
//!
//! // Track orders with the signed-in user's token
//! let orders = client.orders_for(&email, &token).await?;
//! ```

mod client;

pub mod browse;
pub mod mock;
pub mod recommend;

pub use client::CatalogClient;

use thiserror::Error;

/// Errors that can occur when talking to the catalog API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),
}
