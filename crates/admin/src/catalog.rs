//! Admin catalog API client.
//!
//! The admin side of the REST backend: full product CRUD with the service
//! bearer token. Nothing is cached - after every successful write the panel
//! redirects to the listing, and that render refetches. Refetch-after-write
//! is the only state-sync mechanism; there are no optimistic updates.

use std::sync::Arc;

use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::instrument;

use cedar_thread_core::{Product, ProductId};

use crate::config::CatalogApiConfig;

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
}

/// A product payload for create and update calls.
///
/// The id is owned by the backend and never sent.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    pub price: Decimal,
    pub original_price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_price: Option<Decimal>,
    pub images: Vec<String>,
    pub material: String,
    pub available_sizes: Vec<String>,
    pub stock: u32,
    pub color: String,
    pub category: String,
}

/// Admin client for the catalog REST API.
#[derive(Clone)]
pub struct AdminCatalogClient {
    inner: Arc<AdminCatalogClientInner>,
}

struct AdminCatalogClientInner {
    client: reqwest::Client,
    base_url: String,
    api_token: String,
}

impl AdminCatalogClient {
    /// Create a new admin catalog client.
    #[must_use]
    pub fn new(config: &CatalogApiConfig) -> Self {
        Self {
            inner: Arc::new(AdminCatalogClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.trim_end_matches('/').to_string(),
                api_token: config.api_token.expose_secret().to_string(),
            }),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, CatalogError> {
        let response = request.bearer_auth(&self.inner.api_token).send().await?;
        let status = response.status();
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

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "failed to parse catalog API response"
            );
            CatalogError::Parse(e)
        })
    }

    /// Get the full product listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Vec<Product>, CatalogError> {
        self.execute(self.inner.client.get(self.url("/api/products")))
            .await
    }

    /// Get a single product by id.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if no such product exists.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn product(&self, id: ProductId) -> Result<Product, CatalogError> {
        let products = self.products().await?;
        products
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| CatalogError::NotFound(format!("product {id}")))
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the backend rejects
    /// the payload.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn create_product(&self, draft: &ProductDraft) -> Result<Product, CatalogError> {
        self.execute(
            self.inner
                .client
                .post(self.url("/api/products"))
                .json(draft),
        )
        .await
    }

    /// Update a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the product is unknown.
    #[instrument(skip(self, draft), fields(product_id = %id))]
    pub async fn update_product(
        &self,
        id: ProductId,
        draft: &ProductDraft,
    ) -> Result<Product, CatalogError> {
        self.execute(
            self.inner
                .client
                .put(self.url(&format!("/api/products/{id}")))
                .json(draft),
        )
        .await
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the product is unknown.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: ProductId) -> Result<(), CatalogError> {
        let response = self
            .inner
            .client
            .delete(self.url(&format!("/api/products/{id}")))
            .bearer_auth(&self.inner.api_token)
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(format!("product {id}")));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_serializes_camel_case_without_id() {
        let draft = ProductDraft {
            name: "Linen Shirt".to_string(),
            price: Decimal::new(3900, 2),
            original_price: Decimal::new(4900, 2),
            discount_price: None,
            images: vec![],
            material: "linen".to_string(),
            available_sizes: vec!["M".to_string()],
            stock: 5,
            color: "white".to_string(),
            category: "shirts".to_string(),
        };

        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["originalPrice"], "49.00");
        assert_eq!(json["availableSizes"][0], "M");
        assert!(json.get("id").is_none());
        assert!(json.get("discountPrice").is_none());
    }

    #[test]
    fn test_error_display() {
        let err = CatalogError::NotFound("product 9".to_string());
        assert_eq!(err.to_string(), "Not found: product 9");
    }
}
