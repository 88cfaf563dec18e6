//! Product CRUD route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use cedar_thread_core::{Product, ProductId};

use crate::catalog::ProductDraft;
use crate::components::data_table::{TableColumn, product_columns};
use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

/// One row in the product table.
#[derive(Clone)]
pub struct ProductRowView {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
    pub discount_price: Option<Decimal>,
    pub stock: u32,
    pub category: String,
}

impl From<&Product> for ProductRowView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i64(),
            name: product.name.clone(),
            price: product.price,
            discount_price: product.discount_price,
            stock: product.stock,
            category: product.category.clone(),
        }
    }
}

/// Form values, kept as strings so a failed parse can refill the form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductForm {
    pub name: String,
    pub price: String,
    pub original_price: String,
    #[serde(default)]
    pub discount_price: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub material: String,
    /// Comma-separated size list, e.g. "S, M, L".
    #[serde(default)]
    pub available_sizes: String,
    #[serde(default)]
    pub stock: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub category: String,
}

impl ProductForm {
    fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            price: product.price.to_string(),
            original_price: product.original_price.to_string(),
            discount_price: product
                .discount_price
                .map(|d| d.to_string())
                .unwrap_or_default(),
            image_url: product.images.first().cloned().unwrap_or_default(),
            material: product.material.clone(),
            available_sizes: product.available_sizes.join(", "),
            stock: product.stock.to_string(),
            color: product.color.clone(),
            category: product.category.clone(),
        }
    }

    /// Validate and convert to the API payload.
    fn into_draft(self) -> Result<ProductDraft> {
        if self.name.trim().is_empty() {
            return Err(AppError::BadRequest("name is required".to_string()));
        }

        let price = parse_decimal("price", &self.price)?;
        let original_price = parse_decimal("original price", &self.original_price)?;
        let discount_price = if self.discount_price.trim().is_empty() {
            None
        } else {
            Some(parse_decimal("discount price", &self.discount_price)?)
        };

        if let Some(discounted) = discount_price
            && discounted >= original_price
        {
            return Err(AppError::BadRequest(
                "discount price must be below the original price".to_string(),
            ));
        }

        let stock = if self.stock.trim().is_empty() {
            0
        } else {
            self.stock
                .trim()
                .parse::<u32>()
                .map_err(|_| AppError::BadRequest("stock must be a whole number".to_string()))?
        };

        Ok(ProductDraft {
            name: self.name.trim().to_string(),
            price,
            original_price,
            discount_price,
            images: if self.image_url.trim().is_empty() {
                Vec::new()
            } else {
                vec![self.image_url.trim().to_string()]
            },
            material: self.material.trim().to_string(),
            available_sizes: self
                .available_sizes
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToString::to_string)
                .collect(),
            stock,
            color: self.color.trim().to_string(),
            category: self.category.trim().to_lowercase(),
        })
    }
}

fn parse_decimal(field: &str, raw: &str) -> Result<Decimal> {
    raw.trim()
        .parse::<Decimal>()
        .map_err(|_| AppError::BadRequest(format!("{field} must be a decimal amount")))
}

/// Product table page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub columns: Vec<TableColumn>,
    pub rows: Vec<ProductRowView>,
    /// Inline error shown when the catalog fetch failed.
    pub error: Option<String>,
}

/// Product create/edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "products/form.html")]
pub struct ProductFormTemplate {
    pub heading: String,
    pub action: String,
    pub values: ProductForm,
}

/// Display the product table.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    match state.catalog().products().await {
        Ok(products) => ProductsIndexTemplate {
            columns: product_columns(),
            rows: products.iter().map(ProductRowView::from).collect(),
            error: None,
        },
        Err(e) => {
            tracing::error!("Failed to fetch products: {e}");
            ProductsIndexTemplate {
                columns: product_columns(),
                rows: Vec::new(),
                error: Some("The catalog backend is unreachable.".to_string()),
            }
        }
    }
}

/// Display the create form.
#[instrument]
pub async fn new() -> impl IntoResponse {
    ProductFormTemplate {
        heading: "New Product".to_string(),
        action: "/products".to_string(),
        values: ProductForm::default(),
    }
}

/// Create a product, then redirect to the refetched list.
#[instrument(skip(state, form))]
pub async fn create(
    State(state): State<AppState>,
    Form(form): Form<ProductForm>,
) -> Result<Redirect> {
    let draft = form.into_draft()?;
    let product = state.catalog().create_product(&draft).await?;
    tracing::info!(product_id = %product.id, "product created");

    Ok(Redirect::to("/products"))
}

/// Display the edit form for a product.
#[instrument(skip(state), fields(product_id = %id))]
pub async fn edit(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<ProductFormTemplate> {
    let product = state.catalog().product(id).await?;

    Ok(ProductFormTemplate {
        heading: format!("Edit: {}", product.name),
        action: format!("/products/{id}"),
        values: ProductForm::from_product(&product),
    })
}

/// Update a product, then redirect to the refetched list.
#[instrument(skip(state, form), fields(product_id = %id))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Form(form): Form<ProductForm>,
) -> Result<Redirect> {
    let draft = form.into_draft()?;
    state.catalog().update_product(id, &draft).await?;
    tracing::info!(product_id = %id, "product updated");

    Ok(Redirect::to("/products"))
}

/// Delete a product, then redirect to the refetched list.
#[instrument(skip(state), fields(product_id = %id))]
pub async fn delete(State(state): State<AppState>, Path(id): Path<ProductId>) -> Result<Redirect> {
    state.catalog().delete_product(id).await?;
    tracing::info!(product_id = %id, "product deleted");

    Ok(Redirect::to("/products"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form() -> ProductForm {
        ProductForm {
            name: "Linen Shirt".to_string(),
            price: "39.00".to_string(),
            original_price: "49.00".to_string(),
            discount_price: "29.00".to_string(),
            image_url: String::new(),
            material: "linen".to_string(),
            available_sizes: "S, M,L, ".to_string(),
            stock: "5".to_string(),
            color: "white".to_string(),
            category: "Shirts".to_string(),
        }
    }

    #[test]
    fn test_form_parses_into_draft() {
        let draft = form().into_draft().unwrap();
        assert_eq!(draft.price, Decimal::new(3900, 2));
        assert_eq!(draft.discount_price, Some(Decimal::new(2900, 2)));
        assert_eq!(draft.available_sizes, ["S", "M", "L"]);
        assert_eq!(draft.category, "shirts");
    }

    #[test]
    fn test_form_rejects_blank_name() {
        let mut bad = form();
        bad.name = "  ".to_string();
        assert!(matches!(
            bad.into_draft(),
            Err(AppError::BadRequest(msg)) if msg.contains("name")
        ));
    }

    #[test]
    fn test_form_rejects_non_decimal_price() {
        let mut bad = form();
        bad.price = "free".to_string();
        assert!(bad.into_draft().is_err());
    }

    #[test]
    fn test_form_rejects_discount_at_or_above_original() {
        let mut bad = form();
        bad.discount_price = "49.00".to_string();
        assert!(bad.into_draft().is_err());
    }

    #[test]
    fn test_form_empty_discount_and_stock_default() {
        let mut minimal = form();
        minimal.discount_price = String::new();
        minimal.stock = String::new();
        let draft = minimal.into_draft().unwrap();
        assert!(draft.discount_price.is_none());
        assert_eq!(draft.stock, 0);
    }
}
