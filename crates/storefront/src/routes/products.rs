//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use cedar_thread_core::{Product, ProductId};

use crate::catalog::{browse, browse::SortKey, recommend};
use crate::error::{AppError, Result};
use crate::filters;
use crate::routes::home::ProductCardView;
use crate::state::AppState;

/// Listing query parameters.
#[derive(Debug, Deserialize)]
pub struct BrowseQuery {
    /// Sort order (`low-to-high`, `high-to-low`, `a-to-z`, `z-to-a`).
    pub sort: Option<String>,
    /// Name search filter.
    pub q: Option<String>,
}

impl BrowseQuery {
    pub(crate) fn sort_key(&self) -> SortKey {
        self.sort
            .as_deref()
            .and_then(SortKey::parse)
            .unwrap_or_default()
    }
}

/// One option in the sort select.
pub struct SortOptionView {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

pub(crate) fn sort_options(selected: SortKey) -> Vec<SortOptionView> {
    SortKey::ALL
        .iter()
        .map(|key| SortOptionView {
            value: key.as_str(),
            label: key.label(),
            selected: *key == selected,
        })
        .collect()
}

/// Product detail display data.
#[derive(Clone)]
pub struct ProductDetailView {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
    pub original_price: Option<Decimal>,
    pub percent_off: Option<Decimal>,
    pub images: Vec<String>,
    pub rating: f64,
    pub reviews: u32,
    pub material: String,
    pub available_sizes: Vec<String>,
    pub in_stock: bool,
    pub color: String,
    pub category: String,
}

impl From<&Product> for ProductDetailView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i64(),
            name: product.name.clone(),
            price: product.effective_price(),
            original_price: product.on_sale().then_some(product.original_price),
            percent_off: product.discount_percent(),
            images: product.images.clone(),
            rating: product.rating,
            reviews: product.reviews,
            material: product.material.clone(),
            available_sizes: product.available_sizes.clone(),
            in_stock: product.in_stock(),
            color: product.color.clone(),
            category: product.category.clone(),
        }
    }
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub products: Vec<ProductCardView>,
    pub query: String,
    pub sort_options: Vec<SortOptionView>,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: ProductDetailView,
    pub recommended: Vec<ProductCardView>,
}

/// Display the product listing page.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<BrowseQuery>,
) -> impl IntoResponse {
    let sort_key = query.sort_key();
    let search = query.q.clone().unwrap_or_default();

    // An unreachable backend renders as an empty listing.
    let mut products = state.catalog().products().await.map_or_else(
        |e| {
            tracing::error!("Failed to fetch products: {e}");
            Vec::new()
        },
        |products| browse::filter_by_name(products, &search),
    );
    browse::sort(&mut products, sort_key);

    ProductsIndexTemplate {
        products: products.iter().map(ProductCardView::from).collect(),
        query: search,
        sort_options: sort_options(sort_key),
    }
}

/// Display the product detail page.
#[instrument(skip(state), fields(product_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<ProductShowTemplate> {
    let products = state.catalog().products().await?;

    let product = products
        .iter()
        .find(|p| p.id == id)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    let recommended = recommend::related(&products, id)
        .iter()
        .map(ProductCardView::from)
        .collect();

    Ok(ProductShowTemplate {
        product: ProductDetailView::from(product),
        recommended,
    })
}
