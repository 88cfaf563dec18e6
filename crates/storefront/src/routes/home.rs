//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use rust_decimal::Decimal;
use tracing::instrument;

use cedar_thread_core::Product;

use crate::catalog::mock;
use crate::filters;
use crate::state::AppState;

/// Flash-sale slides on the carousel.
const FLASH_SALE_COUNT: usize = 6;

/// Products shown in the featured grid.
const FEATURED_COUNT: usize = 8;

/// A slide in the flash-sale carousel.
#[derive(Clone)]
pub struct SaleSlideView {
    pub id: i64,
    pub name: String,
    pub sale_price: Decimal,
    pub original_price: Decimal,
    pub percent_off: Decimal,
    pub image: Option<String>,
}

impl From<&Product> for SaleSlideView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i64(),
            name: product.name.clone(),
            sale_price: product.effective_price(),
            original_price: product.original_price,
            percent_off: product.discount_percent().unwrap_or(Decimal::ZERO),
            image: product.images.first().cloned(),
        }
    }
}

/// Product display data for the featured grid.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
    pub original_price: Option<Decimal>,
    pub image: Option<String>,
    pub category: String,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i64(),
            name: product.name.clone(),
            price: product.effective_price(),
            original_price: product.on_sale().then_some(product.original_price),
            image: product.images.first().cloned(),
            category: product.category.clone(),
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    /// Flash-sale carousel slides (mock data, regenerated per render).
    pub flash_sale: Vec<SaleSlideView>,
    /// Featured products from the catalog.
    pub featured: Vec<ProductCardView>,
}

/// Display the home page.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> impl IntoResponse {
    // The flash sale renders mock markdowns; no backend call is made.
    let flash_sale: Vec<SaleSlideView> = mock::flash_sale_products(FLASH_SALE_COUNT)
        .iter()
        .map(SaleSlideView::from)
        .collect();

    // Featured grid comes from the catalog; an unreachable backend
    // degrades to an empty grid rather than an error page.
    let featured = state.catalog().products().await.map_or_else(
        |e| {
            tracing::error!("Failed to fetch featured products: {e}");
            Vec::new()
        },
        |products| {
            products
                .iter()
                .take(FEATURED_COUNT)
                .map(ProductCardView::from)
                .collect()
        },
    );

    HomeTemplate {
        flash_sale,
        featured,
    }
}
