//! Dashboard route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::state::AppState;

/// Stock level below which a product is flagged on the dashboard.
const LOW_STOCK_THRESHOLD: u32 = 5;

/// Dashboard page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub product_count: usize,
    pub category_count: usize,
    pub low_stock_count: usize,
    /// Inline error shown when the catalog fetch failed.
    pub error: Option<String>,
}

/// Display the dashboard.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    match state.catalog().products().await {
        Ok(products) => {
            let mut categories: Vec<&str> = products
                .iter()
                .filter(|p| !p.category.is_empty())
                .map(|p| p.category.as_str())
                .collect();
            categories.sort_unstable();
            categories.dedup();

            DashboardTemplate {
                product_count: products.len(),
                category_count: categories.len(),
                low_stock_count: products
                    .iter()
                    .filter(|p| p.stock < LOW_STOCK_THRESHOLD)
                    .count(),
                error: None,
            }
        }
        Err(e) => {
            tracing::error!("Failed to fetch products for dashboard: {e}");
            DashboardTemplate {
                product_count: 0,
                category_count: 0,
                low_stock_count: 0,
                error: Some("The catalog backend is unreachable.".to_string()),
            }
        }
    }
}
