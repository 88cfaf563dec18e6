//! Collection (category) route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use tracing::instrument;

use crate::catalog::browse;
use crate::filters;
use crate::routes::home::ProductCardView;
use crate::routes::products::{BrowseQuery, SortOptionView, sort_options};
use crate::state::AppState;

/// A category tile on the collection index.
#[derive(Clone)]
pub struct CategoryView {
    pub name: String,
    pub product_count: usize,
}

/// Collection index page template.
#[derive(Template, WebTemplate)]
#[template(path = "collections/index.html")]
pub struct CollectionsIndexTemplate {
    pub categories: Vec<CategoryView>,
}

/// Category browsing page template.
#[derive(Template, WebTemplate)]
#[template(path = "collections/show.html")]
pub struct CollectionShowTemplate {
    pub category: String,
    pub products: Vec<ProductCardView>,
    pub sort_options: Vec<SortOptionView>,
}

/// Display the category index.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    let products = state.catalog().products().await.map_or_else(
        |e| {
            tracing::error!("Failed to fetch products for collections: {e}");
            Vec::new()
        },
        |products| products,
    );

    let categories = browse::categories(&products)
        .into_iter()
        .map(|name| {
            let product_count = products
                .iter()
                .filter(|p| p.category.eq_ignore_ascii_case(&name))
                .count();
            CategoryView {
                name,
                product_count,
            }
        })
        .collect();

    CollectionsIndexTemplate { categories }
}

/// Display one category's browsing page.
#[instrument(skip(state), fields(category = %category))]
pub async fn show(
    State(state): State<AppState>,
    Path(category): Path<String>,
    Query(query): Query<BrowseQuery>,
) -> impl IntoResponse {
    let sort_key = query.sort_key();

    let mut products = state.catalog().products().await.map_or_else(
        |e| {
            tracing::error!("Failed to fetch products for category: {e}");
            Vec::new()
        },
        |products| browse::in_category(products, &category),
    );
    browse::sort(&mut products, sort_key);

    CollectionShowTemplate {
        category,
        products: products.iter().map(ProductCardView::from).collect(),
        sort_options: sort_options(sort_key),
    }
}
