//! HTTP route handlers for the admin panel.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                     - Dashboard
//! GET  /health               - Health check
//!
//! # Products
//! GET  /products             - Product table
//! GET  /products/new         - Create form
//! POST /products             - Create, then redirect to the refetched list
//! GET  /products/:id/edit    - Edit form
//! POST /products/:id         - Update, then redirect
//! POST /products/:id/delete  - Delete, then redirect
//! ```
//!
//! Every successful mutation redirects to `/products`; the listing render
//! refetches from the backend. A failed mutation renders the blocking
//! error page and changes nothing locally.

pub mod dashboard;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route("/new", get(products::new))
        .route("/{id}/edit", get(products::edit))
        .route("/{id}", post(products::update))
        .route("/{id}/delete", post(products::delete))
}

/// Create all routes for the admin panel.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::index))
        .nest("/products", product_routes())
}
