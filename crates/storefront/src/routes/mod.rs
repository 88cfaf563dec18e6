//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (flash-sale carousel, featured grid)
//! GET  /health                 - Health check
//!
//! # Products
//! GET  /products               - Product listing (?sort=, ?q=)
//! GET  /products/:id           - Product detail + recommendations
//! GET  /collections            - Category index
//! GET  /collections/:category  - Category browsing page
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add entry (returns count badge, triggers badges-changed)
//! POST /cart/remove            - Remove entry (returns cart_items fragment)
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Wishlist (HTMX fragments)
//! GET  /wishlist               - Wishlist page
//! POST /wishlist/add           - Add entry
//! POST /wishlist/remove        - Remove entry
//! GET  /wishlist/count         - Wishlist count badge (fragment)
//!
//! # Account
//! GET  /account/orders             - Order tracking (requires stored user)
//! POST /account/orders/:id/cancel  - Request cancellation, then refetch
//!
//! # Auth
//! GET  /auth/login             - Login page
//! POST /auth/login             - Forward credentials to the backend
//! POST /auth/logout            - Clear the stored user
//! ```

pub mod account;
pub mod auth;
pub mod cart;
pub mod collections;
pub mod home;
pub mod products;
pub mod wishlist;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the collection routes router.
pub fn collection_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(collections::index))
        .route("/{category}", get(collections::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::show))
        .route("/add", post(wishlist::add))
        .route("/remove", post(wishlist::remove))
        .route("/count", get(wishlist::count))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(account::orders))
        .route("/orders/{id}/cancel", post(account::cancel_order))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Product routes
        .nest("/products", product_routes())
        // Collection routes
        .nest("/collections", collection_routes())
        // Cart routes
        .nest("/cart", cart_routes())
        // Wishlist routes
        .nest("/wishlist", wishlist_routes())
        // Account routes
        .nest("/account", account_routes())
        // Auth routes
        .nest("/auth", auth_routes())
}
