//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The cart itself lives in the client-state store under the session's
//! scope; every mutation answers with the count badge fragment and an
//! `HX-Trigger: badges-changed` header so sibling fragments (wishlist
//! badge, nav bar) re-read their state.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{AppendHeaders, Html, IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use cedar_thread_core::ProductId;

use crate::client_state::{ClientKey, badge::BadgeSnapshot};
use crate::filters;
use crate::middleware::client_scope;
use crate::models::{CartEntry, cart_entries};
use crate::state::AppState;

/// Response header announcing a client-state change to sibling fragments.
pub const BADGES_CHANGED_TRIGGER: &str = "badges-changed";

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartEntry>,
    pub subtotal: Decimal,
}

impl CartView {
    fn from_entries(items: Vec<CartEntry>) -> Self {
        let subtotal = items.iter().map(CartEntry::line_total).sum();
        Self { items, subtotal }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
    pub quantity: Option<u32>,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: ProductId,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: usize,
    pub blinking: bool,
}

impl From<BadgeSnapshot> for CartCountTemplate {
    fn from(snapshot: BadgeSnapshot) -> Self {
        Self {
            count: snapshot.cart_count,
            blinking: snapshot.cart_blinking,
        }
    }
}

/// Display the cart page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let scope = client_scope(&session).await;
    let items = cart_entries(&state.store().read(scope, ClientKey::Cart).await);

    CartShowTemplate {
        cart: CartView::from_entries(items),
    }
}

/// Add an item to the cart (HTMX).
///
/// Looks the product up so the stored entry carries its name and current
/// price, appends it, and returns the refreshed count badge.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Response {
    let product = match state.catalog().product(form.product_id).await {
        Ok(product) => product,
        Err(e) => {
            tracing::error!("Failed to fetch product for cart add: {e}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html("<span class=\"badge-error\">Error adding to cart</span>"),
            )
                .into_response();
        }
    };

    let scope = client_scope(&session).await;
    let store = state.store();

    let mut items = cart_entries(&store.read(scope, ClientKey::Cart).await);
    items.push(CartEntry {
        product_id: product.id,
        name: product.name.clone(),
        price: product.effective_price(),
        quantity: form.quantity.unwrap_or(1),
    });

    match serde_json::to_value(&items) {
        Ok(value) => {
            if let Err(e) = store.write(scope, ClientKey::Cart, &value).await {
                tracing::error!("Failed to persist cart: {e}");
            }
        }
        Err(e) => tracing::error!("Failed to encode cart: {e}"),
    }

    let snapshot = state.badges().for_scope(scope).await.sync_now().await;

    (
        AppendHeaders([("HX-Trigger", BADGES_CHANGED_TRIGGER)]),
        CartCountTemplate::from(snapshot),
    )
        .into_response()
}

/// Remove an item from the cart (HTMX).
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Response {
    let scope = client_scope(&session).await;
    let store = state.store();

    let mut items = cart_entries(&store.read(scope, ClientKey::Cart).await);
    items.retain(|entry| entry.product_id != form.product_id);

    match serde_json::to_value(&items) {
        Ok(value) => {
            if let Err(e) = store.write(scope, ClientKey::Cart, &value).await {
                tracing::error!("Failed to persist cart: {e}");
            }
        }
        Err(e) => tracing::error!("Failed to encode cart: {e}"),
    }

    // Fold the removal into the badge state before answering.
    state.badges().for_scope(scope).await.sync_now().await;

    (
        AppendHeaders([("HX-Trigger", BADGES_CHANGED_TRIGGER)]),
        CartItemsTemplate {
            cart: CartView::from_entries(items),
        },
    )
        .into_response()
}

/// Get the cart count badge (HTMX).
#[instrument(skip(state, session))]
pub async fn count(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let scope = client_scope(&session).await;
    let snapshot = state.badges().for_scope(scope).await.sync_now().await;
    CartCountTemplate::from(snapshot)
}
