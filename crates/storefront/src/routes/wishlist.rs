//! Wishlist route handlers.
//!
//! Mirrors the cart: entries live in the client-state store, mutations
//! answer with the count badge fragment and the `badges-changed` trigger.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{AppendHeaders, Html, IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use cedar_thread_core::ProductId;

use crate::client_state::{ClientKey, badge::BadgeSnapshot};
use crate::filters;
use crate::middleware::client_scope;
use crate::models::{WishlistEntry, wishlist_entries};
use crate::routes::cart::BADGES_CHANGED_TRIGGER;
use crate::state::AppState;

/// Add to wishlist form data.
#[derive(Debug, Deserialize)]
pub struct AddToWishlistForm {
    pub product_id: ProductId,
}

/// Remove from wishlist form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromWishlistForm {
    pub product_id: ProductId,
}

/// Wishlist page template.
#[derive(Template, WebTemplate)]
#[template(path = "wishlist/show.html")]
pub struct WishlistShowTemplate {
    pub items: Vec<WishlistEntry>,
}

/// Wishlist items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/wishlist_items.html")]
pub struct WishlistItemsTemplate {
    pub items: Vec<WishlistEntry>,
}

/// Wishlist count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/wishlist_count.html")]
pub struct WishlistCountTemplate {
    pub count: usize,
    pub blinking: bool,
}

impl From<BadgeSnapshot> for WishlistCountTemplate {
    fn from(snapshot: BadgeSnapshot) -> Self {
        Self {
            count: snapshot.wishlist_count,
            blinking: snapshot.wishlist_blinking,
        }
    }
}

/// Display the wishlist page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let scope = client_scope(&session).await;
    let items = wishlist_entries(&state.store().read(scope, ClientKey::Wishlist).await);

    WishlistShowTemplate { items }
}

/// Add an item to the wishlist (HTMX).
///
/// Saving the same product twice is a no-op; the wishlist is a set in
/// spirit even though the store does not enforce it.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToWishlistForm>,
) -> Response {
    let product = match state.catalog().product(form.product_id).await {
        Ok(product) => product,
        Err(e) => {
            tracing::error!("Failed to fetch product for wishlist add: {e}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html("<span class=\"badge-error\">Error saving to wishlist</span>"),
            )
                .into_response();
        }
    };

    let scope = client_scope(&session).await;
    let store = state.store();

    let mut items = wishlist_entries(&store.read(scope, ClientKey::Wishlist).await);
    if !items.iter().any(|entry| entry.product_id == product.id) {
        items.push(WishlistEntry {
            product_id: product.id,
            name: product.name.clone(),
            price: product.effective_price(),
        });

        match serde_json::to_value(&items) {
            Ok(value) => {
                if let Err(e) = store.write(scope, ClientKey::Wishlist, &value).await {
                    tracing::error!("Failed to persist wishlist: {e}");
                }
            }
            Err(e) => tracing::error!("Failed to encode wishlist: {e}"),
        }
    }

    let snapshot = state.badges().for_scope(scope).await.sync_now().await;

    (
        AppendHeaders([("HX-Trigger", BADGES_CHANGED_TRIGGER)]),
        WishlistCountTemplate::from(snapshot),
    )
        .into_response()
}

/// Remove an item from the wishlist (HTMX).
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RemoveFromWishlistForm>,
) -> Response {
    let scope = client_scope(&session).await;
    let store = state.store();

    let mut items = wishlist_entries(&store.read(scope, ClientKey::Wishlist).await);
    items.retain(|entry| entry.product_id != form.product_id);

    match serde_json::to_value(&items) {
        Ok(value) => {
            if let Err(e) = store.write(scope, ClientKey::Wishlist, &value).await {
                tracing::error!("Failed to persist wishlist: {e}");
            }
        }
        Err(e) => tracing::error!("Failed to encode wishlist: {e}"),
    }

    state.badges().for_scope(scope).await.sync_now().await;

    (
        AppendHeaders([("HX-Trigger", BADGES_CHANGED_TRIGGER)]),
        WishlistItemsTemplate { items },
    )
        .into_response()
}

/// Get the wishlist count badge (HTMX).
#[instrument(skip(state, session))]
pub async fn count(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let scope = client_scope(&session).await;
    let snapshot = state.badges().for_scope(scope).await.sync_now().await;
    WishlistCountTemplate::from(snapshot)
}
