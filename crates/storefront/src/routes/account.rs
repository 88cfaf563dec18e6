//! Account route handlers: order tracking and cancellation.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use tower_sessions::Session;
use tracing::instrument;

use cedar_thread_core::{Order, OrderId, OrderStatus};

use crate::client_state::ClientKey;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::client_scope;
use crate::models::StoredUser;
use crate::state::AppState;

/// Order display data for templates.
#[derive(Clone)]
pub struct OrderView {
    pub id: i64,
    pub status: OrderStatus,
    pub placed_on: String,
    pub total: Decimal,
    pub payment_method: String,
    pub delivery_address: String,
    pub cancellable: bool,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.order_id.as_i64(),
            status: order.status,
            placed_on: order.created_at.format("%b %-d, %Y").to_string(),
            total: order.total,
            payment_method: order.payment.method.clone(),
            delivery_address: order.delivery.address.clone(),
            cancellable: order.status.is_cancellable(),
        }
    }
}

/// Order tracking page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/orders.html")]
pub struct OrdersTemplate {
    pub orders: Vec<OrderView>,
    /// Inline error shown when the order fetch failed.
    pub error: Option<String>,
}

/// The stored user with a usable bearer token, if any.
async fn signed_in_user(state: &AppState, session: &Session) -> Option<(StoredUser, String)> {
    let scope = client_scope(session).await;
    let user = StoredUser::from_value(&state.store().read(scope, ClientKey::User).await)?;
    let token = user.token.clone()?;
    Some((user, token))
}

/// Display the order tracking page.
#[instrument(skip(state, session))]
pub async fn orders(State(state): State<AppState>, session: Session) -> Response {
    let Some((user, token)) = signed_in_user(&state, &session).await else {
        return Redirect::to("/auth/login").into_response();
    };

    match state.catalog().orders_for(&user.email, &token).await {
        Ok(orders) => OrdersTemplate {
            orders: orders.iter().map(OrderView::from).collect(),
            error: None,
        }
        .into_response(),
        Err(e) => {
            tracing::error!("Failed to fetch orders: {e}");
            OrdersTemplate {
                orders: Vec::new(),
                error: Some(
                    "We could not load your orders right now. Please try again in a moment."
                        .to_string(),
                ),
            }
            .into_response()
        }
    }
}

/// Request cancellation of an order, then return to the refetched list.
///
/// The backend owns the transition; a rejection surfaces as a blocking
/// error response and local state is never touched.
#[instrument(skip(state, session), fields(order_id = %id))]
pub async fn cancel_order(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<OrderId>,
) -> Result<Redirect> {
    let Some((_, token)) = signed_in_user(&state, &session).await else {
        return Err(AppError::Unauthorized("sign in to manage orders".to_string()));
    };

    state.catalog().cancel_order(id, &token).await?;

    // No optimistic update: the redirect refetches the listing.
    Ok(Redirect::to("/account/orders"))
}
