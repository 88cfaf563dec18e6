//! Auth route handlers.
//!
//! Credentials are never checked here: the login form is forwarded to the
//! backend, and the user object it issues (bearer token included) is
//! written to the client-state store. Logout clears the `user` key; the
//! cart and wishlist survive it.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use cedar_thread_core::Email;

use crate::catalog::CatalogError;
use crate::client_state::ClientKey;
use crate::filters;
use crate::middleware::client_scope;
use crate::state::AppState;

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    /// Refill value after a failed attempt.
    pub email: String,
}

/// Display the login page.
#[instrument]
pub async fn login_page() -> impl IntoResponse {
    LoginTemplate {
        error: None,
        email: String::new(),
    }
}

/// Forward credentials to the backend and store the issued user.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let Ok(email) = Email::parse(&form.email) else {
        return LoginTemplate {
            error: Some("Enter a valid email address.".to_string()),
            email: form.email,
        }
        .into_response();
    };

    let user = match state.catalog().login(&email, &form.password).await {
        Ok(user) => user,
        Err(CatalogError::Api { status: 401 | 403, .. }) => {
            return LoginTemplate {
                error: Some("Invalid email or password.".to_string()),
                email: form.email,
            }
            .into_response();
        }
        Err(e) => {
            tracing::error!("Login forward failed: {e}");
            return LoginTemplate {
                error: Some("Sign-in is unavailable right now. Please try again.".to_string()),
                email: form.email,
            }
            .into_response();
        }
    };

    let scope = client_scope(&session).await;
    match serde_json::to_value(&user) {
        Ok(value) => {
            if let Err(e) = state.store().write(scope, ClientKey::User, &value).await {
                tracing::error!("Failed to persist signed-in user: {e}");
            }
        }
        Err(e) => tracing::error!("Failed to encode signed-in user: {e}"),
    }

    Redirect::to("/").into_response()
}

/// Clear the stored user.
#[instrument(skip(state, session))]
pub async fn logout(State(state): State<AppState>, session: Session) -> Redirect {
    let scope = client_scope(&session).await;
    if let Err(e) = state.store().clear(scope, ClientKey::User).await {
        tracing::error!("Failed to clear signed-in user: {e}");
    }
    Redirect::to("/")
}
