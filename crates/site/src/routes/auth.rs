//! Authentication route handlers.
//!
//! Email/password sign-in against the auth provider. The resulting tokens are
//! kept in the server-side session; the browser only holds the session cookie.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use premium_food_core::Email;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::content;
use crate::error::{AppError, add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::auth::{ADMIN_PATH, LOGIN_PATH};
use crate::middleware::{clear_current_admin, set_current_admin};
use crate::models::{CurrentAdmin, session_keys};
use crate::state::AppState;

/// Shown for every failed sign-in, whatever the provider said.
pub const LOGIN_FAILED: &str = "Could not authenticate user";

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub current_path: &'static str,
    pub business_name: &'static str,
    pub error: Option<String>,
    /// Email to refill after a failed attempt.
    pub email: String,
}

impl LoginTemplate {
    fn new(error: Option<&str>, email: &str) -> Self {
        Self {
            current_path: LOGIN_PATH,
            business_name: content::BUSINESS_NAME,
            error: error.map(str::to_owned),
            email: email.to_string(),
        }
    }
}

/// Display the login page.
#[instrument]
pub async fn login_page() -> impl IntoResponse {
    LoginTemplate::new(None, "")
}

/// Handle login form submission.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let email = match Email::parse(&form.email) {
        Ok(email) => email,
        Err(e) => {
            let message = format!("Please enter a valid email address: {e}.");
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                LoginTemplate::new(Some(&message), &form.email),
            )
                .into_response();
        }
    };

    let auth_session = match state
        .auth()
        .sign_in_with_password(email.as_str(), &form.password)
        .await
    {
        Ok(auth_session) => auth_session,
        Err(e) => {
            tracing::info!(email = %email, "Sign-in failed: {e}");
            return (
                StatusCode::UNAUTHORIZED,
                LoginTemplate::new(Some(LOGIN_FAILED), email.as_str()),
            )
                .into_response();
        }
    };

    let admin = CurrentAdmin::from(auth_session);

    // New identity, new session id
    if let Err(e) = session.cycle_id().await {
        return AppError::Session(e).into_response();
    }
    if let Err(e) = set_current_admin(&session, &admin).await {
        return AppError::Session(e).into_response();
    }

    set_sentry_user(&admin.user_id, admin.email.as_deref());
    add_breadcrumb("auth", "Admin signed in");
    tracing::info!(user_id = %admin.user_id, "Admin signed in");

    state.pages().revalidate_layout();
    Redirect::to(ADMIN_PATH).into_response()
}

/// Handle logout.
///
/// The provider sign-out is best-effort; the local session is always cleared.
#[instrument(skip(state, session))]
pub async fn logout(State(state): State<AppState>, session: Session) -> Redirect {
    let admin = session
        .get::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to read session: {e}");
            None
        });

    if let Some(admin) = admin {
        if let Err(e) = state.auth().sign_out(&admin.access_token).await {
            tracing::warn!(user_id = %admin.user_id, "Provider sign-out failed: {e}");
        }
        tracing::info!(user_id = %admin.user_id, "Admin signed out");
    }

    if let Err(e) = clear_current_admin(&session).await {
        tracing::warn!("Failed to clear session: {e}");
    }
    if let Err(e) = session.flush().await {
        tracing::warn!("Failed to delete session: {e}");
    }

    clear_sentry_user();
    state.pages().revalidate_layout();
    Redirect::to(LOGIN_PATH)
}
