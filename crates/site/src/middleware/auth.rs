//! Authentication gate and extractors.
//!
//! [`auth_gate`] runs before every `/admin*` and `/login` request. It resolves
//! the session's admin with the auth provider (refreshing an expired access
//! token) and applies two redirect rules:
//!
//! - not signed in + admin path → `/login`
//! - signed in + `/login` → `/admin`
//!
//! Signed-in admin requests get the [`CurrentAdmin`] inserted into request
//! extensions, where [`RequireAdmin`] picks it up.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use tower_sessions::Session;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::models::{CurrentAdmin, session_keys};
use crate::state::AppState;

/// Sign-in page.
pub const LOGIN_PATH: &str = "/login";

/// Admin dashboard entry point.
pub const ADMIN_PATH: &str = "/admin";

/// Whether a path belongs to the admin area.
#[must_use]
pub fn is_admin_path(path: &str) -> bool {
    path == ADMIN_PATH || path.starts_with("/admin/")
}

/// Where to send a request instead of serving it, if anywhere.
///
/// The two rules are independent; at most one can apply to a given path.
#[must_use]
pub fn gate_redirect(authenticated: bool, path: &str) -> Option<&'static str> {
    if !authenticated && is_admin_path(path) {
        Some(LOGIN_PATH)
    } else if authenticated && path == LOGIN_PATH {
        Some(ADMIN_PATH)
    } else {
        None
    }
}

/// Request-level auth gate.
pub async fn auth_gate(
    State(state): State<AppState>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();
    if !is_admin_path(&path) && path != LOGIN_PATH {
        return next.run(request).await;
    }

    let admin = resolve_admin(&state, &session).await;

    if let Some(target) = gate_redirect(admin.is_some(), &path) {
        tracing::debug!(%path, target, "Auth gate redirect");
        return Redirect::to(target).into_response();
    }

    if let Some(admin) = admin {
        set_sentry_user(&admin.user_id, admin.email.as_deref());
        request.extensions_mut().insert(admin);
    }

    next.run(request).await
}

/// Load the session's admin and confirm it with the auth provider.
///
/// Expired access tokens are refreshed and written back to the session.
/// Any failure signs the admin out.
async fn resolve_admin(state: &AppState, session: &Session) -> Option<CurrentAdmin> {
    let mut admin: CurrentAdmin = session
        .get(session_keys::CURRENT_ADMIN)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to read session: {e}");
            None
        })?;

    if admin.is_expired(Utc::now()) {
        match state.auth().refresh_session(&admin.refresh_token).await {
            Ok(refreshed) => {
                admin = CurrentAdmin::from(refreshed);
                if let Err(e) = set_current_admin(session, &admin).await {
                    tracing::warn!("Failed to store refreshed session: {e}");
                }
                tracing::info!(user_id = %admin.user_id, "Refreshed admin session");
            }
            Err(e) => {
                tracing::info!("Admin session refresh failed: {e}");
                sign_out_locally(session).await;
                return None;
            }
        }
    }

    match state.auth().get_user(&admin.access_token).await {
        Ok(user) if user.id == admin.user_id => Some(admin),
        Ok(user) => {
            tracing::warn!(
                session_user = %admin.user_id,
                token_user = %user.id,
                "Session token belongs to a different user"
            );
            sign_out_locally(session).await;
            None
        }
        Err(e) => {
            tracing::info!("Admin session rejected by auth provider: {e}");
            sign_out_locally(session).await;
            None
        }
    }
}

async fn sign_out_locally(session: &Session) {
    if let Err(e) = clear_current_admin(session).await {
        tracing::warn!("Failed to clear session: {e}");
    }
    clear_sentry_user();
}

/// Extractor for the admin resolved by [`auth_gate`].
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireAdmin(admin): RequireAdmin) -> impl IntoResponse {
///     format!("Hello, {}!", admin.display_name())
/// }
/// ```
pub struct RequireAdmin(pub CurrentAdmin);

/// Rejection when a handler requires an admin but the gate found none.
pub struct RedirectToLogin;

impl IntoResponse for RedirectToLogin {
    fn into_response(self) -> Response {
        Redirect::to(LOGIN_PATH).into_response()
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = RedirectToLogin;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentAdmin>()
            .cloned()
            .map(Self)
            .ok_or(RedirectToLogin)
    }
}

/// Helper to set the current admin in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_admin(
    session: &Session,
    admin: &CurrentAdmin,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_ADMIN, admin).await
}

/// Helper to clear the current admin from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_admin(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthenticated_admin_paths_go_to_login() {
        for path in ["/admin", "/admin/products", "/admin/gallery/new", "/admin/testimonials"] {
            assert_eq!(gate_redirect(false, path), Some("/login"), "{path}");
        }
    }

    #[test]
    fn test_authenticated_login_goes_to_admin() {
        assert_eq!(gate_redirect(true, "/login"), Some("/admin"));
    }

    #[test]
    fn test_other_combinations_pass_through() {
        assert_eq!(gate_redirect(false, "/login"), None);
        assert_eq!(gate_redirect(true, "/admin/products"), None);
        assert_eq!(gate_redirect(false, "/"), None);
        assert_eq!(gate_redirect(true, "/gallery"), None);
        assert_eq!(gate_redirect(false, "/administrator"), None);
    }
}
