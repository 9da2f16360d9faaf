//! Session middleware configuration and flash messages.
//!
//! Sessions only hold the signed-in admin's tokens and a pending flash
//! message, so an in-memory store is enough. Restarting the server signs
//! admins out.

use tower_sessions::{Expiry, MemoryStore, Session, SessionManagerLayer};

use crate::config::SiteConfig;
use crate::models::{Flash, session_keys};

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "pfv_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer with an in-memory store.
#[must_use]
pub fn create_session_layer(config: &SiteConfig) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// Queue a flash message for the next rendered page.
///
/// Failures are logged; a lost toast never fails the action that caused it.
pub async fn set_flash(session: &Session, flash: Flash) {
    if let Err(e) = session.insert(session_keys::FLASH, flash).await {
        tracing::warn!("Failed to store flash message: {e}");
    }
}

/// Take the pending flash message, if any.
pub async fn take_flash(session: &Session) -> Option<Flash> {
    session
        .remove::<Flash>(session_keys::FLASH)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to read flash message: {e}");
            None
        })
}
