//! Session-related types.
//!
//! Types stored in the session for authentication state and one-shot
//! notifications.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::backend::{AccessToken, AuthSession, Caller};

/// Refresh tokens this long before they actually expire.
const EXPIRY_LEEWAY_SECONDS: i64 = 30;

/// Session-stored admin identity and backend tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Auth provider user id.
    pub user_id: String,
    /// Email the admin signed in with.
    pub email: Option<String>,
    /// Token sent with the admin's backend calls.
    pub access_token: AccessToken,
    /// Token used to obtain a new access token.
    pub refresh_token: AccessToken,
    /// When `access_token` stops being accepted.
    pub expires_at: DateTime<Utc>,
}

impl CurrentAdmin {
    /// Whether the access token needs refreshing at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at - Duration::seconds(EXPIRY_LEEWAY_SECONDS) <= now
    }

    /// Backend caller acting as this admin.
    #[must_use]
    pub fn caller(&self) -> Caller {
        Caller::Authenticated(self.access_token.clone())
    }

    /// Name shown in the admin header.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.email.as_deref().unwrap_or("Admin")
    }
}

impl From<AuthSession> for CurrentAdmin {
    fn from(session: AuthSession) -> Self {
        Self {
            user_id: session.user.id,
            email: session.user.email,
            access_token: session.access_token,
            refresh_token: session.refresh_token,
            expires_at: session.expires_at,
        }
    }
}

/// Kind of flash message, which decides how it is styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
}

/// One-shot notification shown on the next rendered admin page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub title: String,
    pub message: String,
}

impl Flash {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            title: "Success".to_string(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            title: "Error".to_string(),
            message: message.into(),
        }
    }

    /// CSS modifier class for the toast.
    #[must_use]
    pub const fn css_class(&self) -> &'static str {
        match self.kind {
            FlashKind::Success => "toast-success",
            FlashKind::Error => "toast-error",
        }
    }
}

/// Session keys.
pub mod session_keys {
    /// Key for storing the signed-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";

    /// Key for the pending flash message.
    pub const FLASH: &str = "flash";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::AuthUser;

    fn admin(expires_at: DateTime<Utc>) -> CurrentAdmin {
        CurrentAdmin::from(AuthSession {
            access_token: AccessToken::new("access".to_string()),
            refresh_token: AccessToken::new("refresh".to_string()),
            expires_at,
            user: AuthUser {
                id: "user-1".to_string(),
                email: None,
            },
        })
    }

    #[test]
    fn test_expiry_includes_leeway() {
        let now = Utc::now();
        assert!(!admin(now + Duration::hours(1)).is_expired(now));
        assert!(admin(now + Duration::seconds(10)).is_expired(now));
        assert!(admin(now - Duration::seconds(1)).is_expired(now));
    }

    #[test]
    fn test_display_name_falls_back() {
        let admin = admin(Utc::now());
        assert_eq!(admin.display_name(), "Admin");
        assert_eq!(admin.caller(), Caller::Authenticated(AccessToken::new("access".to_string())));
    }
}
