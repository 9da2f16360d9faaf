//! Email/password sessions through the `GoTrue` auth API.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::Method;
use serde::Deserialize;

use super::{SupabaseClient, check};
use crate::backend::{AccessToken, AuthProvider, AuthSession, AuthUser, BackendError, Caller};

/// Token response from `/auth/v1/token`.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    expires_in: i64,
    expires_at: Option<i64>,
    user: AuthUser,
}

impl TokenResponse {
    fn into_session(self, now: DateTime<Utc>) -> AuthSession {
        let expires_at = self
            .expires_at
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .unwrap_or_else(|| now + Duration::seconds(self.expires_in));

        AuthSession {
            access_token: AccessToken::new(self.access_token),
            refresh_token: AccessToken::new(self.refresh_token),
            expires_at,
            user: self.user,
        }
    }
}

impl SupabaseClient {
    async fn token_grant(
        &self,
        grant_type: &str,
        body: serde_json::Value,
    ) -> Result<AuthSession, BackendError> {
        let url = self.endpoint(&format!("/auth/v1/token?grant_type={grant_type}"));
        let response = self
            .request(Method::POST, &url, &Caller::Anonymous)
            .json(&body)
            .send()
            .await?;
        let token: TokenResponse = check(response)
            .await?
            .json()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))?;

        Ok(token.into_session(Utc::now()))
    }
}

#[async_trait]
impl AuthProvider for SupabaseClient {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, BackendError> {
        self.token_grant(
            "password",
            serde_json::json!({ "email": email, "password": password }),
        )
        .await
    }

    async fn get_user(&self, access_token: &AccessToken) -> Result<AuthUser, BackendError> {
        let url = self.endpoint("/auth/v1/user");
        let caller = Caller::Authenticated(access_token.clone());
        let response = self.request(Method::GET, &url, &caller).send().await?;

        check(response)
            .await?
            .json()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))
    }

    async fn refresh_session(
        &self,
        refresh_token: &AccessToken,
    ) -> Result<AuthSession, BackendError> {
        self.token_grant(
            "refresh_token",
            serde_json::json!({ "refresh_token": refresh_token.as_str() }),
        )
        .await
    }

    async fn sign_out(&self, access_token: &AccessToken) -> Result<(), BackendError> {
        let url = self.endpoint("/auth/v1/logout");
        let caller = Caller::Authenticated(access_token.clone());
        let response = self.request(Method::POST, &url, &caller).send().await?;
        check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_prefers_absolute_expiry() {
        let token: TokenResponse = serde_json::from_value(serde_json::json!({
            "access_token": "a",
            "token_type": "bearer",
            "refresh_token": "r",
            "expires_in": 3600,
            "expires_at": 1_760_000_000,
            "user": { "id": "u-1", "email": "owner@premiumfood.ng", "role": "authenticated" }
        }))
        .unwrap();
        let session = token.into_session(Utc::now());
        assert_eq!(session.expires_at.timestamp(), 1_760_000_000);
        assert_eq!(session.user.email.as_deref(), Some("owner@premiumfood.ng"));
    }

    #[test]
    fn test_token_response_falls_back_to_relative_expiry() {
        let token: TokenResponse = serde_json::from_value(serde_json::json!({
            "access_token": "a",
            "refresh_token": "r",
            "expires_in": 60,
            "user": { "id": "u-1" }
        }))
        .unwrap();
        let now = Utc::now();
        let session = token.into_session(now);
        assert_eq!(session.expires_at, now + Duration::seconds(60));
    }
}
