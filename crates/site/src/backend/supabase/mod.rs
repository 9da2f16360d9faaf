//! Supabase implementation of the backend traits.
//!
//! One [`SupabaseClient`] covers all three services of a project:
//! - `/rest/v1` - PostgREST row access ([`rest`])
//! - `/storage/v1` - object storage ([`storage`])
//! - `/auth/v1` - `GoTrue` email/password auth ([`auth`])

mod auth;
mod rest;
mod storage;

use reqwest::{Method, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::{BackendError, Caller};
use crate::config::SupabaseConfig;

/// HTTP client for a Supabase project.
#[derive(Clone)]
pub struct SupabaseClient {
    client: reqwest::Client,
    base_url: String,
    api_key: SecretString,
}

impl SupabaseClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &SupabaseConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("premium-food-site/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.url.as_str().trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// Absolute URL for a path under the project.
    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Start a request with the API key and the caller's bearer token.
    fn request(&self, method: Method, url: &str, caller: &Caller) -> RequestBuilder {
        let bearer = caller
            .access_token()
            .map_or_else(|| self.api_key.expose_secret(), |token| token.as_str());

        self.client
            .request(method, url)
            .header("apikey", self.api_key.expose_secret())
            .bearer_auth(bearer)
    }
}

/// Error bodies differ between services; this accepts any of their shapes.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    msg: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        self.message
            .or(self.msg)
            .or(self.error_description)
            .or(self.error)
    }
}

/// Pass successful responses through; turn error statuses into [`BackendError::Api`].
async fn check(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(BackendError::Api {
        status: status.as_u16(),
        message: error_message(&body, status.canonical_reason().unwrap_or("Request failed")),
    })
}

/// Extract the provider's message from an error body.
fn error_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(ErrorBody::into_message)
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .unwrap_or_else(|| fallback.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_shapes() {
        assert_eq!(
            error_message(r#"{"code":"23505","message":"duplicate key"}"#, "x"),
            "duplicate key"
        );
        assert_eq!(
            error_message(r#"{"code":400,"msg":"Invalid login credentials"}"#, "x"),
            "Invalid login credentials"
        );
        assert_eq!(
            error_message(
                r#"{"error":"invalid_grant","error_description":"Refresh Token Not Found"}"#,
                "x"
            ),
            "Refresh Token Not Found"
        );
        assert_eq!(
            error_message(r#"{"statusCode":"409","error":"Duplicate","message":"The resource already exists"}"#, "x"),
            "The resource already exists"
        );
        assert_eq!(error_message("upstream timeout", "x"), "upstream timeout");
        assert_eq!(error_message("", "Bad Gateway"), "Bad Gateway");
    }
}
