//! Hosted backend access: database rows, object storage, and auth.
//!
//! The site talks to its backend only through the three traits defined here.
//! [`supabase`] implements them over HTTP; tests substitute an in-memory
//! implementation.
//!
//! Every call carries a [`Caller`] so that row-level security on the backend
//! sees the signed-in admin rather than the anonymous public key.

pub mod repository;
pub mod supabase;

use std::fmt;
use std::future::Future;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use premium_food_core::Bucket;
pub use repository::Repository;

/// Errors returned by backend calls.
///
/// `Display` of [`BackendError::Api`] is the provider's own message, so it
/// can be shown to admins verbatim.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with an error status.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Row or object does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// Response body could not be understood.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// A user's access token for the backend.
///
/// `Debug` is redacted so tokens never reach logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    #[must_use]
    pub const fn new(token: String) -> Self {
        Self(token)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken([REDACTED])")
    }
}

/// Who a backend call is made on behalf of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    /// Public visitor, authorized by the API key alone.
    Anonymous,
    /// Signed-in admin.
    Authenticated(AccessToken),
}

impl Caller {
    /// The bearer token to send, if any.
    #[must_use]
    pub const fn access_token(&self) -> Option<&AccessToken> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(token) => Some(token),
        }
    }
}

/// Sort direction for [`Query::order_by`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Equality filters, ordering, and an optional page window for a select.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    /// `column = value` conditions, all of which must hold.
    pub filters: Vec<(String, Value)>,
    /// Column to order by.
    pub order: Option<(String, Direction)>,
    /// Rows to skip and the most rows to return.
    pub page: Option<(u64, u64)>,
}

impl Query {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an equality filter.
    #[must_use]
    pub fn eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filters.push((column.to_string(), value.into()));
        self
    }

    /// Order results by a column.
    #[must_use]
    pub fn order_by(mut self, column: &str, direction: Direction) -> Self {
        self.order = Some((column.to_string(), direction));
        self
    }

    /// Return at most `limit` rows, starting after the first `offset`.
    #[must_use]
    pub fn page(mut self, offset: u64, limit: u64) -> Self {
        self.page = Some((offset, limit));
        self
    }

    /// Whether a row satisfies every filter.
    #[must_use]
    pub fn matches(&self, row: &Value) -> bool {
        self.filters
            .iter()
            .all(|(column, value)| row.get(column) == Some(value))
    }
}

/// Drain a paged read.
///
/// `fetch` is called with the number of items collected so far and must
/// return the next page of at most `page_size` items. Reading stops at the
/// first short page.
///
/// # Errors
///
/// Returns the first error from `fetch`.
pub async fn collect_pages<T, F, Fut>(page_size: u64, mut fetch: F) -> Result<Vec<T>, BackendError>
where
    F: FnMut(u64) -> Fut,
    Fut: Future<Output = Result<Vec<T>, BackendError>>,
{
    let mut items = Vec::new();
    loop {
        let page = fetch(items.len() as u64).await?;
        let short = (page.len() as u64) < page_size;
        items.extend(page);
        if short {
            return Ok(items);
        }
    }
}

/// Row storage keyed by table name and primary id.
///
/// Rows travel as JSON objects; [`Repository`] adds typing on top.
#[async_trait]
pub trait Database: Send + Sync {
    /// Read the rows matching the query, within its page window if it has
    /// one. The backend may return fewer rows than asked for.
    async fn select(&self, caller: &Caller, table: &str, query: &Query)
    -> Result<Vec<Value>, BackendError>;

    /// Insert a row and return it as stored (with generated id and timestamp).
    async fn insert(&self, caller: &Caller, table: &str, row: Value) -> Result<Value, BackendError>;

    /// Update the row with the given id and return it as stored.
    async fn update(
        &self,
        caller: &Caller,
        table: &str,
        id: &str,
        row: Value,
    ) -> Result<Value, BackendError>;

    /// Delete the row with the given id.
    ///
    /// Fails with [`BackendError::NotFound`] when nothing was deleted,
    /// including when row-level security hides the row from the caller.
    async fn delete(&self, caller: &Caller, table: &str, id: &str) -> Result<(), BackendError>;

    /// Count rows in a table.
    async fn count(&self, caller: &Caller, table: &str) -> Result<u64, BackendError>;
}

/// An object in a storage bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Path inside the bucket.
    pub path: String,
    /// Public URL of the object.
    pub public_url: String,
}

/// Bucketed binary storage.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Upload bytes to `path` in `bucket`. Fails if the path already exists.
    async fn upload(
        &self,
        caller: &Caller,
        bucket: Bucket,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), BackendError>;

    /// Public URL for an object. Computed locally, no request is made.
    fn public_url(&self, bucket: Bucket, path: &str) -> String;

    /// Remove objects by path.
    async fn remove(&self, caller: &Caller, bucket: Bucket, paths: &[String])
    -> Result<(), BackendError>;

    /// List object paths directly under `prefix`.
    async fn list(
        &self,
        caller: &Caller,
        bucket: Bucket,
        prefix: &str,
    ) -> Result<Vec<String>, BackendError>;
}

/// A user as reported by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Tokens issued by a successful sign-in or refresh.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub access_token: AccessToken,
    pub refresh_token: AccessToken,
    pub expires_at: DateTime<Utc>,
    pub user: AuthUser,
}

/// Email/password authentication.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Sign in with email and password.
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, BackendError>;

    /// Look up the user an access token belongs to.
    async fn get_user(&self, access_token: &AccessToken) -> Result<AuthUser, BackendError>;

    /// Exchange a refresh token for a new session.
    async fn refresh_session(&self, refresh_token: &AccessToken)
    -> Result<AuthSession, BackendError>;

    /// Revoke the session behind an access token.
    async fn sign_out(&self, access_token: &AccessToken) -> Result<(), BackendError>;
}
