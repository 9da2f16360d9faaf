//! Integration tests for Premium Food Ventures.
//!
//! Tests drive the real router in-process with `tower::ServiceExt::oneshot`.
//! The hosted backend is replaced by [`MemoryBackend`], which implements the
//! database, storage, and auth traits over in-memory maps and can be told to
//! fail individual operations.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p premium-food-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `actions` - Data-access actions against the memory backend
//! - `auth_gate` - Login, logout, and admin redirects
//! - `public_pages` - Home and gallery rendering and caching
//! - `admin_screens` - CRUD screens end to end
//! - `reconcile` - Orphaned object detection and paged reads

#![allow(clippy::missing_panics_doc, clippy::unwrap_used)]

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use chrono::{DateTime, Duration, TimeZone, Utc};
use premium_food_site::backend::{
    AccessToken, AuthProvider, AuthSession, AuthUser, BackendError, Bucket, Caller, Database,
    ObjectStorage, Query,
};
use premium_food_site::config::SiteConfig;
use premium_food_site::middleware::session::SESSION_COOKIE_NAME;
use premium_food_site::state::AppState;
use serde_json::{Map, Value};
use tower::ServiceExt;

/// Base URL of the pretend backend project.
pub const BACKEND_URL: &str = "http://supabase.test";

/// Credentials of the admin every [`MemoryBackend`] knows.
pub const ADMIN_EMAIL: &str = "admin@premiumfood.test";
pub const ADMIN_PASSWORD: &str = "fresh-fish-daily";

/// Message returned for writes without a valid admin token.
pub const RLS_VIOLATION: &str = "new row violates row-level security policy";

// =============================================================================
// Memory Backend
// =============================================================================

/// A backend operation that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Select,
    Insert,
    Update,
    Delete,
    Count,
    Upload,
    Remove,
    List,
    SignIn,
}

#[derive(Default)]
struct MemoryState {
    tables: HashMap<String, Vec<Value>>,
    /// Keyed by bucket, then object path.
    objects: HashMap<Bucket, BTreeMap<String, Vec<u8>>>,
    users: Vec<(String, String, AuthUser)>,
    access_tokens: HashMap<String, String>,
    refresh_tokens: HashMap<String, String>,
    failing: HashSet<Op>,
    /// Row ids that row-level security hides from writes.
    protected: HashSet<String>,
    /// Most rows a single select returns, like PostgREST's `max-rows`.
    max_rows: Option<usize>,
    calls: Vec<String>,
    /// Seconds added to the base timestamp for the next row.
    clock: i64,
    issued: u64,
}

/// In-memory stand-in for the hosted database, storage, and auth provider.
pub struct MemoryBackend {
    state: Mutex<MemoryState>,
    /// Lifetime of issued access tokens. Negative values issue expired tokens.
    session_ttl: Mutex<Duration>,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    /// Empty backend that knows the [`ADMIN_EMAIL`] user.
    #[must_use]
    pub fn new() -> Self {
        let backend = Self {
            state: Mutex::new(MemoryState::default()),
            session_ttl: Mutex::new(Duration::hours(1)),
        };
        backend.lock().users.push((
            ADMIN_EMAIL.to_string(),
            ADMIN_PASSWORD.to_string(),
            AuthUser {
                id: "user-admin".to_string(),
                email: Some(ADMIN_EMAIL.to_string()),
            },
        ));
        backend
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap()
    }

    /// Make every later call of `op` fail.
    pub fn fail(&self, op: Op) {
        self.lock().failing.insert(op);
    }

    /// Stop failing `op`.
    pub fn heal(&self, op: Op) {
        self.lock().failing.remove(&op);
    }

    /// Hide a row from admin writes, as a row-level security policy would.
    /// Deletes of it then match zero rows.
    pub fn protect_row(&self, id: &str) {
        self.lock().protected.insert(id.to_string());
    }

    /// Return at most `max_rows` rows from any one select.
    pub fn cap_rows(&self, max_rows: usize) {
        self.lock().max_rows = Some(max_rows);
    }

    /// Issue access tokens with this lifetime from now on.
    pub fn set_session_ttl(&self, ttl: Duration) {
        *self.session_ttl.lock().unwrap() = ttl;
    }

    /// Forget every issued token, as if sessions were revoked server-side.
    pub fn revoke_all_sessions(&self) {
        let mut state = self.lock();
        state.access_tokens.clear();
        state.refresh_tokens.clear();
    }

    /// Calls made so far, e.g. `insert gallery` or `upload gallery/gallery/x.png`.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    /// Forget recorded calls.
    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Insert a row directly, bypassing auth. Returns the generated id.
    pub fn seed(&self, table: &str, fields: Value) -> String {
        let mut state = self.lock();
        let row = state.stamp(fields);
        let id = row["id"].as_str().unwrap().to_string();
        state.tables.entry(table.to_string()).or_default().push(row);
        id
    }

    /// Current rows of a table, in insertion order.
    #[must_use]
    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.lock().tables.get(table).cloned().unwrap_or_default()
    }

    /// A row by id.
    #[must_use]
    pub fn row(&self, table: &str, id: &str) -> Option<Value> {
        self.rows(table)
            .into_iter()
            .find(|row| row["id"].as_str() == Some(id))
    }

    /// Store an object directly, bypassing auth.
    pub fn put_object(&self, bucket: Bucket, path: &str, bytes: &[u8]) {
        self.lock()
            .objects
            .entry(bucket)
            .or_default()
            .insert(path.to_string(), bytes.to_vec());
    }

    /// Paths of every object in a bucket, sorted.
    #[must_use]
    pub fn objects(&self, bucket: Bucket) -> Vec<String> {
        self.lock()
            .objects
            .get(&bucket)
            .map(|objects| objects.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Public URL the backend hands out for an object.
    #[must_use]
    pub fn url_for(bucket: Bucket, path: &str) -> String {
        format!("{BACKEND_URL}/storage/v1/object/public/{bucket}/{path}")
    }
}

impl MemoryState {
    fn record(&mut self, call: String, op: Op) -> Result<(), BackendError> {
        self.calls.push(call);
        if self.failing.contains(&op) {
            return Err(BackendError::Api {
                status: 500,
                message: format!("injected {op:?} failure"),
            });
        }
        Ok(())
    }

    fn authorize(&self, caller: &Caller) -> Result<(), BackendError> {
        match caller {
            Caller::Authenticated(token) if self.access_tokens.contains_key(token.as_str()) => {
                Ok(())
            }
            _ => Err(BackendError::Api {
                status: 403,
                message: RLS_VIOLATION.to_string(),
            }),
        }
    }

    /// Give a new row its id and timestamp. Later rows are strictly newer.
    fn stamp(&mut self, fields: Value) -> Value {
        self.clock += 1;
        let created_at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
            + Duration::seconds(self.clock);

        let mut row = match fields {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        row.insert(
            "id".to_string(),
            Value::String(uuid::Uuid::new_v4().to_string()),
        );
        row.insert(
            "created_at".to_string(),
            Value::String(created_at.to_rfc3339()),
        );
        Value::Object(row)
    }

    fn issue(&mut self, user: AuthUser, ttl: Duration) -> AuthSession {
        self.issued += 1;
        let access = format!("access-{}", self.issued);
        let refresh = format!("refresh-{}", self.issued);
        self.access_tokens.insert(access.clone(), user.id.clone());
        self.refresh_tokens.insert(refresh.clone(), user.id.clone());
        AuthSession {
            access_token: AccessToken::new(access),
            refresh_token: AccessToken::new(refresh),
            expires_at: Utc::now() + ttl,
            user,
        }
    }

    fn user(&self, id: &str) -> Option<AuthUser> {
        self.users
            .iter()
            .find(|(_, _, user)| user.id == id)
            .map(|(_, _, user)| user.clone())
    }
}

fn created_at(row: &Value) -> Option<DateTime<Utc>> {
    row.get("created_at")?.as_str()?.parse().ok()
}

#[async_trait]
impl Database for MemoryBackend {
    async fn select(
        &self,
        _caller: &Caller,
        table: &str,
        query: &Query,
    ) -> Result<Vec<Value>, BackendError> {
        let mut state = self.lock();
        state.record(format!("select {table}"), Op::Select)?;

        let mut rows: Vec<Value> = state
            .tables
            .get(table)
            .map(|rows| rows.iter().filter(|row| query.matches(row)).cloned().collect())
            .unwrap_or_default();

        if query.order.is_some() {
            // Every caller orders by creation time, newest first.
            rows.sort_by_key(|row| std::cmp::Reverse(created_at(row)));
        }

        let (offset, limit) = query.page.map_or((0, usize::MAX), |(offset, limit)| {
            (
                usize::try_from(offset).unwrap(),
                usize::try_from(limit).unwrap(),
            )
        });
        let limit = state.max_rows.map_or(limit, |max| limit.min(max));
        Ok(rows.into_iter().skip(offset).take(limit).collect())
    }

    async fn insert(&self, caller: &Caller, table: &str, row: Value) -> Result<Value, BackendError> {
        let mut state = self.lock();
        state.record(format!("insert {table}"), Op::Insert)?;
        state.authorize(caller)?;

        let row = state.stamp(row);
        state
            .tables
            .entry(table.to_string())
            .or_default()
            .push(row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        caller: &Caller,
        table: &str,
        id: &str,
        row: Value,
    ) -> Result<Value, BackendError> {
        let mut state = self.lock();
        state.record(format!("update {table}"), Op::Update)?;
        state.authorize(caller)?;

        let stored = state
            .tables
            .get_mut(table)
            .and_then(|rows| rows.iter_mut().find(|r| r["id"].as_str() == Some(id)))
            .ok_or_else(|| BackendError::NotFound(format!("{table} row {id}")))?;

        if let (Value::Object(stored), Value::Object(changes)) = (&mut *stored, row) {
            for (column, value) in changes {
                if column != "id" && column != "created_at" {
                    stored.insert(column, value);
                }
            }
        }
        Ok(stored.clone())
    }

    async fn delete(&self, caller: &Caller, table: &str, id: &str) -> Result<(), BackendError> {
        let mut state = self.lock();
        state.record(format!("delete {table}"), Op::Delete)?;
        state.authorize(caller)?;

        if state.protected.contains(id) {
            return Err(BackendError::NotFound(format!("{table} row {id}")));
        }
        let rows = state.tables.entry(table.to_string()).or_default();
        let before = rows.len();
        rows.retain(|row| row["id"].as_str() != Some(id));
        if rows.len() == before {
            return Err(BackendError::NotFound(format!("{table} row {id}")));
        }
        Ok(())
    }

    async fn count(&self, _caller: &Caller, table: &str) -> Result<u64, BackendError> {
        let mut state = self.lock();
        state.record(format!("count {table}"), Op::Count)?;
        Ok(state.tables.get(table).map_or(0, |rows| rows.len() as u64))
    }
}

#[async_trait]
impl ObjectStorage for MemoryBackend {
    async fn upload(
        &self,
        caller: &Caller,
        bucket: Bucket,
        path: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<(), BackendError> {
        let mut state = self.lock();
        state.record(format!("upload {bucket}/{path}"), Op::Upload)?;
        state.authorize(caller)?;

        let objects = state.objects.entry(bucket).or_default();
        if objects.contains_key(path) {
            return Err(BackendError::Api {
                status: 409,
                message: "The resource already exists".to_string(),
            });
        }
        objects.insert(path.to_string(), bytes);
        Ok(())
    }

    fn public_url(&self, bucket: Bucket, path: &str) -> String {
        Self::url_for(bucket, path)
    }

    async fn remove(
        &self,
        caller: &Caller,
        bucket: Bucket,
        paths: &[String],
    ) -> Result<(), BackendError> {
        let mut state = self.lock();
        state.record(format!("remove {bucket}/{}", paths.join(",")), Op::Remove)?;
        state.authorize(caller)?;

        if let Some(objects) = state.objects.get_mut(&bucket) {
            for path in paths {
                objects.remove(path);
            }
        }
        Ok(())
    }

    async fn list(
        &self,
        _caller: &Caller,
        bucket: Bucket,
        prefix: &str,
    ) -> Result<Vec<String>, BackendError> {
        let mut state = self.lock();
        state.record(format!("list {bucket}/{prefix}"), Op::List)?;
        let folder = format!("{prefix}/");
        Ok(state
            .objects
            .get(&bucket)
            .map(|objects| {
                objects
                    .keys()
                    .filter(|path| path.starts_with(&folder))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[async_trait]
impl AuthProvider for MemoryBackend {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, BackendError> {
        let ttl = *self.session_ttl.lock().unwrap();
        let mut state = self.lock();
        state.record(format!("sign_in {email}"), Op::SignIn)?;

        let user = state
            .users
            .iter()
            .find(|(e, p, _)| e.eq_ignore_ascii_case(email) && p == password)
            .map(|(_, _, user)| user.clone())
            .ok_or_else(|| BackendError::Api {
                status: 400,
                message: "Invalid login credentials".to_string(),
            })?;
        Ok(state.issue(user, ttl))
    }

    async fn get_user(&self, access_token: &AccessToken) -> Result<AuthUser, BackendError> {
        let state = self.lock();
        state
            .access_tokens
            .get(access_token.as_str())
            .and_then(|id| state.user(id))
            .ok_or_else(|| BackendError::Api {
                status: 401,
                message: "invalid JWT".to_string(),
            })
    }

    async fn refresh_session(
        &self,
        refresh_token: &AccessToken,
    ) -> Result<AuthSession, BackendError> {
        let ttl = *self.session_ttl.lock().unwrap();
        let mut state = self.lock();
        state.calls.push("refresh".to_string());

        let user = state
            .refresh_tokens
            .remove(refresh_token.as_str())
            .and_then(|id| state.user(&id))
            .ok_or_else(|| BackendError::Api {
                status: 400,
                message: "Invalid Refresh Token".to_string(),
            })?;
        Ok(state.issue(user, ttl))
    }

    async fn sign_out(&self, access_token: &AccessToken) -> Result<(), BackendError> {
        let mut state = self.lock();
        state.calls.push("sign_out".to_string());
        state.access_tokens.remove(access_token.as_str());
        Ok(())
    }
}

// =============================================================================
// Test App
// =============================================================================

/// Site configuration pointing at the memory backend.
#[must_use]
pub fn test_config() -> SiteConfig {
    SiteConfig::from_source(&|key: &str| match key {
        "SUPABASE_URL" => Some(BACKEND_URL.to_string()),
        "SUPABASE_ANON_KEY" => Some("anon-key".to_string()),
        _ => None,
    })
    .unwrap()
}

/// The full router over a fresh [`MemoryBackend`].
pub struct TestApp {
    pub backend: Arc<MemoryBackend>,
    pub state: AppState,
    router: Router,
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApp {
    #[must_use]
    pub fn new() -> Self {
        let backend = Arc::new(MemoryBackend::new());
        let state = AppState::with_backend(
            test_config(),
            backend.clone(),
            backend.clone(),
            backend.clone(),
        );
        let router = premium_food_site::app(state.clone());
        Self {
            backend,
            state,
            router,
        }
    }

    /// Send a request through the router.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    /// `GET` a path, optionally with a session cookie.
    pub async fn get(&self, path: &str, cookie: Option<&str>) -> TestResponse {
        let mut request = Request::get(path);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        self.send(request.body(Body::empty()).unwrap()).await
    }

    /// `POST` a URL-encoded form.
    pub async fn post_form(
        &self,
        path: &str,
        fields: &[(&str, &str)],
        cookie: Option<&str>,
    ) -> TestResponse {
        let body = fields
            .iter()
            .map(|(k, v)| format!("{}={}", encode(k), encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        let mut request = Request::post(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        self.send(request.body(Body::from(body)).unwrap()).await
    }

    /// `POST` a multipart form.
    pub async fn post_multipart(
        &self,
        path: &str,
        form: MultipartBody,
        cookie: Option<&str>,
    ) -> TestResponse {
        let (content_type, body) = form.finish();
        let mut request = Request::post(path).header(header::CONTENT_TYPE, content_type);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        self.send(request.body(Body::from(body)).unwrap()).await
    }

    /// Sign in as the admin and return the session cookie.
    pub async fn login(&self) -> String {
        let response = self
            .post_form(
                "/login",
                &[("email", ADMIN_EMAIL), ("password", ADMIN_PASSWORD)],
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::SEE_OTHER, "{}", response.body);
        response.session_cookie().expect("login sets a session cookie")
    }
}

/// Minimal `application/x-www-form-urlencoded` encoding.
fn encode(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (b as char).to_string()
            }
            b' ' => "+".to_string(),
            _ => format!("%{b:02X}"),
        })
        .collect()
}

/// A buffered response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// Redirect target, if any.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.headers.get(header::LOCATION)?.to_str().ok()
    }

    /// The `pfv_session=…` pair from `Set-Cookie`, if set.
    #[must_use]
    pub fn session_cookie(&self) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .filter_map(|value| value.split(';').next())
            .find(|pair| pair.starts_with(&format!("{SESSION_COOKIE_NAME}=")))
            .map(str::to_owned)
    }

    /// A header value as a string.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }
}

/// Builder for `multipart/form-data` request bodies.
pub struct MultipartBody {
    boundary: String,
    body: Vec<u8>,
}

impl Default for MultipartBody {
    fn default() -> Self {
        Self::new()
    }
}

impl MultipartBody {
    #[must_use]
    pub fn new() -> Self {
        Self {
            boundary: format!("pfv-boundary-{}", uuid::Uuid::new_v4().simple()),
            body: Vec::new(),
        }
    }

    /// Add a text field.
    #[must_use]
    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n",
                self.boundary
            )
            .as_bytes(),
        );
        self
    }

    /// Add a file field.
    #[must_use]
    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n",
                self.boundary
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// A file input the admin left empty, as browsers send it.
    #[must_use]
    pub fn empty_file(self, name: &str) -> Self {
        self.file(name, "", "application/octet-stream", b"")
    }

    fn finish(mut self) -> (String, Vec<u8>) {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        (
            format!("multipart/form-data; boundary={}", self.boundary),
            self.body,
        )
    }
}

/// Bytes of a tiny PNG.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n fake image";
