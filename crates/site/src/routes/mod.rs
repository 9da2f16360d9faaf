//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                                 - Home page
//! GET  /gallery?category=                - Gallery with category tabs
//!
//! # Auth
//! GET  /login                            - Login page
//! POST /login                            - Login action
//! POST /logout                           - Logout action
//!
//! # Admin (requires auth)
//! GET  /admin                            - Permanent redirect to /admin/products
//! GET  /admin/{entity}?dialog=&id=       - List screen with optional dialog
//! POST /admin/{entity}                   - Create
//! POST /admin/{entity}/{id}              - Update
//! POST /admin/{entity}/{id}/delete       - Delete
//! ```
//!
//! `{entity}` is one of `products`, `gallery`, `testimonials`.

pub mod admin;
pub mod auth;
pub mod gallery;
pub mod home;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create all page routes for the site.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Public pages
        .route("/", get(home::home))
        .route("/gallery", get(gallery::gallery))
        // Auth
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
        // Back-office
        .merge(admin::routes())
}
