//! HTTP middleware stack for the site.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, added in `main`)
//! 2. `TraceLayer` (request tracing)
//! 3. Security headers (CSP, frame and referrer policy)
//! 4. Session layer (tower-sessions with in-memory store)
//! 5. Auth gate (`/admin*` and `/login` redirects, admin identity)

pub mod auth;
pub mod security_headers;
pub mod session;

pub use auth::{RequireAdmin, auth_gate, clear_current_admin, set_current_admin};
pub use security_headers::security_headers_middleware;
pub use session::{create_session_layer, set_flash, take_flash};
