//! Types stored in the session.

pub mod session;

pub use session::{CurrentAdmin, Flash, FlashKind, session_keys};
