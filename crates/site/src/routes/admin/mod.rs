//! Admin back-office route handlers.
//!
//! One CRUD screen per entity. Every screen is a full list with an optional
//! dialog selected by query string; every form posts, sets a flash message,
//! and redirects back with 303 See Other.

pub mod gallery;
pub mod products;
pub mod testimonials;

use axum::{
    Router,
    extract::{DefaultBodyLimit, Multipart},
    response::Redirect,
    routing::{get, post},
};
use premium_food_core::{GalleryItem, Product, Record, Testimonial};
use tower_sessions::Session;

use crate::actions::{ActionError, Entity};
use crate::backend::{Caller, Database, Repository};
use crate::error::{AppError, add_breadcrumb};
use crate::forms::MultipartForm;
use crate::middleware::{set_flash, take_flash};
use crate::models::{CurrentAdmin, Flash, FlashKind};
use crate::state::AppState;

/// Largest accepted form body, including the image file.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Rendered in place of a row count that could not be read.
const COUNT_UNAVAILABLE: &str = "—";

/// Create the admin routes router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin", get(index))
        // Products
        .route(
            "/admin/products",
            get(products::index).post(products::create),
        )
        .route("/admin/products/{id}", post(products::update))
        .route("/admin/products/{id}/delete", post(products::delete))
        // Gallery
        .route("/admin/gallery", get(gallery::index).post(gallery::create))
        .route("/admin/gallery/{id}", post(gallery::update))
        .route("/admin/gallery/{id}/delete", post(gallery::delete))
        // Testimonials
        .route(
            "/admin/testimonials",
            get(testimonials::index).post(testimonials::create),
        )
        .route("/admin/testimonials/{id}", post(testimonials::update))
        .route(
            "/admin/testimonials/{id}/delete",
            post(testimonials::delete),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

/// The dashboard has no page of its own.
pub async fn index() -> Redirect {
    Redirect::permanent(Product::ADMIN_PATH)
}

// =============================================================================
// Layout
// =============================================================================

/// Sidebar link with the entity's row count.
#[derive(Debug, Clone)]
pub struct NavItem {
    pub label: &'static str,
    pub href: &'static str,
    pub count: String,
    pub active: bool,
}

/// Data shared by every admin page.
#[derive(Debug, Clone)]
pub struct AdminLayout {
    pub admin_name: String,
    pub current_path: &'static str,
    pub nav: Vec<NavItem>,
    pub flash: Option<Flash>,
}

impl AdminLayout {
    /// Load counts and take the pending flash for a screen.
    pub async fn load(
        state: &AppState,
        admin: &CurrentAdmin,
        session: &Session,
        current_path: &'static str,
    ) -> Self {
        let caller = admin.caller();
        let db = state.database();
        let (products, gallery, testimonials, flash) = tokio::join!(
            count_label::<Product>(db, &caller),
            count_label::<GalleryItem>(db, &caller),
            count_label::<Testimonial>(db, &caller),
            take_flash(session),
        );

        let nav = [
            ("Products", Product::ADMIN_PATH, products),
            ("Gallery", GalleryItem::ADMIN_PATH, gallery),
            ("Testimonials", Testimonial::ADMIN_PATH, testimonials),
        ]
        .into_iter()
        .map(|(label, href, count)| NavItem {
            label,
            href,
            count,
            active: href == current_path,
        })
        .collect();

        Self {
            admin_name: admin.display_name().to_string(),
            current_path,
            nav,
            flash,
        }
    }

    /// CSS class for the flash toast, if there is one.
    #[must_use]
    pub fn flash_class(&self) -> &'static str {
        self.flash.as_ref().map_or("", Flash::css_class)
    }
}

/// Row count for the sidebar. Failures are logged and shown as a dash.
async fn count_label<R: Record>(db: &dyn Database, caller: &Caller) -> String {
    match Repository::<R>::new(db, caller).count().await {
        Ok(count) => count.to_string(),
        Err(e) => {
            tracing::warn!(table = R::TABLE, "Failed to count rows: {e}");
            COUNT_UNAVAILABLE.to_string()
        }
    }
}

// =============================================================================
// Form Outcomes
// =============================================================================

/// The mutation a form performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Add,
    Update,
    Delete,
}

impl Verb {
    const fn present(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    const fn past(self) -> &'static str {
        match self {
            Self::Add => "added",
            Self::Update => "updated",
            Self::Delete => "deleted",
        }
    }
}

/// Toast for an action's outcome.
#[must_use]
pub fn outcome_flash<E: Entity, T>(verb: Verb, result: &Result<T, ActionError>) -> Flash {
    match result {
        Ok(_) => Flash::success(format!(
            "{} {} successfully.",
            capitalize(E::NOUN),
            verb.past()
        )),
        Err(ActionError::Validation(message)) => Flash {
            kind: FlashKind::Error,
            title: "Validation Error".to_string(),
            message: message.clone(),
        },
        Err(ActionError::Remote(e)) => {
            Flash::error(format!("Failed to {} {}: {e}", verb.present(), E::NOUN))
        }
    }
}

/// Flash the outcome of an action and redirect.
///
/// Success goes back to the list; a failed add or edit reopens its dialog.
pub async fn respond<E: Entity, T>(
    session: &Session,
    verb: Verb,
    result: Result<T, ActionError>,
    retry: Option<String>,
) -> Redirect {
    let flash = outcome_flash::<E, T>(verb, &result);

    let target = match &result {
        Ok(_) => {
            add_breadcrumb("admin", &flash.message);
            E::ADMIN_PATH.to_string()
        }
        Err(e) => {
            match e {
                ActionError::Validation(_) => {
                    tracing::info!(table = E::TABLE, verb = verb.present(), "Rejected form: {e}");
                }
                ActionError::Remote(_) => {
                    tracing::error!(table = E::TABLE, verb = verb.present(), "Action failed: {e}");
                }
            }
            retry.unwrap_or_else(|| E::ADMIN_PATH.to_string())
        }
    };

    set_flash(session, flash).await;
    Redirect::to(&target)
}

/// List URL with the add dialog open.
#[must_use]
pub fn add_dialog_path<E: Entity>() -> String {
    format!("{}?dialog=add", E::ADMIN_PATH)
}

/// List URL with the edit dialog open for a record.
#[must_use]
pub fn edit_dialog_path<E: Entity>(id: E::Id) -> String {
    format!("{}?dialog=edit&id={id}", E::ADMIN_PATH)
}

/// Dates in admin tables.
#[must_use]
pub fn format_date(date: chrono::DateTime<chrono::Utc>) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Read a submitted admin form.
///
/// # Errors
///
/// Returns a bad request if the body is not valid multipart data.
pub async fn read_form(multipart: Multipart) -> Result<MultipartForm, AppError> {
    MultipartForm::read(multipart)
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))
}

/// `Gallery item` from `gallery item`.
fn capitalize(noun: &str) -> String {
    let mut chars = noun.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendError;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("gallery item"), "Gallery item");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_success_flash_text() {
        let flash = outcome_flash::<Product, ()>(Verb::Add, &Ok(()));
        assert_eq!(flash.kind, FlashKind::Success);
        assert_eq!(flash.message, "Product added successfully.");

        let flash = outcome_flash::<GalleryItem, ()>(Verb::Delete, &Ok(()));
        assert_eq!(flash.message, "Gallery item deleted successfully.");
    }

    #[test]
    fn test_failure_flash_carries_provider_message() {
        let result: Result<(), ActionError> = Err(ActionError::Remote(BackendError::Api {
            status: 403,
            message: "new row violates row-level security policy".to_string(),
        }));
        let flash = outcome_flash::<Testimonial, ()>(Verb::Update, &result);
        assert_eq!(flash.kind, FlashKind::Error);
        assert_eq!(
            flash.message,
            "Failed to update testimonial: new row violates row-level security policy"
        );
    }

    #[test]
    fn test_validation_flash_is_the_message() {
        let result: Result<(), ActionError> = Err(ActionError::Validation(
            "Image file is required for new products.".to_string(),
        ));
        let flash = outcome_flash::<Product, ()>(Verb::Add, &result);
        assert_eq!(flash.title, "Validation Error");
        assert_eq!(flash.message, "Image file is required for new products.");
    }
}
