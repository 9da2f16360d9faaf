//! Testimonial actions.

use premium_food_core::{Rating, Testimonial, TestimonialFields, TestimonialId};

use super::{ActionContext, ActionError, Entity, create, delete, require_fields, update};
use crate::backend::{BackendError, Caller, Database, Repository};
use crate::forms::{ImageInput, MultipartForm};

impl Entity for Testimonial {
    const ADMIN_PATH: &'static str = "/admin/testimonials";
    const PUBLIC_PATHS: &'static [&'static str] = &["/"];
    const IMAGE_REQUIRED: bool = false;
}

/// Submitted testimonial dialog.
#[derive(Debug, Default)]
pub struct TestimonialForm {
    pub author_name: String,
    pub content: String,
    /// Raw rating input; empty means no rating.
    pub rating: String,
    pub is_approved: bool,
    pub avatar: ImageInput,
}

impl TestimonialForm {
    /// Read the dialog's fields (`avatar` file, `avatar_url` text).
    #[must_use]
    pub fn from_multipart(mut form: MultipartForm) -> Self {
        let avatar = ImageInput::from_form(&mut form, "avatar", "avatar_url");
        Self {
            author_name: form.text("author_name"),
            content: form.text("content"),
            rating: form.text("rating"),
            is_approved: form.checkbox("is_approved"),
            avatar,
        }
    }

    /// Check required fields and parse the rating (clamped to 1-5).
    fn validate(&self) -> Result<Option<Rating>, ActionError> {
        require_fields(&[
            ("Author name", self.author_name.as_str()),
            ("Content", self.content.as_str()),
        ])?;

        if self.rating.is_empty() {
            return Ok(None);
        }
        Rating::parse(&self.rating)
            .map(Some)
            .map_err(|e| ActionError::Validation(format!("Invalid rating: {e}.")))
    }

    fn split(
        self,
        rating: Option<Rating>,
    ) -> (
        ImageInput,
        impl FnOnce(Option<String>) -> TestimonialFields + Send,
    ) {
        let Self {
            author_name,
            content,
            is_approved,
            avatar,
            ..
        } = self;
        let build = move |avatar_url| TestimonialFields {
            author_name,
            content,
            rating,
            avatar_url,
            is_approved,
        };
        (avatar, build)
    }
}

/// Add a testimonial. The avatar is optional.
///
/// # Errors
///
/// Returns a validation error for missing fields or a bad rating, otherwise
/// the backend's error.
pub async fn create_testimonial(
    ctx: &ActionContext<'_>,
    form: TestimonialForm,
) -> Result<Testimonial, ActionError> {
    let rating = form.validate()?;
    let (avatar, build) = form.split(rating);
    create::<Testimonial, _>(ctx, avatar, build).await
}

/// Edit a testimonial. Without a new avatar the stored one is kept.
///
/// # Errors
///
/// Returns a validation error for missing fields or a bad rating, otherwise
/// the backend's error.
pub async fn update_testimonial(
    ctx: &ActionContext<'_>,
    id: TestimonialId,
    form: TestimonialForm,
) -> Result<Testimonial, ActionError> {
    let rating = form.validate()?;
    let (avatar, build) = form.split(rating);
    update::<Testimonial, _>(ctx, id, avatar, build).await
}

/// Delete a testimonial and, best-effort, its avatar.
///
/// # Errors
///
/// Returns the backend's error if the testimonial cannot be read or deleted.
pub async fn delete_testimonial(
    ctx: &ActionContext<'_>,
    id: TestimonialId,
) -> Result<(), ActionError> {
    delete::<Testimonial>(ctx, id).await
}

/// Approved testimonials for the public home page, newest first.
///
/// # Errors
///
/// Returns the backend error if the read fails.
pub async fn list_approved_testimonials(
    db: &dyn Database,
) -> Result<Vec<Testimonial>, BackendError> {
    Repository::<Testimonial>::new(db, &Caller::Anonymous)
        .list_where("is_approved", true)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(rating: &str) -> TestimonialForm {
        TestimonialForm {
            author_name: "Musa".to_string(),
            content: "Best chicken in Kano.".to_string(),
            rating: rating.to_string(),
            ..TestimonialForm::default()
        }
    }

    #[test]
    fn test_rating_is_optional_and_clamped() {
        assert_eq!(form("").validate().ok(), Some(None));
        assert_eq!(
            form("8").validate().ok().flatten().map(Rating::stars),
            Some(5)
        );
        assert_eq!(
            form("0").validate().ok().flatten().map(Rating::stars),
            Some(1)
        );
    }

    #[test]
    fn test_bad_rating_is_rejected() {
        let err = form("great").validate().err().map(|e| e.to_string());
        assert_eq!(
            err.as_deref(),
            Some("Invalid rating: rating must be a whole number from 1 to 5.")
        );
    }

    #[test]
    fn test_content_required() {
        let mut form = form("5");
        form.content.clear();
        assert!(matches!(form.validate(), Err(ActionError::Validation(_))));
    }
}
