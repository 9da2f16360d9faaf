//! Gallery actions.

use premium_food_core::{GalleryFields, GalleryItem, GalleryItemId, Record};

use super::{ActionContext, ActionError, Entity, create, delete, require_fields, update};
use crate::backend::{BackendError, Caller, Database, Repository};
use crate::forms::{ImageInput, MultipartForm, non_empty};

impl Entity for GalleryItem {
    const ADMIN_PATH: &'static str = "/admin/gallery";
    const PUBLIC_PATHS: &'static [&'static str] = &["/", "/gallery"];
    const IMAGE_REQUIRED: bool = true;
}

/// Submitted gallery dialog.
#[derive(Debug, Default)]
pub struct GalleryForm {
    pub title: String,
    pub description: String,
    pub category: String,
    pub image: ImageInput,
}

impl GalleryForm {
    /// Read the dialog's fields (`image` file, `image_url` text).
    #[must_use]
    pub fn from_multipart(mut form: MultipartForm) -> Self {
        let image = ImageInput::from_form(&mut form, "image", "image_url");
        Self {
            title: form.text("title"),
            description: form.text("description"),
            category: form.text("category"),
            image,
        }
    }

    fn validate(&self) -> Result<(), ActionError> {
        require_fields(&[
            ("Title", self.title.as_str()),
            ("Description", self.description.as_str()),
            ("Category", self.category.as_str()),
        ])
    }

    fn split(self) -> (ImageInput, impl FnOnce(Option<String>) -> GalleryFields + Send) {
        let Self {
            title,
            description,
            category,
            image,
        } = self;
        // Gallery images are required, so the URL is always resolved by now.
        let build = move |image_url: Option<String>| GalleryFields {
            title,
            description: non_empty(description),
            image_url: image_url.unwrap_or_default(),
            category: non_empty(category),
        };
        (image, build)
    }
}

/// Add a gallery item.
///
/// Rejected before any remote call when neither a file nor a URL is given.
///
/// # Errors
///
/// Returns a validation error for missing fields or image, otherwise the
/// backend's error.
pub async fn create_gallery_item(
    ctx: &ActionContext<'_>,
    form: GalleryForm,
) -> Result<GalleryItem, ActionError> {
    form.validate()?;
    let (image, build) = form.split();
    create::<GalleryItem, _>(ctx, image, build).await
}

/// Edit a gallery item. Without a new image the stored one is kept.
///
/// # Errors
///
/// Returns a validation error for missing fields, otherwise the backend's error.
pub async fn update_gallery_item(
    ctx: &ActionContext<'_>,
    id: GalleryItemId,
    form: GalleryForm,
) -> Result<GalleryItem, ActionError> {
    form.validate()?;
    let (image, build) = form.split();
    update::<GalleryItem, _>(ctx, id, image, build).await
}

/// Delete a gallery item and, best-effort, its image.
///
/// # Errors
///
/// Returns the backend's error if the item cannot be read or deleted.
pub async fn delete_gallery_item(
    ctx: &ActionContext<'_>,
    id: GalleryItemId,
) -> Result<(), ActionError> {
    delete::<GalleryItem>(ctx, id).await
}

/// Gallery items for public pages: newest first, only those with an image.
///
/// # Errors
///
/// Returns the backend error if the read fails.
pub async fn list_public_gallery(db: &dyn Database) -> Result<Vec<GalleryItem>, BackendError> {
    let items = Repository::<GalleryItem>::new(db, &Caller::Anonymous)
        .list()
        .await?;
    Ok(items
        .into_iter()
        .filter(|item| item.image_url().is_some())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_names_missing_fields() {
        let form = GalleryForm::from_multipart(MultipartForm::from_parts(
            &[("title", "Grilled chicken"), ("category", "Chicken")],
            vec![],
        ));
        let err = form.validate().err().map(|e| e.to_string());
        assert_eq!(err.as_deref(), Some("Please fill in: Description."));
    }
}
