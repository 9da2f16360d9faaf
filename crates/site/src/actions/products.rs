//! Product actions.

use premium_food_core::{Product, ProductFields, ProductId};

use super::{ActionContext, ActionError, Entity, create, delete, require_fields, update};
use crate::backend::{BackendError, Caller, Database, Repository};
use crate::forms::{ImageInput, MultipartForm, non_empty};

impl Entity for Product {
    const ADMIN_PATH: &'static str = "/admin/products";
    const PUBLIC_PATHS: &'static [&'static str] = &["/"];
    const IMAGE_REQUIRED: bool = true;
}

/// Submitted product dialog.
#[derive(Debug, Default)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub category: String,
    pub is_featured: bool,
    pub image: ImageInput,
}

impl ProductForm {
    /// Read the dialog's fields (`image` file, `image_url` text).
    #[must_use]
    pub fn from_multipart(mut form: MultipartForm) -> Self {
        let image = ImageInput::from_form(&mut form, "image", "image_url");
        Self {
            name: form.text("name"),
            description: form.text("description"),
            category: form.text("category"),
            is_featured: form.checkbox("is_featured"),
            image,
        }
    }

    fn validate(&self) -> Result<(), ActionError> {
        require_fields(&[
            ("Name", self.name.as_str()),
            ("Description", self.description.as_str()),
            ("Category", self.category.as_str()),
        ])
    }

    fn split(self) -> (ImageInput, impl FnOnce(Option<String>) -> ProductFields + Send) {
        let Self {
            name,
            description,
            category,
            is_featured,
            image,
        } = self;
        let build = move |image_url| ProductFields {
            name,
            description: non_empty(description),
            image_url,
            category: non_empty(category),
            is_featured,
        };
        (image, build)
    }
}

/// Add a product.
///
/// # Errors
///
/// Returns a validation error for missing fields or image, otherwise the
/// backend's error.
pub async fn create_product(
    ctx: &ActionContext<'_>,
    form: ProductForm,
) -> Result<Product, ActionError> {
    form.validate()?;
    let (image, build) = form.split();
    create::<Product, _>(ctx, image, build).await
}

/// Edit a product. Without a new image the stored one is kept.
///
/// # Errors
///
/// Returns a validation error for missing fields, otherwise the backend's error.
pub async fn update_product(
    ctx: &ActionContext<'_>,
    id: ProductId,
    form: ProductForm,
) -> Result<Product, ActionError> {
    form.validate()?;
    let (image, build) = form.split();
    update::<Product, _>(ctx, id, image, build).await
}

/// Delete a product and, best-effort, its image.
///
/// # Errors
///
/// Returns the backend's error if the product cannot be read or deleted.
pub async fn delete_product(ctx: &ActionContext<'_>, id: ProductId) -> Result<(), ActionError> {
    delete::<Product>(ctx, id).await
}

/// Featured products for the public home page, newest first.
///
/// # Errors
///
/// Returns the backend error if the read fails.
pub async fn list_featured_products(db: &dyn Database) -> Result<Vec<Product>, BackendError> {
    Repository::<Product>::new(db, &Caller::Anonymous)
        .list_where("is_featured", true)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_requires_text_fields() {
        let form = ProductForm {
            name: "Frozen Chicken".to_string(),
            ..ProductForm::default()
        };
        let err = form.validate().err().map(|e| e.to_string());
        assert_eq!(
            err.as_deref(),
            Some("Please fill in: Description, Category.")
        );
    }

    #[test]
    fn test_fields_from_form() {
        let form = ProductForm::from_multipart(MultipartForm::from_parts(
            &[
                ("name", "Dried Stockfish"),
                ("description", "Sun-dried"),
                ("category", "Dried Products"),
                ("is_featured", "on"),
            ],
            vec![],
        ));
        assert!(form.validate().is_ok());
        assert!(matches!(form.image, ImageInput::Unchanged));

        let (_, build) = form.split();
        let fields = build(Some("https://x/products/products/a.png".to_string()));
        assert_eq!(fields.name, "Dried Stockfish");
        assert_eq!(fields.category.as_deref(), Some("Dried Products"));
        assert!(fields.is_featured);
    }
}
