//! Product management screen.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Multipart, Path, Query, State},
    response::{IntoResponse, Redirect},
};
use premium_food_core::{GalleryCategory, Product, ProductId, Record};
use tower_sessions::Session;
use tracing::instrument;

use super::{
    AdminLayout, Verb, add_dialog_path, edit_dialog_path, format_date, read_form, respond,
};
use crate::actions::products::{ProductForm, create_product, delete_product, update_product};
use crate::actions::{self, ActionContext, Entity};
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::screens::{Dialog, ListState, ScreenQuery};
use crate::state::AppState;

/// Product row in the admin table.
#[derive(Debug, Clone)]
pub struct ProductRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub image_url: Option<String>,
    pub is_featured: bool,
    pub created: String,
}

impl From<&Product> for ProductRow {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            description: product.description.clone().unwrap_or_default(),
            category: product.category.clone().unwrap_or_default(),
            image_url: product.image_url().map(str::to_owned),
            is_featured: product.is_featured,
            created: format_date(product.created_at),
        }
    }
}

/// Add/edit dialog contents.
#[derive(Debug, Clone)]
pub struct ProductFormView {
    pub heading: &'static str,
    pub action: String,
    pub submit_label: &'static str,
    pub name: String,
    pub description: String,
    pub category: String,
    pub image_url: String,
    pub is_featured: bool,
    /// New products need an image; edits keep the current one.
    pub image_required: bool,
}

impl ProductFormView {
    fn blank() -> Self {
        Self {
            heading: "Add Product",
            action: Product::ADMIN_PATH.to_string(),
            submit_label: "Add Product",
            name: String::new(),
            description: String::new(),
            category: String::new(),
            image_url: String::new(),
            is_featured: false,
            image_required: true,
        }
    }

    fn for_row(row: &ProductRow) -> Self {
        Self {
            heading: "Edit Product",
            action: format!("{}/{}", Product::ADMIN_PATH, row.id),
            submit_label: "Save Changes",
            name: row.name.clone(),
            description: row.description.clone(),
            category: row.category.clone(),
            image_url: row.image_url.clone().unwrap_or_default(),
            is_featured: row.is_featured,
            image_required: false,
        }
    }
}

/// Product management page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/products.html")]
pub struct ProductsTemplate {
    pub layout: AdminLayout,
    pub list: ListState<ProductRow>,
    pub form: Option<ProductFormView>,
    pub confirm_delete: Option<ProductRow>,
    pub categories: Vec<&'static str>,
}

/// Category suggestions offered in the dialog.
pub(super) fn category_options() -> Vec<&'static str> {
    GalleryCategory::TABS
        .into_iter()
        .filter(|tab| *tab != GalleryCategory::All)
        .map(GalleryCategory::label)
        .collect()
}

/// Display the product list with the dialog selected by the query string.
#[instrument(skip(admin, state, session))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    session: Session,
    Query(query): Query<ScreenQuery>,
) -> impl IntoResponse {
    let ctx = ActionContext::new(&state, &admin);
    let rows = actions::list::<Product>(&ctx)
        .await
        .map(|products| products.iter().map(ProductRow::from).collect::<Vec<_>>());
    let list = ListState::from_result(rows, "products");

    let (form, confirm_delete) = match query.dialog(list.items(), |row| row.id.as_str()) {
        Dialog::Closed => (None, None),
        Dialog::Add => (Some(ProductFormView::blank()), None),
        Dialog::Edit(row) => (Some(ProductFormView::for_row(&row)), None),
        Dialog::ConfirmDelete(row) => (None, Some(row)),
    };

    ProductsTemplate {
        layout: AdminLayout::load(&state, &admin, &session, Product::ADMIN_PATH).await,
        list,
        form,
        confirm_delete,
        categories: category_options(),
    }
}

/// Handle the add dialog.
#[instrument(skip(admin, state, session, multipart))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    session: Session,
    multipart: Multipart,
) -> Result<Redirect> {
    let form = ProductForm::from_multipart(read_form(multipart).await?);
    let ctx = ActionContext::new(&state, &admin);
    let result = create_product(&ctx, form).await;
    Ok(respond::<Product, _>(&session, Verb::Add, result, Some(add_dialog_path::<Product>())).await)
}

/// Handle the edit dialog.
#[instrument(skip(admin, state, session, multipart))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    session: Session,
    Path(id): Path<ProductId>,
    multipart: Multipart,
) -> Result<Redirect> {
    let form = ProductForm::from_multipart(read_form(multipart).await?);
    let ctx = ActionContext::new(&state, &admin);
    let result = update_product(&ctx, id, form).await;
    Ok(respond::<Product, _>(
        &session,
        Verb::Update,
        result,
        Some(edit_dialog_path::<Product>(id)),
    )
    .await)
}

/// Handle the delete confirmation.
#[instrument(skip(admin, state, session))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    session: Session,
    Path(id): Path<ProductId>,
) -> Redirect {
    let ctx = ActionContext::new(&state, &admin);
    let result = delete_product(&ctx, id).await;
    respond::<Product, _>(&session, Verb::Delete, result, None).await
}
