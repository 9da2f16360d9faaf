//! Gallery management screen.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Multipart, Path, Query, State},
    response::{IntoResponse, Redirect},
};
use premium_food_core::{GalleryItem, GalleryItemId, Record};
use tower_sessions::Session;
use tracing::instrument;

use super::products::category_options;
use super::{
    AdminLayout, Verb, add_dialog_path, edit_dialog_path, format_date, read_form, respond,
};
use crate::actions::gallery::{
    GalleryForm, create_gallery_item, delete_gallery_item, update_gallery_item,
};
use crate::actions::{self, ActionContext, Entity};
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::screens::{Dialog, ListState, ScreenQuery};
use crate::state::AppState;

/// Gallery row in the admin grid.
#[derive(Debug, Clone)]
pub struct GalleryRow {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub image_url: Option<String>,
    pub created: String,
}

impl From<&GalleryItem> for GalleryRow {
    fn from(item: &GalleryItem) -> Self {
        Self {
            id: item.id.to_string(),
            title: item.title.clone(),
            description: item.description.clone().unwrap_or_default(),
            category: item.category.clone().unwrap_or_default(),
            image_url: item.image_url().map(str::to_owned),
            created: format_date(item.created_at),
        }
    }
}

/// Add/edit dialog contents.
#[derive(Debug, Clone)]
pub struct GalleryFormView {
    pub heading: &'static str,
    pub action: String,
    pub submit_label: &'static str,
    pub title: String,
    pub description: String,
    pub category: String,
    pub image_url: String,
    pub image_required: bool,
}

impl GalleryFormView {
    fn blank() -> Self {
        Self {
            heading: "Add Gallery Item",
            action: GalleryItem::ADMIN_PATH.to_string(),
            submit_label: "Add Item",
            title: String::new(),
            description: String::new(),
            category: String::new(),
            image_url: String::new(),
            image_required: true,
        }
    }

    fn for_row(row: &GalleryRow) -> Self {
        Self {
            heading: "Edit Gallery Item",
            action: format!("{}/{}", GalleryItem::ADMIN_PATH, row.id),
            submit_label: "Save Changes",
            title: row.title.clone(),
            description: row.description.clone(),
            category: row.category.clone(),
            image_url: row.image_url.clone().unwrap_or_default(),
            image_required: false,
        }
    }

    /// Whether a category option starts selected.
    #[must_use]
    pub fn is_selected(&self, category: &str) -> bool {
        self.category.eq_ignore_ascii_case(category)
    }
}

/// Gallery management page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/gallery.html")]
pub struct GalleryAdminTemplate {
    pub layout: AdminLayout,
    pub list: ListState<GalleryRow>,
    pub form: Option<GalleryFormView>,
    pub confirm_delete: Option<GalleryRow>,
    pub categories: Vec<&'static str>,
}

/// Display the gallery grid with the dialog selected by the query string.
#[instrument(skip(admin, state, session))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    session: Session,
    Query(query): Query<ScreenQuery>,
) -> impl IntoResponse {
    let ctx = ActionContext::new(&state, &admin);
    let rows = actions::list::<GalleryItem>(&ctx)
        .await
        .map(|items| items.iter().map(GalleryRow::from).collect::<Vec<_>>());
    let list = ListState::from_result(rows, "gallery items");

    let (form, confirm_delete) = match query.dialog(list.items(), |row| row.id.as_str()) {
        Dialog::Closed => (None, None),
        Dialog::Add => (Some(GalleryFormView::blank()), None),
        Dialog::Edit(row) => (Some(GalleryFormView::for_row(&row)), None),
        Dialog::ConfirmDelete(row) => (None, Some(row)),
    };

    GalleryAdminTemplate {
        layout: AdminLayout::load(&state, &admin, &session, GalleryItem::ADMIN_PATH).await,
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
    let form = GalleryForm::from_multipart(read_form(multipart).await?);
    let ctx = ActionContext::new(&state, &admin);
    let result = create_gallery_item(&ctx, form).await;
    Ok(respond::<GalleryItem, _>(
        &session,
        Verb::Add,
        result,
        Some(add_dialog_path::<GalleryItem>()),
    )
    .await)
}

/// Handle the edit dialog.
#[instrument(skip(admin, state, session, multipart))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    session: Session,
    Path(id): Path<GalleryItemId>,
    multipart: Multipart,
) -> Result<Redirect> {
    let form = GalleryForm::from_multipart(read_form(multipart).await?);
    let ctx = ActionContext::new(&state, &admin);
    let result = update_gallery_item(&ctx, id, form).await;
    Ok(respond::<GalleryItem, _>(
        &session,
        Verb::Update,
        result,
        Some(edit_dialog_path::<GalleryItem>(id)),
    )
    .await)
}

/// Handle the delete confirmation.
#[instrument(skip(admin, state, session))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    session: Session,
    Path(id): Path<GalleryItemId>,
) -> Redirect {
    let ctx = ActionContext::new(&state, &admin);
    let result = delete_gallery_item(&ctx, id).await;
    respond::<GalleryItem, _>(&session, Verb::Delete, result, None).await
}
