//! Testimonial management screen.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Multipart, Path, Query, State},
    response::{IntoResponse, Redirect},
};
use premium_food_core::{Rating, Record, Testimonial, TestimonialId};
use tower_sessions::Session;
use tracing::instrument;

use super::{
    AdminLayout, Verb, add_dialog_path, edit_dialog_path, format_date, read_form, respond,
};
use crate::actions::testimonials::{
    TestimonialForm, create_testimonial, delete_testimonial, update_testimonial,
};
use crate::actions::{self, ActionContext, Entity};
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::screens::{Dialog, ListState, ScreenQuery};
use crate::state::AppState;

/// Testimonial row in the admin table.
#[derive(Debug, Clone)]
pub struct TestimonialRow {
    pub id: String,
    pub author_name: String,
    pub content: String,
    /// 0 when unrated.
    pub rating: u8,
    pub avatar_url: Option<String>,
    pub is_approved: bool,
    pub created: String,
}

impl From<&Testimonial> for TestimonialRow {
    fn from(testimonial: &Testimonial) -> Self {
        Self {
            id: testimonial.id.to_string(),
            author_name: testimonial.author_name.clone(),
            content: testimonial.content.clone(),
            rating: testimonial.rating.map_or(0, Rating::stars),
            avatar_url: testimonial.image_url().map(str::to_owned),
            is_approved: testimonial.is_approved,
            created: format_date(testimonial.created_at),
        }
    }
}

/// Add/edit dialog contents.
#[derive(Debug, Clone)]
pub struct TestimonialFormView {
    pub heading: &'static str,
    pub action: String,
    pub submit_label: &'static str,
    pub author_name: String,
    pub content: String,
    /// Empty when unrated.
    pub rating: String,
    pub avatar_url: String,
    pub is_approved: bool,
}

impl TestimonialFormView {
    fn blank() -> Self {
        Self {
            heading: "Add Testimonial",
            action: Testimonial::ADMIN_PATH.to_string(),
            submit_label: "Add Testimonial",
            author_name: String::new(),
            content: String::new(),
            rating: Rating::default().to_string(),
            avatar_url: String::new(),
            is_approved: false,
        }
    }

    fn for_row(row: &TestimonialRow) -> Self {
        Self {
            heading: "Edit Testimonial",
            action: format!("{}/{}", Testimonial::ADMIN_PATH, row.id),
            submit_label: "Save Changes",
            author_name: row.author_name.clone(),
            content: row.content.clone(),
            rating: if row.rating == 0 {
                String::new()
            } else {
                row.rating.to_string()
            },
            avatar_url: row.avatar_url.clone().unwrap_or_default(),
            is_approved: row.is_approved,
        }
    }
}

/// Testimonial management page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/testimonials.html")]
pub struct TestimonialsTemplate {
    pub layout: AdminLayout,
    pub list: ListState<TestimonialRow>,
    pub form: Option<TestimonialFormView>,
    pub confirm_delete: Option<TestimonialRow>,
}

/// Display the testimonial list with the dialog selected by the query string.
#[instrument(skip(admin, state, session))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    session: Session,
    Query(query): Query<ScreenQuery>,
) -> impl IntoResponse {
    let ctx = ActionContext::new(&state, &admin);
    let rows = actions::list::<Testimonial>(&ctx)
        .await
        .map(|items| items.iter().map(TestimonialRow::from).collect::<Vec<_>>());
    let list = ListState::from_result(rows, "testimonials");

    let (form, confirm_delete) = match query.dialog(list.items(), |row| row.id.as_str()) {
        Dialog::Closed => (None, None),
        Dialog::Add => (Some(TestimonialFormView::blank()), None),
        Dialog::Edit(row) => (Some(TestimonialFormView::for_row(&row)), None),
        Dialog::ConfirmDelete(row) => (None, Some(row)),
    };

    TestimonialsTemplate {
        layout: AdminLayout::load(&state, &admin, &session, Testimonial::ADMIN_PATH).await,
        list,
        form,
        confirm_delete,
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
    let form = TestimonialForm::from_multipart(read_form(multipart).await?);
    let ctx = ActionContext::new(&state, &admin);
    let result = create_testimonial(&ctx, form).await;
    Ok(respond::<Testimonial, _>(
        &session,
        Verb::Add,
        result,
        Some(add_dialog_path::<Testimonial>()),
    )
    .await)
}

/// Handle the edit dialog.
#[instrument(skip(admin, state, session, multipart))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    session: Session,
    Path(id): Path<TestimonialId>,
    multipart: Multipart,
) -> Result<Redirect> {
    let form = TestimonialForm::from_multipart(read_form(multipart).await?);
    let ctx = ActionContext::new(&state, &admin);
    let result = update_testimonial(&ctx, id, form).await;
    Ok(respond::<Testimonial, _>(
        &session,
        Verb::Update,
        result,
        Some(edit_dialog_path::<Testimonial>(id)),
    )
    .await)
}

/// Handle the delete confirmation.
#[instrument(skip(admin, state, session))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    session: Session,
    Path(id): Path<TestimonialId>,
) -> Redirect {
    let ctx = ActionContext::new(&state, &admin);
    let result = delete_testimonial(&ctx, id).await;
    respond::<Testimonial, _>(&session, Verb::Delete, result, None).await
}
