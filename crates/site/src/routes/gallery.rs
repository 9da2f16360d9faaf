//! Gallery page route handler.

use std::sync::Arc;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use premium_food_core::{GalleryCategory, GalleryItem};
use serde::Deserialize;
use tracing::instrument;

use super::home::GalleryCard;
use crate::actions::gallery::list_public_gallery;
use crate::cache::PublicPage;
use crate::content;
use crate::filters;
use crate::state::AppState;

const GALLERY_PATH: &str = "/gallery";

/// Query parameters for the gallery page.
#[derive(Debug, Deserialize)]
pub struct GalleryQuery {
    pub category: Option<String>,
}

/// Category tab link.
#[derive(Debug, Clone)]
pub struct TabView {
    pub label: &'static str,
    pub href: String,
    pub active: bool,
}

impl TabView {
    fn for_category(category: GalleryCategory, selected: GalleryCategory) -> Self {
        let href = match category {
            GalleryCategory::All => GALLERY_PATH.to_string(),
            other => format!("{GALLERY_PATH}?category={}", other.label().replace(' ', "+")),
        };
        Self {
            label: category.label(),
            href,
            active: category == selected,
        }
    }
}

/// Gallery page template.
#[derive(Template, WebTemplate)]
#[template(path = "gallery.html")]
pub struct GalleryTemplate {
    pub current_path: &'static str,
    pub business_name: &'static str,
    pub tabs: Vec<TabView>,
    pub selected: &'static str,
    pub items: Vec<GalleryCard>,
}

/// Display the gallery, filtered to the selected category tab.
#[instrument(skip(state))]
pub async fn gallery(
    State(state): State<AppState>,
    Query(query): Query<GalleryQuery>,
) -> impl IntoResponse {
    let selected = GalleryCategory::from_query(query.category.as_deref());
    let items = load_gallery(&state).await;

    GalleryTemplate {
        current_path: GALLERY_PATH,
        business_name: content::BUSINESS_NAME,
        tabs: GalleryCategory::TABS
            .iter()
            .map(|&tab| TabView::for_category(tab, selected))
            .collect(),
        selected: selected.label(),
        items: items
            .iter()
            .filter(|item| selected.matches(item.category.as_deref()))
            .map(Into::into)
            .collect(),
    }
}

/// Every public gallery item, from the cache when fresh.
async fn load_gallery(state: &AppState) -> Arc<Vec<GalleryItem>> {
    if let Some(PublicPage::Gallery(items)) = state.pages().get(GALLERY_PATH).await {
        return items;
    }

    let generation = state.pages().generation();
    match list_public_gallery(state.database()).await {
        Ok(items) => {
            let items = Arc::new(items);
            state
                .pages()
                .insert(
                    GALLERY_PATH,
                    PublicPage::Gallery(Arc::clone(&items)),
                    generation,
                )
                .await;
            items
        }
        Err(e) => {
            tracing::error!("Failed to fetch gallery: {e}");
            Arc::new(Vec::new())
        }
    }
}
