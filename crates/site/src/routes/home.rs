//! Home page route handler.

use std::sync::Arc;

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use premium_food_core::{GalleryItem, Product, Record, Testimonial};
use tracing::instrument;

use crate::actions::gallery::list_public_gallery;
use crate::actions::products::list_featured_products;
use crate::actions::testimonials::list_approved_testimonials;
use crate::cache::{HomeData, PublicPage};
use crate::content::{self, Blurb, Contact, Hero, Stat};
use crate::filters;
use crate::state::AppState;

/// Gallery items previewed on the home page; the rest live on `/gallery`.
const GALLERY_PREVIEW_LEN: usize = 6;

// =============================================================================
// View Types
// =============================================================================

/// Product card in the featured products carousel.
#[derive(Debug, Clone)]
pub struct ProductCard {
    pub name: String,
    pub description: String,
    pub category: Option<String>,
    pub image_url: Option<String>,
}

impl From<&Product> for ProductCard {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone().unwrap_or_default(),
            category: product.category.clone(),
            image_url: product.image_url().map(str::to_owned),
        }
    }
}

/// Gallery tile.
#[derive(Debug, Clone)]
pub struct GalleryCard {
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub image_url: String,
}

impl From<&GalleryItem> for GalleryCard {
    fn from(item: &GalleryItem) -> Self {
        Self {
            title: item.title.clone(),
            description: item.description.clone().unwrap_or_default(),
            category: item.category.clone(),
            image_url: item.image_url().unwrap_or_default().to_string(),
        }
    }
}

/// Customer quote.
#[derive(Debug, Clone)]
pub struct TestimonialCard {
    pub author_name: String,
    /// Shown in place of a missing avatar.
    pub initial: char,
    pub content: String,
    pub rating: Option<u8>,
    pub avatar_url: Option<String>,
}

impl From<&Testimonial> for TestimonialCard {
    fn from(testimonial: &Testimonial) -> Self {
        Self {
            author_name: testimonial.author_name.clone(),
            initial: testimonial
                .author_name
                .chars()
                .next()
                .map_or('?', |c| c.to_ascii_uppercase()),
            content: testimonial.content.clone(),
            rating: testimonial.rating.map(|r| r.stars()),
            avatar_url: testimonial.image_url().map(str::to_owned),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub current_path: &'static str,
    pub business_name: &'static str,
    pub hero: &'static Hero,
    pub services: &'static [Blurb],
    pub steps: &'static [Blurb],
    pub stats: &'static [Stat],
    pub contact: &'static Contact,
    pub featured_products: Vec<ProductCard>,
    pub gallery: Vec<GalleryCard>,
    /// Whether there are more gallery items than the preview shows.
    pub more_gallery: bool,
    pub testimonials: Vec<TestimonialCard>,
}

impl HomeTemplate {
    fn new(data: &HomeData) -> Self {
        Self {
            current_path: "/",
            business_name: content::BUSINESS_NAME,
            hero: &content::HERO,
            services: &content::SERVICES,
            steps: &content::HOW_IT_WORKS,
            stats: &content::STATS,
            contact: &content::CONTACT,
            featured_products: data.featured_products.iter().map(Into::into).collect(),
            gallery: data
                .gallery
                .iter()
                .take(GALLERY_PREVIEW_LEN)
                .map(Into::into)
                .collect(),
            more_gallery: data.gallery.len() > GALLERY_PREVIEW_LEN,
            testimonials: data.testimonials.iter().map(Into::into).collect(),
        }
    }
}

// =============================================================================
// Route Handlers
// =============================================================================

/// Display the home page.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> impl IntoResponse {
    let data = load_home(&state).await;
    HomeTemplate::new(&data)
}

/// Rows for the home page, from the cache when fresh.
///
/// Each section degrades to empty on its own. The result is cached only when
/// all three reads succeed.
async fn load_home(state: &AppState) -> Arc<HomeData> {
    if let Some(PublicPage::Home(data)) = state.pages().get("/").await {
        return data;
    }

    let generation = state.pages().generation();
    let db = state.database();
    let (products, gallery, testimonials) = tokio::join!(
        list_featured_products(db),
        list_public_gallery(db),
        list_approved_testimonials(db),
    );
    let complete = products.is_ok() && gallery.is_ok() && testimonials.is_ok();

    let data = Arc::new(HomeData {
        featured_products: products.unwrap_or_else(|e| {
            tracing::error!("Failed to fetch featured products: {e}");
            Vec::new()
        }),
        gallery: gallery.unwrap_or_else(|e| {
            tracing::error!("Failed to fetch gallery: {e}");
            Vec::new()
        }),
        testimonials: testimonials.unwrap_or_else(|e| {
            tracing::error!("Failed to fetch testimonials: {e}");
            Vec::new()
        }),
    });

    if complete {
        state
            .pages()
            .insert("/", PublicPage::Home(Arc::clone(&data)), generation)
            .await;
    }
    data
}
