//! Integration tests for the public home and gallery pages.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use premium_food_core::Bucket;
use premium_food_integration_tests::{MemoryBackend, Op, TestApp};
use serde_json::json;

fn gallery_row(title: &str, category: &str) -> serde_json::Value {
    json!({
        "title": title,
        "description": format!("{title} description"),
        "category": category,
        "image_url": MemoryBackend::url_for(Bucket::Gallery, &format!("gallery/{title}.jpg")),
    })
}

#[tokio::test]
async fn test_home_shows_only_featured_products() {
    let app = TestApp::new();
    app.backend.seed(
        "products",
        json!({"name": "Smoked Catfish", "category": "Fish", "is_featured": true}),
    );
    app.backend.seed(
        "products",
        json!({"name": "Hidden Snapper", "category": "Fish", "is_featured": false}),
    );

    let response = app.get("/", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Smoked Catfish"));
    assert!(!response.body.contains("Hidden Snapper"));
}

#[tokio::test]
async fn test_home_shows_only_approved_testimonials() {
    let app = TestApp::new();
    app.backend.seed(
        "testimonials",
        json!({"author_name": "Amina", "content": "Approved praise", "rating": 4, "is_approved": true}),
    );
    app.backend.seed(
        "testimonials",
        json!({"author_name": "Tunde", "content": "Pending praise", "is_approved": false}),
    );

    let response = app.get("/", None).await;

    assert!(response.body.contains("Approved praise"));
    assert!(!response.body.contains("Pending praise"));
}

#[tokio::test]
async fn test_home_renders_empty_sections_when_backend_fails() {
    let app = TestApp::new();
    app.backend.fail(Op::Select);

    let response = app.get("/", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("New products are on their way"));
    assert!(response.body.contains("Photos coming soon"));
}

#[tokio::test]
async fn test_failed_reads_are_not_cached() {
    let app = TestApp::new();
    app.backend.fail(Op::Select);
    app.get("/", None).await;

    app.backend.heal(Op::Select);
    app.backend.seed(
        "products",
        json!({"name": "Peppered Chicken", "is_featured": true}),
    );

    let response = app.get("/", None).await;
    assert!(response.body.contains("Peppered Chicken"));
}

#[tokio::test]
async fn test_home_is_cached_until_revalidated() {
    let app = TestApp::new();
    app.get("/", None).await;

    // Written behind the site's back, so nothing revalidates.
    app.backend.seed(
        "products",
        json!({"name": "Dried Crayfish", "is_featured": true}),
    );
    let cached = app.get("/", None).await;
    assert!(!cached.body.contains("Dried Crayfish"));

    app.state.pages().revalidate_path("/").await;
    let fresh = app.get("/", None).await;
    assert!(fresh.body.contains("Dried Crayfish"));
}

#[tokio::test]
async fn test_home_gallery_preview_is_limited() {
    let app = TestApp::new();
    for n in 1..=8 {
        app.backend.seed("gallery", gallery_row(&format!("Photo{n:02}"), "Fish"));
    }

    let response = app.get("/", None).await;

    // Newest first: the two oldest fall outside the preview.
    assert!(response.body.contains("Photo08"));
    assert!(response.body.contains("Photo03"));
    assert!(!response.body.contains("Photo02"));
    assert!(!response.body.contains("Photo01"));
    assert!(response.body.contains("View Full Gallery"));
}

#[tokio::test]
async fn test_gallery_tabs_filter_by_category() {
    let app = TestApp::new();
    app.backend.seed("gallery", gallery_row("Tilapia", "Fish"));
    app.backend.seed("gallery", gallery_row("Drumsticks", "Chicken"));
    app.backend.seed("gallery", gallery_row("Stockfish", "Dried Products"));

    let all = app.get("/gallery", None).await;
    assert_eq!(all.status, StatusCode::OK);
    for title in ["Tilapia", "Drumsticks", "Stockfish"] {
        assert!(all.body.contains(title), "{title}");
    }

    let chicken = app.get("/gallery?category=chicken", None).await;
    assert!(chicken.body.contains("Drumsticks"));
    assert!(!chicken.body.contains("Tilapia"));
    assert!(!chicken.body.contains("Stockfish"));

    let dried = app.get("/gallery?category=Dried+Products", None).await;
    assert!(dried.body.contains("Stockfish"));
    assert!(!dried.body.contains("Drumsticks"));
}

#[tokio::test]
async fn test_gallery_unknown_category_shows_all() {
    let app = TestApp::new();
    app.backend.seed("gallery", gallery_row("Tilapia", "Fish"));

    let response = app.get("/gallery?category=Beef", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Tilapia"));
}

#[tokio::test]
async fn test_gallery_skips_items_without_image() {
    let app = TestApp::new();
    app.backend.seed("gallery", json!({"title": "Imageless", "category": "Fish"}));
    app.backend.seed("gallery", json!({"title": "Unlinked", "category": "Fish", "image_url": ""}));

    let response = app.get("/gallery", None).await;

    assert!(!response.body.contains("Imageless"));
    assert!(!response.body.contains("Unlinked"));
    assert!(response.body.contains("No photos in All yet."));
}

#[tokio::test]
async fn test_public_pages_carry_security_headers() {
    let app = TestApp::new();

    let response = app.get("/", None).await;

    assert_eq!(response.header("x-frame-options"), Some("DENY"));
    assert_eq!(response.header("x-content-type-options"), Some("nosniff"));
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::new();

    let live = app.get("/health", None).await;
    assert_eq!(live.status, StatusCode::OK);
    assert_eq!(live.body, "ok");

    let ready = app.get("/health/ready", None).await;
    assert_eq!(ready.status, StatusCode::OK);

    app.backend.fail(Op::Count);
    let unready = app.get("/health/ready", None).await;
    assert_eq!(unready.status, StatusCode::SERVICE_UNAVAILABLE);
}
