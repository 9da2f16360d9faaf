//! Integration tests for the admin CRUD screens, end to end through the router.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use premium_food_core::Bucket;
use premium_food_integration_tests::{MemoryBackend, MultipartBody, Op, PNG_BYTES, TestApp};
use serde_json::json;

fn product_body(name: &str) -> MultipartBody {
    MultipartBody::new()
        .text("name", name)
        .text("description", "Slow smoked over hardwood.")
        .text("category", "Fish")
        .text("is_featured", "on")
}

#[tokio::test]
async fn test_admin_root_redirects_permanently_to_products() {
    let app = TestApp::new();
    let cookie = app.login().await;

    let response = app.get("/admin", Some(&cookie)).await;

    assert_eq!(response.status, StatusCode::PERMANENT_REDIRECT);
    assert_eq!(response.location(), Some("/admin/products"));
}

#[tokio::test]
async fn test_admin_pages_are_not_cacheable() {
    let app = TestApp::new();
    let cookie = app.login().await;

    let response = app.get("/admin/products", Some(&cookie)).await;

    assert_eq!(response.header("cache-control"), Some("no-store, max-age=0"));
}

#[tokio::test]
async fn test_create_product_flashes_once_and_lists_it() {
    let app = TestApp::new();
    let cookie = app.login().await;

    let body = product_body("Smoked Catfish").file("image", "catfish.png", "image/png", PNG_BYTES);
    let response = app.post_multipart("/admin/products", body, Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/admin/products"));

    let page = app.get("/admin/products", Some(&cookie)).await;
    assert!(page.body.contains("Product added successfully."));
    assert!(page.body.contains("Smoked Catfish"));
    assert_eq!(app.backend.objects(Bucket::Products).len(), 1);

    let again = app.get("/admin/products", Some(&cookie)).await;
    assert!(!again.body.contains("Product added successfully."));
    assert!(again.body.contains("Smoked Catfish"));
}

#[tokio::test]
async fn test_failed_add_reopens_dialog_with_validation_toast() {
    let app = TestApp::new();
    let cookie = app.login().await;

    let body = MultipartBody::new()
        .text("title", "Morning catch")
        .text("description", "Fresh tilapia.")
        .text("category", "Fish")
        .empty_file("image")
        .text("image_url", "");
    let response = app.post_multipart("/admin/gallery", body, Some(&cookie)).await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/admin/gallery?dialog=add"));
    assert!(app.backend.rows("gallery").is_empty());

    let page = app.get("/admin/gallery?dialog=add", Some(&cookie)).await;
    assert!(page.body.contains("Validation Error"));
    assert!(page.body.contains("Image file is required for new gallery items."));
    assert!(page.body.contains("Add Gallery Item"));
}

#[tokio::test]
async fn test_backend_failure_is_reported_with_provider_message() {
    let app = TestApp::new();
    let cookie = app.login().await;
    app.backend.fail(Op::Insert);

    let body = product_body("Peppered Chicken").text("image_url", "https://cdn.test/p.png");
    let response = app.post_multipart("/admin/products", body, Some(&cookie)).await;
    assert_eq!(response.location(), Some("/admin/products?dialog=add"));

    let page = app.get("/admin/products", Some(&cookie)).await;
    assert!(page.body.contains("Failed to add product: injected Insert failure"));
}

#[tokio::test]
async fn test_edit_dialog_is_prefilled() {
    let app = TestApp::new();
    let cookie = app.login().await;
    let id = app.backend.seed(
        "products",
        json!({"name": "Dried Crayfish", "description": "Sun dried.", "category": "Dried Products", "is_featured": true}),
    );

    let page = app
        .get(&format!("/admin/products?dialog=edit&id={id}"), Some(&cookie))
        .await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Edit Product"));
    assert!(page.body.contains("value=\"Dried Crayfish\""));
    assert!(page.body.contains(&format!("action=\"/admin/products/{id}\"")));
}

#[tokio::test]
async fn test_unknown_dialog_target_renders_plain_list() {
    let app = TestApp::new();
    let cookie = app.login().await;
    app.backend.seed("products", json!({"name": "Catfish"}));

    let page = app
        .get(
            "/admin/products?dialog=edit&id=00000000-0000-0000-0000-000000000000",
            Some(&cookie),
        )
        .await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(!page.body.contains("role=\"dialog\""));
    assert!(page.body.contains("Catfish"));
}

#[tokio::test]
async fn test_update_without_new_avatar_keeps_it() {
    let app = TestApp::new();
    let cookie = app.login().await;
    let avatar = MemoryBackend::url_for(Bucket::Avatars, "public/amina.png");
    app.backend.put_object(Bucket::Avatars, "public/amina.png", PNG_BYTES);
    let id = app.backend.seed(
        "testimonials",
        json!({"author_name": "Amina", "content": "Lovely.", "rating": 4, "avatar_url": avatar, "is_approved": false}),
    );

    let body = MultipartBody::new()
        .text("author_name", "Amina B.")
        .text("content", "Lovely fish.")
        .text("rating", "5")
        .text("is_approved", "on")
        .empty_file("avatar")
        .text("avatar_url", "");
    let response = app
        .post_multipart(&format!("/admin/testimonials/{id}"), body, Some(&cookie))
        .await;
    assert_eq!(response.location(), Some("/admin/testimonials"));

    let row = app.backend.row("testimonials", &id).unwrap();
    assert_eq!(row["author_name"], "Amina B.");
    assert_eq!(row["avatar_url"], avatar.as_str());
    assert_eq!(row["is_approved"], true);
    assert_eq!(app.backend.objects(Bucket::Avatars), vec!["public/amina.png"]);

    let page = app.get("/admin/testimonials", Some(&cookie)).await;
    assert!(page.body.contains("Testimonial updated successfully."));
}

#[tokio::test]
async fn test_delete_confirmation_and_delete() {
    let app = TestApp::new();
    let cookie = app.login().await;
    app.backend.put_object(Bucket::Gallery, "gallery/grill.jpg", PNG_BYTES);
    let id = app.backend.seed(
        "gallery",
        json!({"title": "Grill night", "category": "Chicken",
               "image_url": MemoryBackend::url_for(Bucket::Gallery, "gallery/grill.jpg")}),
    );

    let confirm = app
        .get(&format!("/admin/gallery?dialog=delete&id={id}"), Some(&cookie))
        .await;
    assert!(confirm.body.contains("Delete gallery item?"));
    assert!(confirm.body.contains(&format!("/admin/gallery/{id}/delete")));

    let response = app
        .post_form(&format!("/admin/gallery/{id}/delete"), &[], Some(&cookie))
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/admin/gallery"));
    assert!(app.backend.rows("gallery").is_empty());
    assert!(app.backend.objects(Bucket::Gallery).is_empty());

    let page = app.get("/admin/gallery", Some(&cookie)).await;
    assert!(page.body.contains("Gallery item deleted successfully."));
    assert!(page.body.contains("The gallery is empty."));
}

#[tokio::test]
async fn test_sidebar_counts_fall_back_to_dash() {
    let app = TestApp::new();
    let cookie = app.login().await;
    app.backend.seed("products", json!({"name": "Catfish"}));
    app.backend.seed("products", json!({"name": "Tilapia"}));

    let page = app.get("/admin/testimonials", Some(&cookie)).await;
    assert!(page.body.contains("<span class=\"count\">2</span>"));

    app.backend.fail(Op::Count);
    let page = app.get("/admin/testimonials", Some(&cookie)).await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("<span class=\"count\">—</span>"));
}

#[tokio::test]
async fn test_list_failure_renders_error_state() {
    let app = TestApp::new();
    let cookie = app.login().await;
    app.backend.fail(Op::Select);

    let page = app.get("/admin/gallery", Some(&cookie)).await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Failed to load gallery items: injected Select failure"));
    assert!(!page.body.contains("The gallery is empty."));
}
