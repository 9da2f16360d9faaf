//! Integration tests for storage reconciliation and paged table reads.

#![allow(clippy::unwrap_used)]

use premium_food_core::{Bucket, GalleryItem};
use premium_food_integration_tests::{MemoryBackend, PNG_BYTES};
use premium_food_site::backend::{Caller, Repository};
use premium_food_site::reconcile::{self, ReconcileError};
use serde_json::json;

/// Seed a gallery row whose image is stored at `gallery/{name}`.
fn seed_photo(backend: &MemoryBackend, name: &str) {
    let path = format!("gallery/{name}");
    backend.put_object(Bucket::Gallery, &path, PNG_BYTES);
    backend.seed(
        "gallery",
        json!({"title": name, "category": "Fish", "image_url": MemoryBackend::url_for(Bucket::Gallery, &path)}),
    );
}

#[tokio::test]
async fn test_repository_list_reads_every_page() {
    let backend = MemoryBackend::new();
    for n in 1..=5 {
        seed_photo(&backend, &format!("{n}.png"));
    }

    let items = Repository::<GalleryItem>::new(&backend, &Caller::Anonymous)
        .with_page_size(2)
        .list()
        .await
        .unwrap();

    let titles: Vec<&str> = items.iter().map(|item| item.title.as_str()).collect();
    assert_eq!(titles, ["5.png", "4.png", "3.png", "2.png", "1.png"]);
    assert_eq!(
        backend.calls().iter().filter(|c| *c == "select gallery").count(),
        3
    );
}

#[tokio::test]
async fn test_orphans_are_objects_no_row_references() {
    let backend = MemoryBackend::new();
    seed_photo(&backend, "kept.png");
    backend.put_object(Bucket::Gallery, "gallery/stray.png", PNG_BYTES);
    // Other buckets are not part of the comparison.
    backend.put_object(Bucket::Products, "products/other.png", PNG_BYTES);

    let report = reconcile::find_orphans(&backend, &backend, &Caller::Anonymous, Bucket::Gallery)
        .await
        .unwrap();

    assert_eq!(report.objects, 2);
    assert_eq!(report.referenced, 1);
    assert_eq!(report.orphans, ["gallery/stray.png"]);
}

#[tokio::test]
async fn test_capped_select_refuses_to_report_orphans() {
    let backend = MemoryBackend::new();
    for n in 1..=3 {
        seed_photo(&backend, &format!("{n}.png"));
    }
    backend.cap_rows(2);

    let err = reconcile::find_orphans(&backend, &backend, &Caller::Anonymous, Bucket::Gallery)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ReconcileError::IncompleteRead {
            table: "gallery",
            fetched: 2,
            total: 3
        }
    ));
    assert_eq!(backend.objects(Bucket::Gallery).len(), 3);
    assert!(!backend.calls().iter().any(|c| c.starts_with("remove")));
}

#[tokio::test]
async fn test_capped_select_is_complete_with_matching_page_size() {
    let backend = MemoryBackend::new();
    for n in 1..=3 {
        seed_photo(&backend, &format!("{n}.png"));
    }
    backend.cap_rows(2);

    let items = Repository::<GalleryItem>::new(&backend, &Caller::Anonymous)
        .with_page_size(2)
        .list()
        .await
        .unwrap();

    assert_eq!(items.len(), 3);
}
