//! Storage reconciliation.
//!
//! Uploads and row writes are separate remote calls, so a failure between
//! them can leave an object that no row points at. [`find_orphans`] finds
//! those objects by comparing a bucket's listing against the image URLs
//! stored in its paired table.

use std::collections::HashSet;

use premium_food_core::{Bucket, GalleryItem, Product, Record, Testimonial, object_path_from_url};
use thiserror::Error;

use crate::backend::{BackendError, Caller, Database, ObjectStorage, Repository};

/// Errors from a reconciliation run.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Fewer rows were read than the table holds. Any object the missing
    /// rows reference would be misreported as orphaned.
    #[error("Read {fetched} of {total} {table} rows; refusing to report orphans from a partial read")]
    IncompleteRead {
        table: &'static str,
        fetched: u64,
        total: u64,
    },
}

/// Outcome of comparing a bucket against its table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrphanReport {
    pub bucket: Bucket,
    /// Objects listed in the bucket.
    pub objects: usize,
    /// Distinct object paths referenced by rows.
    pub referenced: usize,
    /// Listed objects no row references, in listing order.
    pub orphans: Vec<String>,
}

/// Compare `bucket`'s objects against the rows of its paired table.
///
/// # Errors
///
/// Returns [`ReconcileError::IncompleteRead`] if the table has more rows
/// than could be read, or the backend error if any call fails.
pub async fn find_orphans(
    db: &dyn Database,
    storage: &dyn ObjectStorage,
    caller: &Caller,
    bucket: Bucket,
) -> Result<OrphanReport, ReconcileError> {
    tracing::info!(%bucket, "Listing stored objects...");
    let objects = storage.list(caller, bucket, bucket.object_prefix()).await?;

    let referenced = match bucket {
        Bucket::Gallery => referenced_paths::<GalleryItem>(db, caller).await?,
        Bucket::Products => referenced_paths::<Product>(db, caller).await?,
        Bucket::Avatars => referenced_paths::<Testimonial>(db, caller).await?,
    };

    Ok(OrphanReport {
        bucket,
        objects: objects.len(),
        referenced: referenced.len(),
        orphans: unreferenced(&objects, &referenced),
    })
}

/// Object paths referenced by the image URLs of every row in `R`'s table.
async fn referenced_paths<R: Record>(
    db: &dyn Database,
    caller: &Caller,
) -> Result<HashSet<String>, ReconcileError> {
    let repository = Repository::<R>::new(db, caller);
    let rows = repository.list().await?;

    // Counted after the read, so rows inserted meanwhile can only cause a
    // refusal, never a missed reference.
    let total = repository.count().await?;
    let fetched = rows.len() as u64;
    if fetched < total {
        return Err(ReconcileError::IncompleteRead {
            table: R::TABLE,
            fetched,
            total,
        });
    }

    Ok(rows
        .iter()
        .filter_map(|row| row.image_url())
        .filter_map(|url| object_path_from_url(url, R::BUCKET))
        .collect())
}

fn unreferenced(objects: &[String], referenced: &HashSet<String>) -> Vec<String> {
    objects
        .iter()
        .filter(|path| !referenced.contains(path.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreferenced_keeps_listing_order() {
        let objects = vec![
            "gallery/a.png".to_string(),
            "gallery/b.jpg".to_string(),
            "gallery/c.webp".to_string(),
        ];
        let referenced: HashSet<String> = ["gallery/b.jpg", "gallery/gone.png"]
            .into_iter()
            .map(String::from)
            .collect();

        assert_eq!(
            unreferenced(&objects, &referenced),
            vec!["gallery/a.png".to_string(), "gallery/c.webp".to_string()]
        );
    }

    #[test]
    fn test_nothing_unreferenced_when_all_referenced() {
        let objects = vec!["public/avatar.png".to_string()];
        let referenced: HashSet<String> = objects.iter().cloned().collect();
        assert!(unreferenced(&objects, &referenced).is_empty());
    }

    #[test]
    fn test_incomplete_read_message() {
        let err = ReconcileError::IncompleteRead {
            table: "gallery",
            fetched: 1000,
            total: 1200,
        };
        assert_eq!(
            err.to_string(),
            "Read 1000 of 1200 gallery rows; refusing to report orphans from a partial read"
        );
    }
}
