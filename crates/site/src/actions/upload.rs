//! Image upload and best-effort removal.

use premium_food_core::{Bucket, object_path_from_url};
use uuid::Uuid;

use crate::backend::{BackendError, Caller, ObjectStorage, StoredObject};
use crate::forms::UploadedFile;

/// A fresh, collision-free object path for an upload into `bucket`.
#[must_use]
pub fn object_path(bucket: Bucket, file: &UploadedFile) -> String {
    format!(
        "{}/{}.{}",
        bucket.object_prefix(),
        Uuid::new_v4(),
        file.extension()
    )
}

/// Upload a file under a generated name and return its public URL.
///
/// # Errors
///
/// Returns the storage error unchanged.
pub async fn upload_image(
    storage: &dyn ObjectStorage,
    caller: &Caller,
    bucket: Bucket,
    file: UploadedFile,
) -> Result<StoredObject, BackendError> {
    let path = object_path(bucket, &file);
    storage
        .upload(caller, bucket, &path, file.bytes, &file.content_type)
        .await?;
    let public_url = storage.public_url(bucket, &path);

    tracing::info!(%bucket, %path, "Uploaded image");
    Ok(StoredObject { path, public_url })
}

/// Remove an object, logging instead of failing.
pub async fn discard_object(storage: &dyn ObjectStorage, caller: &Caller, bucket: Bucket, path: &str) {
    match storage.remove(caller, bucket, &[path.to_string()]).await {
        Ok(()) => tracing::info!(%bucket, path, "Removed stored image"),
        Err(e) => tracing::warn!(%bucket, path, error = %e, "Failed to remove stored image"),
    }
}

/// Remove the object behind a public URL, logging instead of failing.
///
/// URLs that do not point into `bucket` (e.g. typed-in external links) are
/// left alone.
pub async fn discard_url(storage: &dyn ObjectStorage, caller: &Caller, bucket: Bucket, url: &str) {
    match object_path_from_url(url, bucket) {
        Some(path) => discard_object(storage, caller, bucket, &path).await,
        None => tracing::debug!(%bucket, url, "Image URL is not in bucket, nothing to remove"),
    }
}
