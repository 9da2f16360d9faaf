//! Object-storage buckets and the paths of objects stored in them.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a bucket name is not one of the known buckets.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown storage bucket: {0}")]
pub struct BucketError(pub String);

/// A storage bucket holding uploaded images for one entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    /// Gallery photos.
    Gallery,
    /// Product photos.
    Products,
    /// Testimonial author avatars.
    Avatars,
}

impl Bucket {
    /// All buckets, in display order.
    pub const ALL: [Self; 3] = [Self::Gallery, Self::Products, Self::Avatars];

    /// The bucket name as known to the storage service.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gallery => "gallery",
            Self::Products => "products",
            Self::Avatars => "avatars",
        }
    }

    /// Folder inside the bucket that new uploads are written to.
    #[must_use]
    pub const fn object_prefix(self) -> &'static str {
        match self {
            Self::Gallery => "gallery",
            Self::Products => "products",
            Self::Avatars => "public",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Bucket {
    type Err = BucketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|bucket| bucket.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| BucketError(s.to_owned()))
    }
}

/// Derive the storage path of an object from its public URL.
///
/// The path is everything after the first path segment equal to the bucket
/// name. Query strings and fragments are ignored. Returns `None` when the
/// bucket name does not appear or nothing follows it.
///
/// ```
/// use premium_food_core::{Bucket, object_path_from_url};
///
/// let url = "https://xyz.supabase.co/storage/v1/object/public/gallery/gallery/fish.jpg";
/// assert_eq!(
///     object_path_from_url(url, Bucket::Gallery).as_deref(),
///     Some("gallery/fish.jpg"),
/// );
/// assert_eq!(object_path_from_url("https://cdn.example.com/fish.jpg", Bucket::Gallery), None);
/// ```
#[must_use]
pub fn object_path_from_url(url: &str, bucket: Bucket) -> Option<String> {
    let without_query = url.split(['?', '#']).next().unwrap_or(url);
    let segments: Vec<&str> = without_query.split('/').collect();
    let position = segments
        .iter()
        .position(|segment| *segment == bucket.as_str())?;
    let rest = segments.get(position + 1..)?;
    let path = rest.join("/");
    if path.is_empty() { None } else { Some(path) }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://abc.supabase.co/storage/v1/object/public";

    #[test]
    fn test_path_from_public_url_per_bucket() {
        assert_eq!(
            object_path_from_url(&format!("{BASE}/products/products/1-a.png"), Bucket::Products)
                .as_deref(),
            Some("products/1-a.png")
        );
        assert_eq!(
            object_path_from_url(&format!("{BASE}/avatars/public/face.webp"), Bucket::Avatars)
                .as_deref(),
            Some("public/face.webp")
        );
    }

    #[test]
    fn test_path_ignores_query_string() {
        assert_eq!(
            object_path_from_url(&format!("{BASE}/gallery/gallery/a.jpg?t=123"), Bucket::Gallery)
                .as_deref(),
            Some("gallery/a.jpg")
        );
    }

    #[test]
    fn test_path_missing_bucket_or_remainder() {
        assert_eq!(
            object_path_from_url(&format!("{BASE}/avatars/x.png"), Bucket::Gallery),
            None
        );
        assert_eq!(
            object_path_from_url(&format!("{BASE}/gallery"), Bucket::Gallery),
            None
        );
        assert_eq!(
            object_path_from_url(&format!("{BASE}/gallery/"), Bucket::Gallery),
            None
        );
    }

    #[test]
    fn test_bucket_name_in_host_is_not_a_segment() {
        let url = "https://products.example.com/storage/v1/object/public/products/products/p.png";
        assert_eq!(
            object_path_from_url(url, Bucket::Products).as_deref(),
            Some("products/p.png")
        );
    }

    #[test]
    fn test_bucket_from_str() {
        assert_eq!("Gallery".parse::<Bucket>(), Ok(Bucket::Gallery));
        assert_eq!(" avatars ".parse::<Bucket>(), Ok(Bucket::Avatars));
        assert!("videos".parse::<Bucket>().is_err());
    }
}
