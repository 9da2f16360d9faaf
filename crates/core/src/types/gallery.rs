//! Gallery photos.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Bucket, GalleryItemId, Record};

/// A gallery row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryItem {
    pub id: GalleryItemId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Rows written before images were mandatory may have no image.
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Writable gallery columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryFields {
    pub title: String,
    pub description: Option<String>,
    pub image_url: String,
    pub category: Option<String>,
}

impl Record for GalleryItem {
    type Id = GalleryItemId;
    type Fields = GalleryFields;

    const TABLE: &'static str = "gallery";
    const BUCKET: Bucket = Bucket::Gallery;
    const NOUN: &'static str = "gallery item";

    fn id(&self) -> GalleryItemId {
        self.id
    }

    fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref().filter(|url| !url.is_empty())
    }
}
