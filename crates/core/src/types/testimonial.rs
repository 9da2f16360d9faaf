//! Customer testimonials.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Bucket, Rating, Record, TestimonialId};

/// A testimonial row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Testimonial {
    pub id: TestimonialId,
    pub author_name: String,
    pub content: String,
    #[serde(default)]
    pub rating: Option<Rating>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// Only approved testimonials appear on the public home page.
    #[serde(default)]
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
}

/// Writable testimonial columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestimonialFields {
    pub author_name: String,
    pub content: String,
    pub rating: Option<Rating>,
    pub avatar_url: Option<String>,
    pub is_approved: bool,
}

impl Record for Testimonial {
    type Id = TestimonialId;
    type Fields = TestimonialFields;

    const TABLE: &'static str = "testimonials";
    const BUCKET: Bucket = Bucket::Avatars;
    const NOUN: &'static str = "testimonial";

    fn id(&self) -> TestimonialId {
        self.id
    }

    fn image_url(&self) -> Option<&str> {
        self.avatar_url.as_deref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_rating_is_clamped_on_read() {
        let row = serde_json::json!({
            "id": "0b6f7a52-7fd0-4b6e-b1a5-3d2f4c8e9a10",
            "author_name": "Aisha",
            "content": "Fresh fish, quick delivery.",
            "rating": 9,
            "avatar_url": null,
            "is_approved": false,
            "created_at": "2025-02-11T08:30:00Z"
        });
        let testimonial: Testimonial = serde_json::from_value(row).unwrap();
        assert_eq!(testimonial.rating.map(Rating::stars), Some(5));
        assert!(!testimonial.is_approved);
    }
}
