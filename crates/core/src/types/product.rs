//! Products shown in the featured carousel.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Bucket, ProductId, Record};

/// A product row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    /// Only featured products appear on the public home page.
    #[serde(default)]
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
}

/// Writable product columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFields {
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub is_featured: bool,
}

impl Record for Product {
    type Id = ProductId;
    type Fields = ProductFields;

    const TABLE: &'static str = "products";
    const BUCKET: Bucket = Bucket::Products;
    const NOUN: &'static str = "product";

    fn id(&self) -> ProductId {
        self.id
    }

    fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_row_with_nulls() {
        let row = serde_json::json!({
            "id": "6f1c1f3e-5a4b-4a43-9a3b-0d9cb2b1c5a1",
            "name": "Smoked Catfish",
            "description": null,
            "image_url": null,
            "category": "Fish",
            "is_featured": true,
            "created_at": "2025-01-04T10:00:00+00:00",
            "price": 4500
        });
        let product: Product = serde_json::from_value(row).unwrap();
        assert_eq!(product.name, "Smoked Catfish");
        assert!(product.is_featured);
        assert!(product.image_url().is_none());
    }
}
