//! Core types for Premium Food Ventures.
//!
//! This module provides the entity records stored in the hosted database
//! and type-safe wrappers for the values they carry.

pub mod bucket;
pub mod category;
pub mod email;
pub mod gallery;
pub mod id;
pub mod product;
pub mod rating;
pub mod record;
pub mod testimonial;

pub use bucket::{Bucket, BucketError, object_path_from_url};
pub use category::GalleryCategory;
pub use email::{Email, EmailError};
pub use gallery::{GalleryFields, GalleryItem};
pub use id::*;
pub use product::{Product, ProductFields};
pub use rating::{Rating, RatingError};
pub use record::Record;
pub use testimonial::{Testimonial, TestimonialFields};
