//! The contract every stored entity satisfies.

use core::fmt::{Debug, Display};

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::Bucket;

/// A row in one of the site's tables whose image lives in a paired bucket.
///
/// `Fields` is the writable subset of the row: everything except the
/// server-generated `id` and `created_at`.
pub trait Record: Serialize + DeserializeOwned + Clone + Debug + Send + Sync + 'static {
    /// Type-safe id of the row.
    type Id: Copy + Display + Debug + Send + Sync + 'static;
    /// Column values sent on insert and update.
    type Fields: Serialize + Debug + Send + Sync;

    /// Table name in the hosted database.
    const TABLE: &'static str;
    /// Bucket holding this entity's images.
    const BUCKET: Bucket;
    /// Human-readable noun used in messages ("product", "gallery item").
    const NOUN: &'static str;

    /// The row's id.
    fn id(&self) -> Self::Id;

    /// Public URL of the row's stored image, if it has one.
    fn image_url(&self) -> Option<&str>;
}
