//! Typed access to one table.

use std::marker::PhantomData;

use premium_food_core::Record;
use serde_json::Value;

use super::{BackendError, Caller, Database, Direction, Query, collect_pages};

/// Rows requested per read. Matches the hosted default for `max-rows`.
pub const PAGE_SIZE: u64 = 1000;

/// Typed row access for a [`Record`] type.
///
/// # Example
///
/// ```rust,ignore
/// let products = Repository::<Product>::new(state.database(), &Caller::Anonymous);
/// let featured = products.list_where("is_featured", true).await?;
/// ```
pub struct Repository<'a, R> {
    db: &'a dyn Database,
    caller: &'a Caller,
    page_size: u64,
    _record: PhantomData<R>,
}

impl<'a, R: Record> Repository<'a, R> {
    #[must_use]
    pub fn new(db: &'a dyn Database, caller: &'a Caller) -> Self {
        Self {
            db,
            caller,
            page_size: PAGE_SIZE,
            _record: PhantomData,
        }
    }

    /// Read lists in pages of `page_size` rows.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// All rows, newest first.
    ///
    /// # Errors
    ///
    /// Returns the backend error if the read fails or a row does not parse.
    pub async fn list(&self) -> Result<Vec<R>, BackendError> {
        self.select(Query::new()).await
    }

    /// Rows where `column` equals `value`, newest first.
    ///
    /// # Errors
    ///
    /// Returns the backend error if the read fails or a row does not parse.
    pub async fn list_where(
        &self,
        column: &str,
        value: impl Into<Value> + Send,
    ) -> Result<Vec<R>, BackendError> {
        self.select(Query::new().eq(column, value)).await
    }

    /// A single row by id.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::NotFound`] if no row has this id.
    pub async fn get(&self, id: R::Id) -> Result<R, BackendError> {
        let query = Query::new().eq("id", id.to_string());
        let rows = self.db.select(self.caller, R::TABLE, &query).await?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| BackendError::NotFound(format!("{} {id}", R::NOUN)))?;
        Ok(serde_json::from_value(row)?)
    }

    /// Insert a row and return it as stored.
    ///
    /// # Errors
    ///
    /// Returns the backend error unchanged.
    pub async fn insert(&self, fields: &R::Fields) -> Result<R, BackendError> {
        let row = serde_json::to_value(fields)?;
        let stored = self.db.insert(self.caller, R::TABLE, row).await?;
        Ok(serde_json::from_value(stored)?)
    }

    /// Overwrite a row's writable columns and return it as stored.
    ///
    /// # Errors
    ///
    /// Returns the backend error unchanged.
    pub async fn update(&self, id: R::Id, fields: &R::Fields) -> Result<R, BackendError> {
        let row = serde_json::to_value(fields)?;
        let stored = self
            .db
            .update(self.caller, R::TABLE, &id.to_string(), row)
            .await?;
        Ok(serde_json::from_value(stored)?)
    }

    /// Delete a row.
    ///
    /// # Errors
    ///
    /// Returns the backend error unchanged.
    pub async fn delete(&self, id: R::Id) -> Result<(), BackendError> {
        self.db.delete(self.caller, R::TABLE, &id.to_string()).await
    }

    /// Number of rows in the table.
    ///
    /// # Errors
    ///
    /// Returns the backend error unchanged.
    pub async fn count(&self) -> Result<u64, BackendError> {
        self.db.count(self.caller, R::TABLE).await
    }

    async fn select(&self, query: Query) -> Result<Vec<R>, BackendError> {
        let query = query.order_by("created_at", Direction::Descending);
        let rows = collect_pages(self.page_size, |offset| {
            let page = query.clone().page(offset, self.page_size);
            async move { self.db.select(self.caller, R::TABLE, &page).await }
        })
        .await?;

        rows.into_iter()
            .map(|row| serde_json::from_value(row).map_err(BackendError::from))
            .collect()
    }
}
