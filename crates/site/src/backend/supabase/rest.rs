//! Row access through the PostgREST API.

use async_trait::async_trait;
use reqwest::Method;
use reqwest::header::CONTENT_RANGE;
use serde_json::Value;
use url::Url;

use super::{SupabaseClient, check};
use crate::backend::{BackendError, Caller, Database, Direction, Query};

impl SupabaseClient {
    /// `{base}/rest/v1/{table}` with PostgREST query parameters.
    fn table_url(&self, table: &str, query: &Query) -> Result<Url, BackendError> {
        let mut url = Url::parse(&self.endpoint(&format!("/rest/v1/{table}")))
            .map_err(|e| BackendError::Parse(format!("Invalid table URL: {e}")))?;

        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("select", "*");
            for (column, value) in &query.filters {
                pairs.append_pair(column, &format!("eq.{}", filter_value(value)));
            }
            if let Some((column, direction)) = &query.order {
                let direction = match direction {
                    Direction::Ascending => "asc",
                    Direction::Descending => "desc",
                };
                pairs.append_pair("order", &format!("{column}.{direction}"));
            }
            if let Some((offset, limit)) = query.page {
                pairs.append_pair("offset", &offset.to_string());
                pairs.append_pair("limit", &limit.to_string());
            }
        }

        Ok(url)
    }

    fn row_url(&self, table: &str, id: &str) -> Result<Url, BackendError> {
        self.table_url(table, &Query::new().eq("id", id))
    }
}

/// Render a JSON value the way PostgREST expects it after `eq.`.
fn filter_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// Take the single row out of a `return=representation` response.
///
/// An empty array means the filter matched nothing the caller may see.
fn single_row(rows: Vec<Value>, table: &str, id: Option<&str>) -> Result<Value, BackendError> {
    rows.into_iter().next().ok_or_else(|| match id {
        Some(id) => BackendError::NotFound(format!("{table} row {id}")),
        None => BackendError::Parse(format!("{table}: empty insert response")),
    })
}

/// Total row count from a `Content-Range` header such as `0-24/57` or `*/0`.
fn parse_content_range(value: &str) -> Option<u64> {
    value.rsplit_once('/')?.1.parse().ok()
}

#[async_trait]
impl Database for SupabaseClient {
    async fn select(
        &self,
        caller: &Caller,
        table: &str,
        query: &Query,
    ) -> Result<Vec<Value>, BackendError> {
        let url = self.table_url(table, query)?;
        let response = self.request(Method::GET, url.as_str(), caller).send().await?;
        let response = check(response).await?;

        response
            .json()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))
    }

    async fn insert(&self, caller: &Caller, table: &str, row: Value) -> Result<Value, BackendError> {
        let url = self.endpoint(&format!("/rest/v1/{table}"));
        let response = self
            .request(Method::POST, &url, caller)
            .header("Prefer", "return=representation")
            .json(&row)
            .send()
            .await?;
        let rows: Vec<Value> = check(response)
            .await?
            .json()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))?;

        single_row(rows, table, None)
    }

    async fn update(
        &self,
        caller: &Caller,
        table: &str,
        id: &str,
        row: Value,
    ) -> Result<Value, BackendError> {
        let url = self.row_url(table, id)?;
        let response = self
            .request(Method::PATCH, url.as_str(), caller)
            .header("Prefer", "return=representation")
            .json(&row)
            .send()
            .await?;
        let rows: Vec<Value> = check(response)
            .await?
            .json()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))?;

        single_row(rows, table, Some(id))
    }

    async fn delete(&self, caller: &Caller, table: &str, id: &str) -> Result<(), BackendError> {
        let url = self.row_url(table, id)?;
        // PostgREST answers 2xx even when row-level security filtered the
        // delete down to zero rows, so ask for the deleted rows back.
        let response = self
            .request(Method::DELETE, url.as_str(), caller)
            .header("Prefer", "return=representation")
            .send()
            .await?;
        let rows: Vec<Value> = check(response)
            .await?
            .json()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))?;

        single_row(rows, table, Some(id)).map(drop)
    }

    async fn count(&self, caller: &Caller, table: &str) -> Result<u64, BackendError> {
        let mut url = Url::parse(&self.endpoint(&format!("/rest/v1/{table}")))
            .map_err(|e| BackendError::Parse(format!("Invalid table URL: {e}")))?;
        url.query_pairs_mut().append_pair("select", "id");

        let response = self
            .request(Method::HEAD, url.as_str(), caller)
            .header("Prefer", "count=exact")
            .send()
            .await?;
        let response = check(response).await?;

        response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_content_range)
            .ok_or_else(|| BackendError::Parse(format!("{table}: missing row count")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;
    use crate::config::SupabaseConfig;

    fn client() -> SupabaseClient {
        SupabaseClient::new(&SupabaseConfig {
            url: Url::parse("https://abcd.supabase.co").unwrap(),
            api_key: SecretString::from("anon"),
        })
        .unwrap()
    }

    #[test]
    fn test_table_url_with_filters_and_order() {
        let query = Query::new()
            .eq("is_approved", true)
            .order_by("created_at", Direction::Descending);
        let url = client().table_url("testimonials", &query).unwrap();
        assert_eq!(
            url.as_str(),
            "https://abcd.supabase.co/rest/v1/testimonials?select=*&is_approved=eq.true&order=created_at.desc"
        );
    }

    #[test]
    fn test_table_url_with_page_window() {
        let query = Query::new()
            .order_by("created_at", Direction::Descending)
            .page(1000, 500);
        let url = client().table_url("gallery", &query).unwrap();
        assert_eq!(
            url.query(),
            Some("select=*&order=created_at.desc&offset=1000&limit=500")
        );
    }

    #[test]
    fn test_row_url_encodes_id_filter() {
        let url = client()
            .row_url("gallery", "0b6f7a52-7fd0-4b6e-b1a5-3d2f4c8e9a10")
            .unwrap();
        assert_eq!(
            url.query(),
            Some("select=*&id=eq.0b6f7a52-7fd0-4b6e-b1a5-3d2f4c8e9a10")
        );
    }

    #[test]
    fn test_parse_content_range() {
        assert_eq!(parse_content_range("0-24/57"), Some(57));
        assert_eq!(parse_content_range("*/0"), Some(0));
        assert_eq!(parse_content_range("0-9/*"), None);
    }

    #[test]
    fn test_write_without_matching_row_is_not_found() {
        let err = single_row(vec![], "products", Some("abc")).unwrap_err();
        assert!(matches!(err, BackendError::NotFound(_)));
        assert_eq!(err.to_string(), "products row abc not found");
    }
}
