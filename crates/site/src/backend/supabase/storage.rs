//! Object storage through the Supabase Storage API.

use async_trait::async_trait;
use reqwest::Method;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;

use super::{SupabaseClient, check};
use crate::backend::{BackendError, Bucket, Caller, ObjectStorage, collect_pages};

/// Browser cache lifetime for uploaded images, in seconds.
const CACHE_CONTROL_SECONDS: u32 = 3600;

/// Page size when listing a folder.
const LIST_LIMIT: u64 = 1000;

/// An entry returned by the list endpoint. Folders have no id.
#[derive(Debug, Deserialize)]
struct ListEntry {
    name: String,
    id: Option<String>,
}

#[async_trait]
impl ObjectStorage for SupabaseClient {
    async fn upload(
        &self,
        caller: &Caller,
        bucket: Bucket,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), BackendError> {
        let url = self.endpoint(&format!("/storage/v1/object/{bucket}/{path}"));
        let response = self
            .request(Method::POST, &url, caller)
            .header(CONTENT_TYPE, content_type)
            .header("cache-control", format!("max-age={CACHE_CONTROL_SECONDS}"))
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    fn public_url(&self, bucket: Bucket, path: &str) -> String {
        self.endpoint(&format!("/storage/v1/object/public/{bucket}/{path}"))
    }

    async fn remove(
        &self,
        caller: &Caller,
        bucket: Bucket,
        paths: &[String],
    ) -> Result<(), BackendError> {
        let url = self.endpoint(&format!("/storage/v1/object/{bucket}"));
        let response = self
            .request(Method::DELETE, &url, caller)
            .json(&serde_json::json!({ "prefixes": paths }))
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    async fn list(
        &self,
        caller: &Caller,
        bucket: Bucket,
        prefix: &str,
    ) -> Result<Vec<String>, BackendError> {
        let url = self.endpoint(&format!("/storage/v1/object/list/{bucket}"));
        let entries = collect_pages(LIST_LIMIT, |offset| {
            let request = self.request(Method::POST, &url, caller).json(&serde_json::json!({
                "prefix": prefix,
                "limit": LIST_LIMIT,
                "offset": offset,
                "sortBy": { "column": "name", "order": "asc" },
            }));
            async move {
                let response = check(request.send().await?).await?;
                response
                    .json::<Vec<ListEntry>>()
                    .await
                    .map_err(|e| BackendError::Parse(e.to_string()))
            }
        })
        .await?;

        Ok(entries
            .into_iter()
            .filter(|entry| entry.id.is_some())
            .map(|entry| join_path(prefix, &entry.name))
            .collect())
    }
}

fn join_path(prefix: &str, name: &str) -> String {
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}/{name}")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use premium_food_core::object_path_from_url;
    use secrecy::SecretString;
    use url::Url;

    use super::*;
    use crate::config::SupabaseConfig;

    #[test]
    fn test_public_url_round_trips_to_path() {
        let client = SupabaseClient::new(&SupabaseConfig {
            url: Url::parse("https://abcd.supabase.co/").unwrap(),
            api_key: SecretString::from("anon"),
        })
        .unwrap();

        let url = client.public_url(Bucket::Avatars, "public/3f2a.png");
        assert_eq!(
            url,
            "https://abcd.supabase.co/storage/v1/object/public/avatars/public/3f2a.png"
        );
        assert_eq!(
            object_path_from_url(&url, Bucket::Avatars).as_deref(),
            Some("public/3f2a.png")
        );
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("gallery", "a.jpg"), "gallery/a.jpg");
        assert_eq!(join_path("/public/", "b.png"), "public/b.png");
        assert_eq!(join_path("", "c.png"), "c.png");
    }
}
