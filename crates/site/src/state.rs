//! Application state shared across handlers.

use std::sync::Arc;

use crate::backend::supabase::SupabaseClient;
use crate::backend::{AuthProvider, BackendError, Database, ObjectStorage};
use crate::cache::PageCache;
use crate::config::SiteConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the backend services, the page cache, and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: SiteConfig,
    database: Arc<dyn Database>,
    storage: Arc<dyn ObjectStorage>,
    auth: Arc<dyn AuthProvider>,
    pages: PageCache,
}

impl AppState {
    /// Create application state backed by the configured Supabase project.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: SiteConfig) -> Result<Self, BackendError> {
        let client = Arc::new(SupabaseClient::new(&config.supabase)?);
        Ok(Self::with_backend(
            config,
            client.clone(),
            client.clone(),
            client,
        ))
    }

    /// Create application state over explicit backend implementations.
    #[must_use]
    pub fn with_backend(
        config: SiteConfig,
        database: Arc<dyn Database>,
        storage: Arc<dyn ObjectStorage>,
        auth: Arc<dyn AuthProvider>,
    ) -> Self {
        let pages = PageCache::new(config.page_cache_ttl);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                database,
                storage,
                auth,
                pages,
            }),
        }
    }

    /// Get a reference to the site configuration.
    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.inner.config
    }

    /// Row storage.
    #[must_use]
    pub fn database(&self) -> &dyn Database {
        self.inner.database.as_ref()
    }

    /// Object storage.
    #[must_use]
    pub fn storage(&self) -> &dyn ObjectStorage {
        self.inner.storage.as_ref()
    }

    /// Auth provider.
    #[must_use]
    pub fn auth(&self) -> &dyn AuthProvider {
        self.inner.auth.as_ref()
    }

    /// Public page cache.
    #[must_use]
    pub fn pages(&self) -> &PageCache {
        &self.inner.pages
    }
}
