//! Cached data for public pages, keyed by route path.
//!
//! Mutations call [`PageCache::revalidate_path`] for every route that shows
//! the changed entity, so the next request to that route reads fresh rows.
//! Routes that are never cached (the admin screens) can still be revalidated;
//! the call is then a no-op.
//!
//! A read that misses the cache takes [`PageCache::generation`] before it
//! fetches and hands it back to [`PageCache::insert`]. If any revalidation
//! ran in between, the entry is dropped again, so rows read before a
//! mutation never outlive it.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use moka::future::Cache;
use premium_food_core::{GalleryItem, Product, Testimonial};

/// Upper bound on cached routes. The site only has a handful.
const MAX_CACHED_ROUTES: u64 = 64;

/// Rows behind the public home page.
#[derive(Debug, Clone, Default)]
pub struct HomeData {
    pub featured_products: Vec<Product>,
    pub gallery: Vec<GalleryItem>,
    pub testimonials: Vec<Testimonial>,
}

/// Data cached for one public route.
#[derive(Debug, Clone)]
pub enum PublicPage {
    Home(Arc<HomeData>),
    Gallery(Arc<Vec<GalleryItem>>),
}

/// Route-keyed cache of public page data.
#[derive(Clone)]
pub struct PageCache {
    pages: Cache<String, PublicPage>,
    /// Bumped by every revalidation.
    generation: Arc<AtomicU64>,
}

impl PageCache {
    /// Create a cache whose entries expire after `ttl` even without revalidation.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            pages: Cache::builder()
                .max_capacity(MAX_CACHED_ROUTES)
                .time_to_live(ttl)
                .build(),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Cached data for a route, if fresh.
    pub async fn get(&self, path: &str) -> Option<PublicPage> {
        self.pages.get(path).await
    }

    /// Current revalidation generation. Take it before fetching rows.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Store data for a route, read under `generation`.
    ///
    /// Only call this with complete, successful reads. The entry is dropped
    /// if a revalidation happened since `generation` was taken.
    pub async fn insert(&self, path: &str, page: PublicPage, generation: u64) {
        self.pages.insert(path.to_string(), page).await;
        // Checked after the insert: a revalidation that bumps later also
        // invalidates later.
        if self.generation() != generation {
            tracing::debug!(path, "Dropping page read before revalidation");
            self.pages.invalidate(path).await;
        }
    }

    /// Mark one route's data stale.
    pub async fn revalidate_path(&self, path: &str) {
        tracing::debug!(path, "Revalidating route");
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.pages.invalidate(path).await;
    }

    /// Mark every route stale, e.g. after sign-in changes what pages show.
    pub fn revalidate_layout(&self) {
        tracing::debug!("Revalidating all routes");
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.pages.invalidate_all();
    }
}
