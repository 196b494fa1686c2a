// src/pipeline/mod.rs
//! The transform-and-cache pipeline behind the public fetch API.
//!
//! A [`ListingPipeline`] owns one build's worth of state: the remote
//! store, the image mirror, and the build-scoped cache. Every fetch
//! operation is memoized for the pipeline's lifetime; `clear_cache`
//! is the only invalidation. Failure policy per operation:
//! batch fetches degrade to fallback records, single-record fetches to
//! a discriminated [`SlugLookup`], and nothing here ever panics a
//! caller.

mod cache;
mod children;
mod transform;

pub use cache::{keys, BuildCache, CachedValue};

use futures::future::join_all;

use crate::api::{ListingStore, NotionHttpClient, RowFilter, RowQuery, SortDirection};
use crate::config::{DatabaseIds, PipelineConfig};
use crate::error::AppError;
use crate::images::ImageMirror;
use crate::model::Listing;

/// Outcome of a single-record lookup by slug.
///
/// The source system blurred "no such slug" and "fetch error" into the
/// same shape; this vocabulary keeps them apart while still handing
/// callers a usable degraded record on failure.
#[derive(Debug)]
pub enum SlugLookup {
    /// The slug matched and transformed cleanly.
    Found(Listing),
    /// The query succeeded and matched nothing.
    NotFound,
    /// The query or transform failed; the record is the slug-stamped
    /// fallback.
    Fallback(Listing),
}

impl SlugLookup {
    /// The listing, if any — fallbacks included. `None` only for
    /// [`SlugLookup::NotFound`].
    pub fn into_listing(self) -> Option<Listing> {
        match self {
            SlugLookup::Found(listing) | SlugLookup::Fallback(listing) => Some(listing),
            SlugLookup::NotFound => None,
        }
    }
}

/// One build's fetch pipeline: remote store, image mirror, memo cache.
pub struct ListingPipeline<S> {
    pub(crate) store: S,
    pub(crate) mirror: ImageMirror,
    pub(crate) databases: DatabaseIds,
    pub(crate) cache: BuildCache,
    pub(crate) force_download: bool,
}

impl ListingPipeline<NotionHttpClient> {
    /// Builds the production pipeline from resolved configuration.
    pub async fn from_config(config: &PipelineConfig) -> Result<Self, AppError> {
        let store = NotionHttpClient::new(&config.api_key)?;
        let mirror = ImageMirror::new(&config.images_dir, config.max_concurrent_downloads).await?;
        Ok(Self::new(
            store,
            mirror,
            config.databases.clone(),
            config.force_download,
        ))
    }
}

impl<S: ListingStore> ListingPipeline<S> {
    /// Assembles a pipeline from its parts; useful with an in-memory
    /// store in tests.
    pub fn new(store: S, mirror: ImageMirror, databases: DatabaseIds, force_download: bool) -> Self {
        Self {
            store,
            mirror,
            databases,
            cache: BuildCache::new(),
            force_download,
        }
    }

    /// All listings, newest first, each transformed concurrently.
    ///
    /// A top-level query failure yields a single fallback record; a
    /// per-row transform failure yields a fallback stamped with that
    /// row's id. The batch never fails wholesale.
    pub async fn fetch_all(&self) -> Vec<Listing> {
        if let Some(CachedValue::Listings(cached)) = self.cache.get(keys::ALL_PROPERTIES) {
            return cached;
        }

        let query = RowQuery::all().sorted_by("Created", SortDirection::Descending);
        let rows = match self.store.query_rows(&self.databases.properties, &query).await {
            Ok(rows) => rows,
            Err(e) => {
                log::error!("Fetching all properties failed: {}", e);
                return vec![Listing::fallback("fallback")];
            }
        };

        let listings = join_all(rows.iter().map(|row| async move {
            match self.transform_row(row).await {
                Ok(listing) => listing,
                Err(e) => {
                    log::error!("Transforming property {} failed: {}", row.id, e);
                    Listing::fallback(row.id.as_str())
                }
            }
        }))
        .await;

        self.cache
            .insert(keys::ALL_PROPERTIES, CachedValue::Listings(listings.clone()));
        listings
    }

    /// A single listing by exact slug match.
    pub async fn fetch_by_slug(&self, slug: &str) -> SlugLookup {
        let cache_key = keys::property_by_slug(slug);
        if let Some(CachedValue::Listing(cached)) = self.cache.get(&cache_key) {
            return SlugLookup::Found(cached);
        }

        let query = RowQuery::filtered(RowFilter::RichTextEquals {
            property: "Slug".to_string(),
            value: slug.to_string(),
        });
        let rows = match self.store.query_rows(&self.databases.properties, &query).await {
            Ok(rows) => rows,
            Err(e) => {
                log::error!("Fetching property by slug '{}' failed: {}", slug, e);
                return SlugLookup::Fallback(Listing::fallback_for_slug(slug));
            }
        };

        let Some(row) = rows.first() else {
            return SlugLookup::NotFound;
        };

        match self.transform_row(row).await {
            Ok(listing) => {
                self.cache
                    .insert(cache_key, CachedValue::Listing(listing.clone()));
                SlugLookup::Found(listing)
            }
            Err(e) => {
                log::error!("Transforming property with slug '{}' failed: {}", slug, e);
                SlugLookup::Fallback(Listing::fallback_for_slug(slug))
            }
        }
    }

    /// Listings whose virtual tour has at least one usable scene.
    pub async fn fetch_tours_only(&self) -> Vec<Listing> {
        self.fetch_all()
            .await
            .into_iter()
            .filter(|listing| listing.virtual_tour.enabled)
            .collect()
    }

    /// Empties the build cache; the next fetch hits the remote store
    /// again. For long-running processes that need a refetch.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// The underlying store, mainly so tests can observe query counts.
    pub fn store_ref(&self) -> &S {
        &self.store
    }
}
