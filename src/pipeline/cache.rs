// src/pipeline/cache.rs
//! Build-scoped memo in front of every fetch operation.
//!
//! Entries live for the lifetime of the owning pipeline object and are
//! only removed by an explicit [`BuildCache::clear`]. There is no
//! single-flight de-duplication: two concurrent fetches for the same
//! uncached key both perform the remote work and the second insert
//! wins, matching the source system. The mutex exists to make shared
//! mutation sound, not to change those semantics.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::model::{Amenity, Listing, NearbyLocation, Scene};

/// A memoized fetch result.
#[derive(Debug, Clone)]
pub enum CachedValue {
    Listings(Vec<Listing>),
    Listing(Listing),
    Amenities(Vec<Amenity>),
    NearbyLocations(Vec<NearbyLocation>),
    Scenes(Vec<Scene>),
}

/// Process-lifetime key/value memo keyed by `"{operation}_{parameter}"`.
#[derive(Debug, Default)]
pub struct BuildCache {
    entries: Mutex<HashMap<String, CachedValue>>,
}

impl BuildCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<CachedValue> {
        self.entries.lock().get(key).cloned()
    }

    pub fn insert(&self, key: impl Into<String>, value: CachedValue) {
        self.entries.lock().insert(key.into(), value);
    }

    /// Empties the whole table; the only invalidation the cache has.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

/// Cache key builders, one per memoized operation.
pub mod keys {
    use crate::types::PageId;

    pub const ALL_PROPERTIES: &str = "all_properties";

    pub fn property_by_slug(slug: &str) -> String {
        format!("property_{}", slug)
    }

    pub fn amenities(parent: &PageId) -> String {
        format!("amenities_{}", parent)
    }

    pub fn nearby(parent: &PageId) -> String {
        format!("nearby_{}", parent)
    }

    pub fn scenes(parent: &PageId) -> String {
        format!("scenes_{}", parent)
    }
}
