// src/pipeline/children.rs
//! Child-record fetchers: amenities, nearby locations, tour scenes.
//!
//! Each fetcher queries its collection filtered by the parent record,
//! resolves titles by the title-type discriminator, mirrors referenced
//! images scoped to the child, and memoizes the result. A failed query
//! degrades to an empty child list for that parent — never an error.

use super::cache::{keys, CachedValue};
use super::ListingPipeline;
use crate::api::{ListingStore, RowFilter, RowQuery, SortDirection};
use crate::images::ImageKind;
use crate::model::{Amenity, HotSpot, NearbyLocation, Row, Scene};
use crate::types::{slugify, LocalImageRef, PageId};

/// Field name linking child rows back to their parent listing.
const PARENT_RELATION: &str = "Property";

impl<S: ListingStore> ListingPipeline<S> {
    /// Amenities related to `parent`, with their images mirrored under
    /// the parent's slug.
    pub(super) async fn amenities_for(&self, parent: &PageId, slug: &str) -> Vec<Amenity> {
        let cache_key = keys::amenities(parent);
        if let Some(CachedValue::Amenities(cached)) = self.cache.get(&cache_key) {
            return cached;
        }

        let query = RowQuery::filtered(RowFilter::RelationContains {
            property: PARENT_RELATION.to_string(),
            id: parent.clone(),
        });
        let rows = match self
            .store
            .query_rows(&self.databases.amenities, &query)
            .await
        {
            Ok(rows) => rows,
            Err(e) => {
                log::error!("Fetching amenities for property {} failed: {}", parent, e);
                return Vec::new();
            }
        };

        let mut amenities = Vec::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            let title = row.title_or("Amenity");
            let image_url = self
                .child_image(row, slug, ImageKind::Amenity, &child_id(&title, index))
                .await;
            amenities.push(Amenity {
                title,
                description: row.plain_text("Description"),
                category: row.select("Category"),
                image_url,
            });
        }

        self.cache
            .insert(cache_key, CachedValue::Amenities(amenities.clone()));
        amenities
    }

    /// Nearby points of interest related to `parent`.
    pub(super) async fn nearby_for(&self, parent: &PageId, slug: &str) -> Vec<NearbyLocation> {
        let cache_key = keys::nearby(parent);
        if let Some(CachedValue::NearbyLocations(cached)) = self.cache.get(&cache_key) {
            return cached;
        }

        let query = RowQuery::filtered(RowFilter::RelationContains {
            property: PARENT_RELATION.to_string(),
            id: parent.clone(),
        });
        let rows = match self
            .store
            .query_rows(&self.databases.nearby_locations, &query)
            .await
        {
            Ok(rows) => rows,
            Err(e) => {
                log::error!(
                    "Fetching nearby locations for property {} failed: {}",
                    parent,
                    e
                );
                return Vec::new();
            }
        };

        let mut locations = Vec::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            let title = row.title_or("Location");
            let image_url = self
                .child_image(row, slug, ImageKind::Nearby, &child_id(&title, index))
                .await;
            let distance = row.plain_text("Distance");
            locations.push(NearbyLocation {
                title,
                description: row.plain_text("Description"),
                category: row.select("Category"),
                distance: (!distance.is_empty()).then_some(distance),
                image_url,
            });
        }

        self.cache
            .insert(cache_key, CachedValue::NearbyLocations(locations.clone()));
        locations
    }

    /// Virtual-tour scenes related to `parent`, ordered by their
    /// `Order` field. Scenes whose panorama could not be resolved are
    /// excluded entirely — the tour's `enabled` flag reflects only
    /// survivors.
    pub(super) async fn scenes_for(&self, parent: &PageId, slug: &str) -> Vec<Scene> {
        let cache_key = keys::scenes(parent);
        if let Some(CachedValue::Scenes(cached)) = self.cache.get(&cache_key) {
            return cached;
        }

        let query = RowQuery::filtered(RowFilter::RelationContains {
            property: PARENT_RELATION.to_string(),
            id: parent.clone(),
        })
        .sorted_by("Order", SortDirection::Ascending);
        let rows = match self
            .store
            .query_rows(&self.databases.virtual_tour_scenes, &query)
            .await
        {
            Ok(rows) => rows,
            Err(e) => {
                log::error!("Fetching tour scenes for property {} failed: {}", parent, e);
                return Vec::new();
            }
        };

        let mut scenes = Vec::with_capacity(rows.len());
        for row in &rows {
            if let Some(scene) = self.build_scene(row, slug).await {
                scenes.push(scene);
            }
        }

        self.cache
            .insert(cache_key, CachedValue::Scenes(scenes.clone()));
        scenes
    }

    async fn build_scene(&self, row: &Row, slug: &str) -> Option<Scene> {
        let title = row.title_or("Scene");
        let explicit_id = row.plain_text("SceneId");
        let id = if explicit_id.is_empty() {
            slugify(&title)
        } else {
            explicit_id
        };

        let panorama_urls = row.files("PanoramaImage");
        let panorama_url = self
            .mirror
            .mirror_for_child(
                &panorama_urls[..panorama_urls.len().min(1)],
                slug,
                ImageKind::Tour,
                &id,
                self.force_download,
            )
            .await
            .into_iter()
            .next()
            .unwrap_or_else(LocalImageRef::placeholder);

        // A scene without a usable panorama cannot be rendered at all.
        if panorama_url.is_placeholder() {
            log::warn!("Excluding scene '{}' ({}): no usable panorama image", title, id);
            return None;
        }

        let thumbnail_urls = row.files("ThumbnailImage");
        let thumbnail_url = self
            .mirror
            .mirror_for_child(
                &thumbnail_urls[..thumbnail_urls.len().min(1)],
                slug,
                ImageKind::Tour,
                &format!("{}-thumb", id),
                self.force_download,
            )
            .await
            .into_iter()
            .next()
            .filter(|r| !r.is_placeholder())
            .unwrap_or_else(|| panorama_url.clone());

        Some(Scene {
            hot_spots: parse_hotspots(row, &id),
            id,
            title,
            panorama_url,
            thumbnail_url,
            description: row.plain_text("Description"),
        })
    }

    /// Mirrors the first referenced image of a child row, degrading to
    /// the placeholder when the row references none.
    async fn child_image(
        &self,
        row: &Row,
        slug: &str,
        kind: ImageKind,
        child_id: &str,
    ) -> LocalImageRef {
        let urls = row.files("Image");
        self.mirror
            .mirror_for_child(
                &urls[..urls.len().min(1)],
                slug,
                kind,
                child_id,
                self.force_download,
            )
            .await
            .into_iter()
            .next()
            .unwrap_or_else(LocalImageRef::placeholder)
    }
}

/// Stable per-child filename token: the slugified title, or the row's
/// 1-based position when the title slugifies away entirely.
fn child_id(title: &str, index: usize) -> String {
    let slug = slugify(title);
    if slug.is_empty() {
        (index + 1).to_string()
    } else {
        slug
    }
}

/// Parses the free-text hotspot field as a JSON array; malformed JSON
/// yields an empty list and a log line, never a failed scene.
fn parse_hotspots(row: &Row, scene_id: &str) -> Vec<HotSpot> {
    let raw = row.plain_text("Hotspots");
    if raw.is_empty() {
        return Vec::new();
    }
    match serde_json::from_str(&raw) {
        Ok(spots) => spots,
        Err(e) => {
            log::warn!("Malformed hotspot JSON on scene '{}': {}", scene_id, e);
            Vec::new()
        }
    }
}
