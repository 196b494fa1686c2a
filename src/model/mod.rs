// src/model/mod.rs
//! The normalized listing domain model.
//!
//! Every type here is constructed once by the transformer and never
//! mutated afterwards; serialization uses the camelCase shape the site
//! and the export files consume.

mod row;

pub use row::{
    DateValue, ExternalFile, FileEntry, HostedFile, PropertyValue, RelationRef, RichTextItem, Row,
    SelectOption,
};

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CITY, DEFAULT_COMMISSION_PERCENTAGE, DEFAULT_COUNTRY, DEFAULT_CURRENCY,
    DEFAULT_DELIVERY_TYPE, DEFAULT_PROPERTY_TYPE, DEFAULT_STATUS,
};
use crate::types::LocalImageRef;

/// One fully-populated real-estate listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_id: Option<String>,
    pub property_name: String,
    pub property_type: String,
    pub status: String,
    pub description: String,
    pub developer: Developer,
    pub location: Location,
    pub pricing: Pricing,
    pub dimensions: Dimensions,
    pub features: Features,
    pub delivery: Delivery,
    pub amenities: Vec<Amenity>,
    pub nearby_locations: Vec<NearbyLocation>,
    pub media: Media,
    pub virtual_tour: VirtualTour,
    pub contact: Contact,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Developer {
    pub name: String,
    pub logo_url: LocalImageRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<LocalImageRef>,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub address: String,
    pub neighborhood: String,
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub maps_link: String,
}

/// Price bounds in the listing's currency. Construction through
/// [`Pricing::normalized`] keeps `max_price >= min_price`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pricing {
    pub min_price: f64,
    pub max_price: f64,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commission_percentage: Option<f64>,
}

impl Pricing {
    /// Builds a pricing block enforcing non-negative bounds and the
    /// `max >= min` ordering invariant. A missing upper bound takes the
    /// lower bound's value, as the source schema did.
    pub fn normalized(min: f64, max: f64, currency: String, commission: Option<f64>) -> Self {
        let min_price = min.max(0.0);
        let max_price = if max <= 0.0 { min_price } else { max.max(min_price) };
        Self {
            min_price,
            max_price,
            currency,
            commission_percentage: commission,
        }
    }

    /// Whether the block carries a usable (positive, ordered) range.
    pub fn is_valid(&self) -> bool {
        self.min_price > 0.0 && self.max_price >= self.min_price
    }
}

/// Floor-area bounds in square meters, same ordering invariant as
/// [`Pricing`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dimensions {
    pub min_area_m2: f64,
    pub max_area_m2: f64,
}

impl Dimensions {
    pub fn normalized(min: f64, max: f64) -> Self {
        let min_area_m2 = min.max(0.0);
        let max_area_m2 = if max <= 0.0 {
            min_area_m2
        } else {
            max.max(min_area_m2)
        };
        Self {
            min_area_m2,
            max_area_m2,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Features {
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub parking_spaces: u32,
    pub is_furnished: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Delivery {
    #[serde(rename = "type")]
    pub delivery_type: String,
    pub year_built: u16,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Amenity {
    pub title: String,
    pub description: String,
    pub category: String,
    pub image_url: LocalImageRef,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyLocation {
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<String>,
    pub image_url: LocalImageRef,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub hero_image: LocalImageRef,
    /// Ordered gallery references; never empty (placeholder fallback).
    pub images: Vec<LocalImageRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub virtual_tour_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub three_sixty_images: Option<Vec<LocalImageRef>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualTour {
    /// True iff the tour owns at least one scene that survived the
    /// panorama filter.
    pub enabled: bool,
    pub scenes: Vec<Scene>,
}

impl VirtualTour {
    pub fn from_scenes(scenes: Vec<Scene>) -> Self {
        Self {
            enabled: !scenes.is_empty(),
            scenes,
        }
    }

    pub fn disabled() -> Self {
        Self::from_scenes(Vec::new())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub id: String,
    pub title: String,
    pub panorama_url: LocalImageRef,
    pub thumbnail_url: LocalImageRef,
    pub description: String,
    pub hot_spots: Vec<HotSpot>,
}

/// A navigation marker placed on a scene's panorama sphere.
///
/// Deserialized from the free-text hotspot JSON field on the remote
/// scene record; serialized back out in the export.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HotSpot {
    pub pitch: f64,
    pub yaw: f64,
    #[serde(rename = "type")]
    pub hotspot_type: String,
    pub text: String,
    pub scene_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub agent_name: String,
    pub phone: String,
    pub email: String,
    pub website: String,
}

impl Listing {
    /// The hard-coded degraded record substituted when a remote row
    /// cannot be transformed. Stamped with the source row's id so the
    /// failure can be traced back.
    pub fn fallback(id: &str) -> Self {
        Self {
            id: id.to_string(),
            slug: "fallback-property".to_string(),
            property_id: None,
            property_name: "Fallback Property".to_string(),
            property_type: DEFAULT_PROPERTY_TYPE.to_string(),
            status: DEFAULT_STATUS.to_string(),
            description: "Default property description".to_string(),
            developer: Developer {
                name: "Default Developer".to_string(),
                logo_url: LocalImageRef::placeholder(),
                image_url: None,
                description: "Default developer description".to_string(),
            },
            location: Location {
                address: "Default Address".to_string(),
                neighborhood: "Default Neighborhood".to_string(),
                city: DEFAULT_CITY.to_string(),
                country: Some(DEFAULT_COUNTRY.to_string()),
                maps_link: "https://maps.google.com".to_string(),
            },
            pricing: Pricing::normalized(
                1_000_000.0,
                1_500_000.0,
                DEFAULT_CURRENCY.to_string(),
                Some(DEFAULT_COMMISSION_PERCENTAGE),
            ),
            dimensions: Dimensions::normalized(50.0, 100.0),
            features: Features {
                bedrooms: 2,
                bathrooms: 1,
                parking_spaces: 1,
                is_furnished: false,
            },
            delivery: Delivery {
                delivery_type: DEFAULT_DELIVERY_TYPE.to_string(),
                year_built: 2024,
            },
            amenities: Vec::new(),
            nearby_locations: Vec::new(),
            media: Media {
                hero_image: LocalImageRef::placeholder(),
                images: vec![LocalImageRef::placeholder()],
                virtual_tour_url: None,
                video_url: None,
                three_sixty_images: None,
            },
            virtual_tour: VirtualTour::disabled(),
            contact: Contact {
                agent_name: "Default Agent".to_string(),
                phone: "+52 55 0000 0000".to_string(),
                email: "info@example.com".to_string(),
                website: String::new(),
            },
        }
    }

    /// Fallback stamped with the slug a lookup was asked for, so a
    /// degraded single-record fetch remains attributable.
    pub fn fallback_for_slug(slug: &str) -> Self {
        let mut listing = Self::fallback("fallback");
        listing.slug = slug.to_string();
        listing
    }
}
