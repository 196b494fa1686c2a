// src/pipeline/transform.rs
//! Assembles one remote row into a fully-populated [`Listing`].
//!
//! The slug is resolved first because it seeds every image filename;
//! after that the three child fetchers and all media mirroring run
//! concurrently, joined with wait-for-all semantics.

use chrono::Datelike;

use super::ListingPipeline;
use crate::api::ListingStore;
use crate::constants::{
    DEFAULT_CITY, DEFAULT_COMMISSION_PERCENTAGE, DEFAULT_COUNTRY, DEFAULT_CURRENCY,
    DEFAULT_DELIVERY_TYPE, DEFAULT_PROPERTY_TYPE, DEFAULT_STATUS,
};
use crate::error::AppError;
use crate::images::ImageKind;
use crate::model::{
    Contact, Delivery, Developer, Dimensions, Features, Listing, Location, Media, Pricing, Row,
    VirtualTour,
};
use crate::types::LocalImageRef;

fn or_default(value: String, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

/// Counts come back as floats from the number extractor; clamp the
/// negatives a hand-edited database can contain.
fn count(value: f64) -> u32 {
    value.max(0.0) as u32
}

fn plausible_year(value: f64) -> u16 {
    let year = value as i64;
    if (1000..=9999).contains(&year) {
        year as u16
    } else {
        chrono::Utc::now().year() as u16
    }
}

impl<S: ListingStore> ListingPipeline<S> {
    /// Transforms one parent row into a listing record.
    ///
    /// Image and child-record failures have already degraded to
    /// placeholders/empty lists by the time assembly happens; the
    /// `Result` seam exists so the batch caller can substitute a
    /// fallback record for anything unexpected.
    pub(super) async fn transform_row(&self, row: &Row) -> Result<Listing, AppError> {
        let id = row.id.clone();
        let slug = or_default(row.plain_text("Slug"), &format!("property-{}", id));
        let force = self.force_download;

        let media_and_developer = async {
            let gallery_urls = row.files_any(&["Images", "Media"]);
            let hero_urls = row.files("HeroImage");
            let pano_urls = row.files("ThreeSixtyImages");
            let logo_urls = row.files("DeveloperLogo");
            let dev_image_urls = row.files("DeveloperImage");

            let (gallery, hero, panos, logos, dev_images) = tokio::join!(
                self.mirror.mirror_many(&gallery_urls, &slug, ImageKind::Gallery, force),
                self.mirror.mirror_many(&hero_urls[..hero_urls.len().min(1)], &slug, ImageKind::Hero, force),
                self.mirror.mirror_many(&pano_urls, &slug, ImageKind::Pano, force),
                self.mirror.mirror_for_child(
                    &logo_urls[..logo_urls.len().min(1)],
                    &slug,
                    ImageKind::Developer,
                    "logo",
                    force
                ),
                self.mirror.mirror_for_child(
                    &dev_image_urls[..dev_image_urls.len().min(1)],
                    &slug,
                    ImageKind::Developer,
                    "image",
                    force
                ),
            );

            // The gallery is never empty; a listing without images
            // still renders with the placeholder.
            let images = if gallery.is_empty() {
                vec![LocalImageRef::placeholder()]
            } else {
                gallery
            };
            let hero_image = hero
                .into_iter()
                .next()
                .unwrap_or_else(|| images[0].clone());

            let media = Media {
                hero_image,
                images,
                virtual_tour_url: non_empty(row.url("VirtualTourUrl")),
                video_url: non_empty(row.url("VideoUrl")),
                three_sixty_images: (!panos.is_empty()).then_some(panos),
            };

            let developer = Developer {
                name: or_default(row.plain_text("DeveloperName"), "Unknown Developer"),
                logo_url: logos
                    .into_iter()
                    .next()
                    .unwrap_or_else(LocalImageRef::placeholder),
                image_url: dev_images.into_iter().next().filter(|r| !r.is_placeholder()),
                description: row.plain_text("DeveloperDescription"),
            };

            (media, developer)
        };

        let ((media, developer), amenities, nearby_locations, scenes) = tokio::join!(
            media_and_developer,
            self.amenities_for(&id, &slug),
            self.nearby_for(&id, &slug),
            self.scenes_for(&id, &slug),
        );

        let commission = row.number("CommissionPercentage");
        let min_price = row.number_any(&["MinPrice", "Price"]);
        let min_area = row.number_any(&["MinArea", "Area"]);

        Ok(Listing {
            slug,
            property_id: non_empty(row.plain_text("PropertyId")),
            property_name: row.plain_text_any(&["Name", "PropertyName"]),
            property_type: or_default(row.select("Type"), DEFAULT_PROPERTY_TYPE),
            status: or_default(row.select("Status"), DEFAULT_STATUS),
            description: row.plain_text("Description"),
            developer,
            location: Location {
                address: row.plain_text("Address"),
                neighborhood: row.plain_text("Neighborhood"),
                city: or_default(row.plain_text("City"), DEFAULT_CITY),
                country: Some(or_default(row.plain_text("Country"), DEFAULT_COUNTRY)),
                maps_link: row.url("MapsLink"),
            },
            pricing: Pricing::normalized(
                min_price,
                row.number("MaxPrice"),
                or_default(row.select("Currency"), DEFAULT_CURRENCY),
                Some(if commission > 0.0 {
                    commission
                } else {
                    DEFAULT_COMMISSION_PERCENTAGE
                }),
            ),
            dimensions: Dimensions::normalized(min_area, row.number("MaxArea")),
            features: Features {
                bedrooms: count(row.number("Bedrooms")),
                bathrooms: count(row.number("Bathrooms")),
                parking_spaces: count(row.number("ParkingSpaces")),
                is_furnished: row.checkbox("IsFurnished"),
            },
            delivery: Delivery {
                delivery_type: or_default(row.select("DeliveryType"), DEFAULT_DELIVERY_TYPE),
                year_built: plausible_year(row.number("YearBuilt")),
            },
            amenities,
            nearby_locations,
            media,
            virtual_tour: VirtualTour::from_scenes(scenes),
            contact: Contact {
                agent_name: or_default(row.plain_text("AgentName"), "Agent"),
                phone: or_default(row.phone("AgentPhone"), &row.plain_text("AgentPhone")),
                email: or_default(row.email("AgentEmail"), &row.plain_text("AgentEmail")),
                website: row.url("AgentWebsite"),
            },
            id: id.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn counts_clamp_negatives() {
        assert_eq!(count(-2.0), 0);
        assert_eq!(count(3.9), 3);
    }

    #[test]
    fn implausible_years_become_the_current_year() {
        let now = chrono::Utc::now().year() as u16;
        assert_eq!(plausible_year(0.0), now);
        assert_eq!(plausible_year(12.0), now);
        assert_eq!(plausible_year(99999.0), now);
        assert_eq!(plausible_year(2027.0), 2027);
    }

    #[test]
    fn or_default_only_replaces_empty() {
        assert_eq!(or_default(String::new(), "x"), "x");
        assert_eq!(or_default("y".to_string(), "x"), "y");
    }
}
