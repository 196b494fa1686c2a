//! Fetch API behavior: memoization, fallback policy, slug lookups.

mod common;

use common::*;
use notion_estates::{ListingPipeline, SlugLookup};
use pretty_assertions::assert_eq;
use serde_json::json;

const PARENT_ID: &str = "11111111222233334444555555555555";

async fn pipeline_with(store: MockStore) -> ListingPipeline<MockStore> {
    let (mirror, _dir) = temp_mirror("fetch").await;
    ListingPipeline::new(store, mirror, database_ids(), false)
}

#[tokio::test]
async fn fetch_all_issues_one_parent_query_until_cache_cleared() {
    let store = MockStore::new().with_rows(
        PROPERTIES_DB,
        vec![parent_row(PARENT_ID, "Torre Azul", "torre-azul")],
    );
    let pipeline = pipeline_with(store).await;

    let first = pipeline.fetch_all().await;
    let second = pipeline.fetch_all().await;
    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 1);
    assert_eq!(pipeline.store_ref().query_count(PROPERTIES_DB), 1);

    pipeline.clear_cache();
    pipeline.fetch_all().await;
    assert_eq!(pipeline.store_ref().query_count(PROPERTIES_DB), 2);
}

#[tokio::test]
async fn fetch_all_query_failure_degrades_to_single_fallback() {
    let store = MockStore::new().with_failure(PROPERTIES_DB);
    let pipeline = pipeline_with(store).await;

    let listings = pipeline.fetch_all().await;
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].slug, "fallback-property");
}

#[tokio::test]
async fn fetch_by_slug_distinguishes_not_found_from_failure() {
    let store = MockStore::new().with_rows(PROPERTIES_DB, vec![]);
    let pipeline = pipeline_with(store).await;
    assert!(matches!(
        pipeline.fetch_by_slug("nonexistent").await,
        SlugLookup::NotFound
    ));

    let failing = MockStore::new().with_failure(PROPERTIES_DB);
    let pipeline = pipeline_with(failing).await;
    match pipeline.fetch_by_slug("torre-azul").await {
        SlugLookup::Fallback(listing) => assert_eq!(listing.slug, "torre-azul"),
        other => panic!("expected Fallback, got {:?}", other),
    }
}

#[tokio::test]
async fn fetch_by_slug_found_record_is_memoized() {
    let store = MockStore::new().with_rows(
        PROPERTIES_DB,
        vec![parent_row(PARENT_ID, "Torre Azul", "torre-azul")],
    );
    let pipeline = pipeline_with(store).await;

    let first = pipeline.fetch_by_slug("torre-azul").await;
    assert!(matches!(first, SlugLookup::Found(_)));
    let second = pipeline.fetch_by_slug("torre-azul").await;
    assert!(matches!(second, SlugLookup::Found(_)));
    assert_eq!(pipeline.store_ref().query_count(PROPERTIES_DB), 1);
}

#[tokio::test]
async fn amenity_without_title_field_gets_default_and_batch_survives() {
    let amenity = row_from_value(json!({
        "id": hyphenate("66666666777788889999aaaaaaaaaaaa"),
        "properties": {
            "Property": {"id": "r", "type": "relation",
                "relation": [{"id": hyphenate(PARENT_ID)}]},
            "Description": {"id": "d", "type": "rich_text",
                "rich_text": [{"plain_text": "Heated lap pool"}]},
            "Category": {"id": "c", "type": "select", "select": {"name": "Wellness"}},
        }
    }));
    let store = MockStore::new()
        .with_rows(
            PROPERTIES_DB,
            vec![parent_row(PARENT_ID, "Torre Azul", "torre-azul")],
        )
        .with_rows(AMENITIES_DB, vec![amenity]);
    let pipeline = pipeline_with(store).await;

    let listings = pipeline.fetch_all().await;
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].amenities.len(), 1);
    assert_eq!(listings[0].amenities[0].title, "Amenity");
    assert_eq!(listings[0].amenities[0].description, "Heated lap pool");
    assert!(listings[0].amenities[0].image_url.is_placeholder());
}

#[tokio::test]
async fn child_query_failure_yields_empty_child_list_not_fallback() {
    let store = MockStore::new()
        .with_rows(
            PROPERTIES_DB,
            vec![parent_row(PARENT_ID, "Torre Azul", "torre-azul")],
        )
        .with_failure(AMENITIES_DB);
    let pipeline = pipeline_with(store).await;

    let listings = pipeline.fetch_all().await;
    assert_eq!(listings.len(), 1);
    // The listing itself transformed fine; only its amenities are empty.
    assert_eq!(listings[0].property_name, "Torre Azul");
    assert!(listings[0].amenities.is_empty());
}

#[tokio::test]
async fn missing_slug_derives_from_record_id() {
    let row = row_from_value(json!({
        "id": hyphenate(PARENT_ID),
        "properties": {
            "Name": {"id": "t", "type": "title", "title": [{"plain_text": "No Slug Here"}]},
        }
    }));
    let store = MockStore::new().with_rows(PROPERTIES_DB, vec![row]);
    let pipeline = pipeline_with(store).await;

    let listings = pipeline.fetch_all().await;
    assert_eq!(listings[0].slug, format!("property-{}", PARENT_ID));
}

#[tokio::test]
async fn gallery_falls_back_to_single_placeholder() {
    let store = MockStore::new().with_rows(
        PROPERTIES_DB,
        vec![parent_row(PARENT_ID, "Torre Azul", "torre-azul")],
    );
    let pipeline = pipeline_with(store).await;

    let listings = pipeline.fetch_all().await;
    let media = &listings[0].media;
    assert_eq!(media.images.len(), 1);
    assert!(media.images[0].is_placeholder());
    assert!(media.hero_image.is_placeholder());
    assert!(media.three_sixty_images.is_none());
}
