//! Scene filtering and tour enablement.

mod common;

use common::*;
use notion_estates::ListingPipeline;
use pretty_assertions::assert_eq;
use serde_json::json;

const PARENT_ID: &str = "11111111222233334444555555555555";

/// Nothing listens on this port, so the download fails fast offline.
const DEAD_URL: &str = "http://127.0.0.1:9/pano.jpg";

fn scene_row(id_hex32: &str, title: &str, scene_id: &str, panorama_url: Option<&str>) -> serde_json::Value {
    let files = match panorama_url {
        Some(url) => json!([{"type": "external", "name": "p", "external": {"url": url}}]),
        None => json!([]),
    };
    json!({
        "id": hyphenate(id_hex32),
        "properties": {
            "Title": {"id": "t", "type": "title", "title": [{"plain_text": title}]},
            "SceneId": {"id": "i", "type": "rich_text",
                "rich_text": [{"plain_text": scene_id}]},
            "Property": {"id": "r", "type": "relation",
                "relation": [{"id": hyphenate(PARENT_ID)}]},
            "PanoramaImage": {"id": "p", "type": "files", "files": files},
            "Hotspots": {"id": "h", "type": "rich_text", "rich_text": [{"plain_text":
                "[{\"pitch\": 0.5, \"yaw\": 90.0, \"type\": \"scene\", \"text\": \"Next\", \"sceneId\": \"patio\"}]"
            }]},
        }
    })
}

#[tokio::test]
async fn scenes_without_usable_panorama_are_excluded() {
    let scenes = vec![
        row_from_value(scene_row(
            "aaaa1111bbbb2222cccc3333dddd4444",
            "Lobby",
            "lobby",
            Some("https://cdn.example.com/lobby.jpg"),
        )),
        row_from_value(scene_row(
            "aaaa1111bbbb2222cccc3333dddd5555",
            "Broken",
            "broken",
            Some(DEAD_URL),
        )),
        row_from_value(scene_row(
            "aaaa1111bbbb2222cccc3333dddd6666",
            "No Image",
            "no-image",
            None,
        )),
    ];
    let store = MockStore::new()
        .with_rows(
            PROPERTIES_DB,
            vec![parent_row(PARENT_ID, "Torre Azul", "torre-azul")],
        )
        .with_rows(SCENES_DB, scenes);

    let (mirror, dir) = temp_mirror("tours").await;
    // Pre-mirror the lobby panorama so its download is skipped; the
    // other two scenes have no resolvable image and must be dropped.
    tokio::fs::write(dir.join("torre-azul-tour-lobby-1.jpg"), b"pano")
        .await
        .unwrap();

    let pipeline = ListingPipeline::new(store, mirror, database_ids(), false);
    let listings = pipeline.fetch_all().await;
    let tour = &listings[0].virtual_tour;

    assert!(tour.enabled);
    assert_eq!(tour.scenes.len(), 1);
    assert_eq!(tour.scenes[0].id, "lobby");
    assert_eq!(
        tour.scenes[0].panorama_url.as_str(),
        "/images/notion/torre-azul-tour-lobby-1.jpg"
    );
    // No thumbnail field: the panorama doubles as the thumbnail.
    assert_eq!(tour.scenes[0].thumbnail_url, tour.scenes[0].panorama_url);
    assert_eq!(tour.scenes[0].hot_spots.len(), 1);
    assert_eq!(tour.scenes[0].hot_spots[0].scene_id, "patio");

    let _ = tokio::fs::remove_dir_all(&dir).await;
}

#[tokio::test]
async fn scene_id_derives_from_title_when_not_explicit() {
    let scene = json!({
        "id": hyphenate("aaaa1111bbbb2222cccc3333dddd7777"),
        "properties": {
            "Title": {"id": "t", "type": "title", "title": [{"plain_text": "Rooftop Pool!"}]},
            "Property": {"id": "r", "type": "relation",
                "relation": [{"id": hyphenate(PARENT_ID)}]},
            "PanoramaImage": {"id": "p", "type": "files", "files": [
                {"type": "external", "name": "p",
                 "external": {"url": "https://cdn.example.com/roof.jpg"}}
            ]},
        }
    });
    let store = MockStore::new()
        .with_rows(
            PROPERTIES_DB,
            vec![parent_row(PARENT_ID, "Torre Azul", "torre-azul")],
        )
        .with_rows(SCENES_DB, vec![row_from_value(scene)]);

    let (mirror, dir) = temp_mirror("sceneid").await;
    tokio::fs::write(dir.join("torre-azul-tour-rooftop-pool-1.jpg"), b"pano")
        .await
        .unwrap();

    let pipeline = ListingPipeline::new(store, mirror, database_ids(), false);
    let listings = pipeline.fetch_all().await;
    assert_eq!(listings[0].virtual_tour.scenes[0].id, "rooftop-pool");

    let _ = tokio::fs::remove_dir_all(&dir).await;
}

#[tokio::test]
async fn tours_only_filters_out_tourless_listings() {
    let with_tour = parent_row(PARENT_ID, "Torre Azul", "torre-azul");
    let without_tour = parent_row("99999999888877776666555544443333", "Casa Roja", "casa-roja");
    let scene = row_from_value(scene_row(
        "aaaa1111bbbb2222cccc3333dddd8888",
        "Lobby",
        "lobby",
        Some("https://cdn.example.com/lobby.jpg"),
    ));

    let store = MockStore::new()
        .with_rows(PROPERTIES_DB, vec![with_tour, without_tour])
        .with_rows(SCENES_DB, vec![scene]);

    let (mirror, dir) = temp_mirror("toursonly").await;
    tokio::fs::write(dir.join("torre-azul-tour-lobby-1.jpg"), b"pano")
        .await
        .unwrap();

    let pipeline = ListingPipeline::new(store, mirror, database_ids(), false);
    let tours = pipeline.fetch_tours_only().await;

    // The scene relates only to Torre Azul; Casa Roja has no tour and
    // is filtered out.
    assert_eq!(tours.len(), 1);
    assert_eq!(tours[0].slug, "torre-azul");
    assert!(tours[0].virtual_tour.enabled);

    let _ = tokio::fs::remove_dir_all(&dir).await;
}
